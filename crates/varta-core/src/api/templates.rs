//! # Template Endpoints
//!
//! Legacy (`/templates`) and advanced (`/templates/v2`) template routes, the
//! creation adapter that falls back from one to the other, and the preview.

use serde::Deserialize;
use std::time::Duration;

use super::client::CrmClient;
use crate::error::ApiResult;
use crate::template::{
    AdvancedTemplateRequest, LegacyTemplateRequest, Template, TemplateDraft, TemplateRequest,
};

/// Quiet period after the last edit before a preview is requested.
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(400);

/// Which endpoint accepted a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedVia {
    /// `/templates/v2`.
    Advanced,
    /// `/templates`, after the advanced endpoint failed or by request.
    Legacy,
}

/// A created template and the route that accepted it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTemplate {
    /// The stored template.
    pub template: Template,
    /// Which endpoint created it.
    pub via: CreatedVia,
}

impl CreatedTemplate {
    /// Status line for the studio.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self.via {
            CreatedVia::Advanced => "Template created successfully.",
            CreatedVia::Legacy => "Template created using legacy endpoint.",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    #[serde(default)]
    preview_text: Option<String>,
}

impl CrmClient {
    /// Lists all templates.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`](crate::ApiError::Network) - Network request failed
    /// * [`ApiError::InvalidResponse`](crate::ApiError::InvalidResponse) - Response could not be parsed
    pub async fn list_templates(&self) -> ApiResult<Vec<Template>> {
        self.get_list("/templates").await
    }

    /// Fetches one template.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when not found.
    pub async fn get_template(&self, id: &str) -> ApiResult<Template> {
        self.get(&format!("/templates/{id}")).await
    }

    /// Creates a template through the legacy endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when rejected.
    pub async fn create_legacy_template(&self, req: &LegacyTemplateRequest) -> ApiResult<Template> {
        self.post("/templates", req).await
    }

    /// Updates a template through the legacy endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when rejected.
    pub async fn update_legacy_template(
        &self,
        id: &str,
        req: &LegacyTemplateRequest,
    ) -> ApiResult<Template> {
        self.put(&format!("/templates/{id}"), req).await
    }

    /// Creates a template through the advanced endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when rejected.
    pub async fn create_advanced_template(
        &self,
        req: &AdvancedTemplateRequest,
    ) -> ApiResult<Template> {
        self.post("/templates/v2", req).await
    }

    /// Updates a template through the advanced endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when rejected.
    pub async fn update_advanced_template(
        &self,
        id: &str,
        req: &AdvancedTemplateRequest,
    ) -> ApiResult<Template> {
        self.put(&format!("/templates/v2/{id}"), req).await
    }

    /// Deletes a template.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when not found.
    pub async fn delete_template(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/templates/{id}")).await
    }

    /// Creates a template, falling back to the legacy endpoint.
    ///
    /// A legacy request goes straight to `/templates`. An advanced request
    /// goes to `/templates/v2`; if that fails for any reason other than an
    /// auth rejection, the equivalent legacy request is sent instead.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Unauthorized`](crate::ApiError::Unauthorized) - never retried
    /// * any error from the legacy endpoint once the fallback is taken
    pub async fn create_template(&self, req: &TemplateRequest) -> ApiResult<CreatedTemplate> {
        match req {
            TemplateRequest::Legacy(legacy) => Ok(CreatedTemplate {
                template: self.create_legacy_template(legacy).await?,
                via: CreatedVia::Legacy,
            }),
            TemplateRequest::Advanced(advanced) => {
                match self.create_advanced_template(advanced).await {
                    Ok(template) => Ok(CreatedTemplate {
                        template,
                        via: CreatedVia::Advanced,
                    }),
                    Err(e) if e.is_unauthorized() => Err(e),
                    Err(e) => {
                        tracing::warn!(
                            name = %advanced.name,
                            error = %e,
                            "Advanced template endpoint failed, using legacy endpoint"
                        );
                        let template = self.create_legacy_template(&advanced.to_legacy()).await?;
                        Ok(CreatedTemplate {
                            template,
                            via: CreatedVia::Legacy,
                        })
                    }
                }
            }
        }
    }

    /// Updates a template through the endpoint matching the request shape.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when rejected.
    pub async fn update_template(&self, id: &str, req: &TemplateRequest) -> ApiResult<Template> {
        match req {
            TemplateRequest::Legacy(legacy) => self.update_legacy_template(id, legacy).await,
            TemplateRequest::Advanced(advanced) => self.update_advanced_template(id, advanced).await,
        }
    }

    /// Renders a preview of the draft's body.
    ///
    /// Asks the backend first. Any failure, or an empty `previewText`, falls
    /// back to [`TemplateDraft::local_preview_body`]; this never errors.
    pub async fn preview_template(&self, draft: &TemplateDraft) -> String {
        let result: ApiResult<PreviewResponse> =
            self.post("/templates/v2/preview", &draft.to_request()).await;
        match result {
            Ok(PreviewResponse {
                preview_text: Some(text),
            }) if !text.is_empty() => text,
            Ok(_) => draft.local_preview_body(),
            Err(e) => {
                tracing::debug!(error = %e, "Preview endpoint failed, rendering locally");
                draft.local_preview_body()
            }
        }
    }

    /// [`CrmClient::preview_template`] after waiting out `delay`.
    ///
    /// Dropping the future during the wait sends nothing, so an editor that
    /// restarts this on each change only requests the final draft.
    pub async fn preview_template_debounced(&self, draft: &TemplateDraft, delay: Duration) -> String {
        tokio::time::sleep(delay).await;
        self.preview_template(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::logged_in_client;
    use crate::template::{HeaderKind, LanguageCode, TemplateContent};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn draft() -> TemplateDraft {
        let mut draft = TemplateDraft::new();
        draft.name = "welcome".into();
        draft.language = LanguageCode::EnUs;
        draft.header_kind = HeaderKind::Image;
        draft.header_media_handle = "h".into();
        draft.set_body("Hi {{1}}");
        draft
    }

    fn template_json(id: &str) -> serde_json::Value {
        json!({"id": id, "name": "welcome", "content": "Hi {{1}}", "type": "TEXT", "active": true})
    }

    #[tokio::test]
    async fn advanced_success_reports_advanced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates/v2"))
            .respond_with(ResponseTemplate::new(201).set_body_json(template_json("t-2")))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let created = client
            .create_template(&TemplateRequest::Advanced(draft().to_request()))
            .await
            .unwrap();

        assert_eq!(created.via, CreatedVia::Advanced);
        assert_eq!(created.template.id, "t-2");
    }

    #[tokio::test]
    async fn advanced_failure_falls_back_to_legacy_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates/v2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/templates"))
            .and(body_json(json!({
                "name": "welcome",
                "content": "Hi {{1}}",
                "type": "IMAGE",
                "languageCode": "en"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(template_json("t-1")))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let created = client
            .create_template(&TemplateRequest::Advanced(draft().to_request()))
            .await
            .unwrap();

        assert_eq!(created.via, CreatedVia::Legacy);
        assert_eq!(created.message(), "Template created using legacy endpoint.");
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates/v2"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/templates"))
            .respond_with(ResponseTemplate::new(201).set_body_json(template_json("t-1")))
            .expect(0)
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let err = client
            .create_template(&TemplateRequest::Advanced(draft().to_request()))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn legacy_request_goes_straight_to_templates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates"))
            .and(body_json(json!({"name": "n", "content": {"body": "b"}, "type": "TEXT", "languageCode": "hi"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(template_json("t-3")))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let req = TemplateRequest::Legacy(LegacyTemplateRequest {
            name: "n".into(),
            content: TemplateContent::Structured { body: "b".into() },
            kind: "TEXT".into(),
            language_code: Some(LanguageCode::Hi),
            provider_template_id: None,
        });
        assert_eq!(client.create_template(&req).await.unwrap().via, CreatedVia::Legacy);
    }

    #[tokio::test]
    async fn preview_uses_server_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates/v2/preview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"previewText": "Hi Asha"})))
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        assert_eq!(client.preview_template(&draft()).await, "Hi Asha");
    }

    #[tokio::test]
    async fn preview_falls_back_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates/v2/preview"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        assert_eq!(client.preview_template(&draft()).await, "Hi sample_1");

        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/templates/v2/preview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"previewText": ""})))
            .mount(&server)
            .await;
        assert_eq!(client.preview_template(&draft()).await, "Hi sample_1");
    }

    #[tokio::test]
    async fn superseded_previews_send_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates/v2/preview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"previewText": "Hi Asha"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let delay = Duration::from_millis(200);
        for _ in 0..3 {
            let d = draft();
            let pending = client.preview_template_debounced(&d, delay);
            assert!(tokio::time::timeout(Duration::from_millis(20), pending)
                .await
                .is_err());
        }
        assert_eq!(client.preview_template_debounced(&draft(), delay).await, "Hi Asha");
    }
}
