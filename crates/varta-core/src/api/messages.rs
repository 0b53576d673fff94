//! Message send and history endpoints.

use reqwest::Method;

use super::client::{decode_or_default, CrmClient};
use crate::error::ApiResult;
use crate::message::{sort_chronologically, Message, SendMessageRequest};
use crate::phone::normalize_phone;

impl CrmClient {
    /// Sends a text or template message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when the
    /// backend or provider rejects the message.
    pub async fn send_message(&self, req: &SendMessageRequest) -> ApiResult<()> {
        self.post_unit("/messages/send", req).await?;
        tracing::info!(to = %req.to, template = ?req.template_id, "Sent message");
        Ok(())
    }

    /// Chat history for `phone`, oldest first.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`](crate::ApiError::Network) - Network request failed
    /// * [`ApiError::InvalidResponse`](crate::ApiError::InvalidResponse) - Response could not be parsed
    pub async fn message_history(&self, phone: &str) -> ApiResult<Vec<Message>> {
        let phone = normalize_phone(phone);
        let res = self
            .send(
                self.request(Method::GET, "/messages/history")
                    .query(&[("phone", phone.as_str())]),
            )
            .await?;
        let mut messages: Vec<Message> = decode_or_default::<Option<Vec<Message>>>(res)
            .await?
            .unwrap_or_default();
        sort_chronologically(&mut messages);
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::client::tests::logged_in_client;
    use crate::message::MessageContent;
    use crate::SendMessageRequest;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn history_is_queried_by_phone_and_sorted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages/history"))
            .and(query_param("phone", "919800000001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "m-2",
                    "contactId": "c-1",
                    "direction": "INCOMING",
                    "status": "READ",
                    "payloadJson": "{\"text\":{\"body\":\"thanks\"}}",
                    "createdAt": "2025-03-01T10:00:00Z"
                },
                {
                    "id": "m-1",
                    "contactId": "c-1",
                    "direction": "OUTGOING",
                    "status": "DELIVERED",
                    "payloadJson": "{\"templateName\":\"order_update\"}",
                    "createdAt": "2025-03-01T09:00:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let history = client.message_history("+919800000001").await.unwrap();

        let ids: Vec<_> = history.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m-1", "m-2"]);
        assert!(history[0].is_outgoing());
        assert_eq!(history[1].content(), MessageContent::Text("thanks".into()));
    }

    #[tokio::test]
    async fn send_template_with_variables() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages/send"))
            .and(body_json(json!({
                "to": "919800000001",
                "templateId": "t-1",
                "variables": {"1": "Asha"}
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let vars = BTreeMap::from([("1".to_string(), "Asha".to_string())]);
        let req = SendMessageRequest::template("919800000001", "t-1", vars).unwrap();
        client.send_message(&req).await.unwrap();
    }
}
