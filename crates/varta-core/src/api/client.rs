//! # API Client
//!
//! Shared HTTP plumbing for every Varta endpoint.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE};
use crate::session::SessionStore;

/// Header carrying the tenant identifier.
pub const CLIENT_ID_HEADER: &str = "X-Client-Id";

/// HTTP client for the Varta CRM API.
///
/// Cheap to clone; clones share the connection pool and the session store.
/// Every request carries the current bearer token and tenant header. A 401
/// or 403 from any endpoint clears the session store before the error is
/// returned, so subscribers see the logout.
///
/// # Examples
///
/// ```rust,no_run
/// use varta_core::{CrmClient, SessionStore};
///
/// # async fn run() -> varta_core::ApiResult<()> {
/// let client = CrmClient::new("http://127.0.0.1:8080/api/v1", SessionStore::in_memory())?;
/// let stats = client.dashboard_stats().await?;
/// println!("{} contacts", stats.total_contacts);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CrmClient {
    base_url: String,
    http: Client,
    session: SessionStore,
}

impl CrmClient {
    /// Creates a client with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> ApiResult<Self> {
        Self::with_timeout(base_url, session, Duration::from_secs(30))
    }

    /// Creates a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config, session: SessionStore) -> ApiResult<Self> {
        Self::with_timeout(
            &config.api_url,
            session,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Creates a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: SessionStore,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("varta/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store this client reads credentials from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Starts a request with credentials attached.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "API request");
        let mut req = self.http.request(method, self.url(path));
        if let Some(session) = self.session.current() {
            req = req.bearer_auth(&session.token);
            if let Some(client_id) = session.client_id() {
                req = req.header(CLIENT_ID_HEADER, client_id);
            }
        }
        req
    }

    /// Sends a request and maps non-success statuses to errors.
    pub(crate) async fn send(&self, req: RequestBuilder) -> ApiResult<Response> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "Session rejected, logging out");
            self.session.clear();
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let body = res.text().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::warn!(status = status.as_u16(), %message, "API request failed");
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let res = self.send(self.request(Method::GET, path)).await?;
        decode(res).await
    }

    /// GETs a list; a `null` or empty body is an empty list.
    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let res = self.send(self.request(Method::GET, path)).await?;
        let list: Option<Vec<T>> = decode_or_default(res).await?;
        Ok(list.unwrap_or_default())
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let res = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        decode(res).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let res = self.send(self.request(Method::PUT, path).json(body)).await?;
        decode(res).await
    }

    /// POSTs and ignores the response body.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        self.send(self.request(Method::POST, path).json(body))
            .await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Decodes a JSON body.
pub(crate) async fn decode<T: DeserializeOwned>(res: Response) -> ApiResult<T> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Decodes a JSON body, treating an empty body as `T::default()`.
pub(crate) async fn decode_or_default<T: DeserializeOwned + Default>(res: Response) -> ApiResult<T> {
    let bytes = res.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Picks the human-readable message out of an error body.
///
/// Prefers `message`, then `error`, then [`GENERIC_ERROR_MESSAGE`].
pub(crate) fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };
    ["message", "error"]
        .iter()
        .find_map(|key| {
            json.get(key)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::session::tests::sample_session;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A client pointed at `server` with a logged-in session.
    pub(crate) fn logged_in_client(server: &MockServer) -> CrmClient {
        let store = SessionStore::in_memory();
        store.set(sample_session()).unwrap();
        CrmClient::new(server.uri(), store).unwrap()
    }

    #[test]
    fn error_message_precedence() {
        assert_eq!(error_message(r#"{"message":"m","error":"e"}"#), "m");
        assert_eq!(error_message(r#"{"message":"","error":"e"}"#), "e");
        assert_eq!(error_message(r#"{"status":500}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(error_message("<html>"), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CrmClient::new("http://x/api/v1/", SessionStore::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://x/api/v1");
        assert_eq!(client.url("/contacts"), "http://x/api/v1/contacts");
    }

    #[tokio::test]
    async fn attaches_bearer_and_tenant_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts"))
            .and(header("Authorization", "Bearer tok-123"))
            .and(header(CLIENT_ID_HEADER, "tenant-9"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let list: Vec<serde_json::Value> = client.get_list("/contacts").await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn anonymous_requests_have_no_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri(), SessionStore::in_memory()).unwrap();
        let _: serde_json::Value = client.get("/ping").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
        assert!(requests[0].headers.get(CLIENT_ID_HEADER).is_none());
    }

    #[tokio::test]
    async fn unauthorized_and_forbidden_clear_session() {
        for status in [401u16, 403] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let client = logged_in_client(&server);
            let mut rx = client.session().subscribe();
            rx.borrow_and_update();

            let err = client.get::<serde_json::Value>("/templates").await.unwrap_err();

            assert!(matches!(err, ApiError::Unauthorized { status: s } if s == status));
            assert!(!client.session().is_authenticated());
            assert!(rx.has_changed().unwrap());
        }
    }

    #[tokio::test]
    async fn backend_errors_carry_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(serde_json::json!({"error": "Duplicate phone"})),
            )
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let err = client
            .post::<serde_json::Value, _>("/contacts", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Backend { status: 409, .. }));
        assert_eq!(err.user_message(), "Duplicate phone");
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn null_list_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let list: Vec<serde_json::Value> = client.get_list("/templates").await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = logged_in_client(&server);
        let err = client.get::<serde_json::Value>("/x").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
