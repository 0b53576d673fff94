//! Login, registration and logout.

use serde::{Deserialize, Serialize};

use super::client::CrmClient;
use crate::error::{ApiError, ApiResult};
use crate::session::{Session, User};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Preferred token field.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Older token field.
    #[serde(default)]
    pub token: Option<String>,
    /// The authenticated user.
    pub user: User,
}

impl AuthResponse {
    /// Converts into a session, taking `accessToken` before `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidResponse`] if neither token is present.
    pub fn into_session(self) -> ApiResult<Session> {
        let token = [self.access_token, self.token]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("login response has no token".into()))?;
        Ok(Session {
            token,
            user: self.user,
        })
    }
}

impl CrmClient {
    /// Logs in and stores the resulting session.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Backend`] - credentials rejected
    /// * [`ApiError::Unauthorized`] - credentials rejected with 401/403
    /// * [`ApiError::InvalidResponse`] - no token in the response
    ///
    /// A session file that cannot be written is logged and the session is
    /// kept in memory only.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Session> {
        let res: AuthResponse = self
            .post("/auth/login", &Credentials { username, password })
            .await?;
        let session = res.into_session()?;
        if let Err(e) = self.session().set(session.clone()) {
            tracing::warn!(error = %e, "Session not persisted; keeping it in memory");
        }
        tracing::info!(username = %session.user.username, "Logged in");
        Ok(session)
    }

    /// Registers a new operator account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] if the backend rejects the account.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<()> {
        self.post_unit("/auth/register", &Credentials { username, password })
            .await?;
        tracing::info!(username, "Registered account");
        Ok(())
    }

    /// Clears the stored session.
    pub fn logout(&self) {
        self.session().clear();
        tracing::info!("Logged out");
    }
}
