//! Tenant profile endpoint.

use super::client::CrmClient;
use crate::dashboard::{ClientProfile, NO_CLIENT_ID_MESSAGE};
use crate::error::{ApiError, ApiResult};

impl CrmClient {
    /// Fetches a tenant profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] when the client does not exist.
    pub async fn get_client(&self, id: &str) -> ApiResult<ClientProfile> {
        self.get(&format!("/clients/{id}")).await
    }

    /// Fetches the profile of the logged-in user's tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when the session has no client id,
    /// otherwise the errors of [`CrmClient::get_client`].
    pub async fn current_client(&self) -> ApiResult<ClientProfile> {
        let Some(id) = self.session().client_id() else {
            return Err(ApiError::invalid_input("clientId", NO_CLIENT_ID_MESSAGE));
        };
        self.get_client(&id).await
    }
}
