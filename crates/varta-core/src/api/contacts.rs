//! Contact endpoints.

use super::client::CrmClient;
use crate::contact::{Contact, ContactRequest};
use crate::error::ApiResult;

impl CrmClient {
    /// Lists all contacts.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`](crate::ApiError::Network) - Network request failed
    /// * [`ApiError::InvalidResponse`](crate::ApiError::InvalidResponse) - Response could not be parsed
    pub async fn list_contacts(&self) -> ApiResult<Vec<Contact>> {
        self.get_list("/contacts").await
    }

    /// Creates a contact.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when the
    /// backend rejects the contact (e.g. duplicate phone).
    pub async fn create_contact(&self, req: &ContactRequest) -> ApiResult<Contact> {
        let contact: Contact = self.post("/contacts", req).await?;
        tracing::info!(id = %contact.id, "Created contact");
        Ok(contact)
    }

    /// Updates a contact.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when the
    /// contact does not exist or the update is rejected.
    pub async fn update_contact(&self, id: &str, req: &ContactRequest) -> ApiResult<Contact> {
        self.put(&format!("/contacts/{id}"), req).await
    }

    /// Deletes a contact.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when the
    /// contact does not exist.
    pub async fn delete_contact(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/contacts/{id}")).await?;
        tracing::info!(id, "Deleted contact");
        Ok(())
    }
}
