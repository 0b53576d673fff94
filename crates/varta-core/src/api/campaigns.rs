//! Campaign endpoints.

use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use reqwest::Method;

use super::client::{decode_or_default, CrmClient};
use crate::campaign::{
    filename_from_disposition, Campaign, CampaignCreated, CampaignExport, CampaignStatus,
    CampaignUpload,
};
use crate::error::ApiResult;

impl CrmClient {
    /// Lists all campaigns.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`](crate::ApiError::Network) - Network request failed
    /// * [`ApiError::InvalidResponse`](crate::ApiError::InvalidResponse) - Response could not be parsed
    pub async fn list_campaigns(&self) -> ApiResult<Vec<Campaign>> {
        self.get_list("/campaigns").await
    }

    /// Fetches one campaign.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when not found.
    pub async fn get_campaign(&self, id: &str) -> ApiResult<Campaign> {
        self.get(&format!("/campaigns/{id}")).await
    }

    /// Uploads a CSV and creates a campaign.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when the
    /// backend rejects the upload.
    pub async fn create_campaign(&self, upload: CampaignUpload) -> ApiResult<CampaignCreated> {
        let name = upload.name().to_string();
        let form = upload.into_form()?;
        let res = self
            .send(
                self.request(Method::POST, "/campaigns/upload-csv")
                    .multipart(form),
            )
            .await?;
        let created: CampaignCreated = decode_or_default::<Option<CampaignCreated>>(res)
            .await?
            .unwrap_or_else(|| CampaignCreated {
                id: String::new(),
                name: name.clone(),
                status: CampaignStatus::Pending,
            });
        tracing::info!(id = %created.id, %name, "Created campaign");
        Ok(created)
    }

    /// Downloads the campaign's responses as CSV.
    ///
    /// The file name comes from `Content-Disposition`, defaulting to
    /// [`CampaignExport::default_filename`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`](crate::ApiError::Backend) when the
    /// export is not available.
    pub async fn export_campaign_responses(&self, id: &str) -> ApiResult<CampaignExport> {
        let res = self
            .send(
                self.request(Method::GET, &format!("/campaigns/{id}/responses/export"))
                    .header(ACCEPT, "text/csv, */*"),
            )
            .await?;

        let filename = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| CampaignExport::default_filename(id));
        let bytes = res.bytes().await?.to_vec();

        Ok(CampaignExport { filename, bytes })
    }
}
