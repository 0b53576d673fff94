//! Dashboard statistics endpoint.

use reqwest::Method;

use super::client::{decode_or_default, CrmClient};
use crate::dashboard::DashboardStats;
use crate::error::ApiResult;

impl CrmClient {
    /// Headline statistics; an empty body reads as all zeros.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`](crate::ApiError::Network) - Network request failed
    /// * [`ApiError::InvalidResponse`](crate::ApiError::InvalidResponse) - Response could not be parsed
    pub async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let res = self
            .send(self.request(Method::GET, "/dashboard/stats"))
            .await?;
        let stats: Option<DashboardStats> = decode_or_default(res).await?;
        Ok(stats.unwrap_or_default())
    }
}
