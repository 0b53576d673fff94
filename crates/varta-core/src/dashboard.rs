//! Dashboard statistics and the tenant profile.

use serde::{Deserialize, Serialize};

use crate::campaign::Campaign;
use crate::contact::null_as_default;

/// Message shown when the user has no tenant.
pub const NO_CLIENT_ID_MESSAGE: &str = "Client ID is not available for this user.";

/// Headline numbers for the dashboard. Missing values read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Contacts in the address book.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_contacts: u64,
    /// Campaigns pending or running.
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_campaigns: u64,
    /// Messages accepted by the provider.
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages_sent: u64,
    /// Messages that failed delivery.
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_messages: u64,
    /// Most recent campaigns.
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_campaigns: Vec<Campaign>,
}

impl DashboardStats {
    /// Stat cards as `(title, value)` in display order.
    #[must_use]
    pub fn cards(&self) -> [(&'static str, u64); 4] {
        [
            ("Total Contacts", self.total_contacts),
            ("Active Campaigns", self.active_campaigns),
            ("Messages Sent", self.messages_sent),
            ("Failed Messages", self.failed_messages),
        ]
    }
}

/// Tenant details from `GET /clients/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    /// Client ID.
    pub id: String,
    /// Business name.
    #[serde(default)]
    pub name: String,
    /// WhatsApp phone number ID.
    #[serde(default)]
    pub phone_number_id: Option<String>,
    /// WhatsApp Business Account ID.
    #[serde(default)]
    pub waba_id: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_and_null_stats_are_zero() {
        let stats: DashboardStats =
            serde_json::from_value(json!({"totalContacts": 4, "messagesSent": null})).unwrap();
        assert_eq!(
            stats.cards(),
            [
                ("Total Contacts", 4),
                ("Active Campaigns", 0),
                ("Messages Sent", 0),
                ("Failed Messages", 0),
            ]
        );
        assert!(stats.recent_campaigns.is_empty());
    }

    #[test]
    fn client_profile_field_names() {
        let profile: ClientProfile = serde_json::from_value(json!({
            "id": "tenant-9",
            "name": "Acme",
            "phoneNumberId": "1099",
            "wabaId": "2088"
        }))
        .unwrap();
        assert_eq!(profile.waba_id.as_deref(), Some("2088"));
        assert_eq!(profile.created_at, None);
    }
}
