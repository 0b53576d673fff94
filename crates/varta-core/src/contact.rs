//! Contact records and the client-side list filter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ApiError, ApiResult};
use crate::phone::normalize_phone;

/// Deserializes `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A contact as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Phone number without a leading `+`.
    pub phone: String,
    /// Free-form tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Arbitrary string metadata (the form stores `email` here).
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: BTreeMap<String, String>,
    /// Email, when the backend returns it directly.
    #[serde(default)]
    pub email: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Contact {
    /// Email from the dedicated field or from `metadata.email`.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or_else(|| self.metadata.get("email").map(String::as_str))
            .filter(|e| !e.is_empty())
    }

    /// Case-insensitive match on name, plain substring match on phone.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase()) || self.phone.contains(term)
    }
}

/// Returns the contacts matching `term`; an empty term matches everything.
#[must_use]
pub fn filter_contacts<'a>(contacts: &'a [Contact], term: &str) -> Vec<&'a Contact> {
    contacts.iter().filter(|c| c.matches(term)).collect()
}

/// Body for creating or updating a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    /// Display name.
    pub name: String,
    /// Normalized phone number.
    pub phone: String,
    /// Free-form tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Metadata; `email` when one was entered.
    pub metadata: BTreeMap<String, String>,
}

impl ContactRequest {
    /// Validates form input and builds a request.
    ///
    /// Name and phone are required. The phone is normalized and a non-blank
    /// email is stored under `metadata.email`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when name or phone is blank.
    pub fn from_form(name: &str, phone: &str, email: Option<&str>) -> ApiResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::invalid_input("name", "Name is required"));
        }

        let phone = normalize_phone(phone);
        if phone.is_empty() {
            return Err(ApiError::invalid_input("phone", "Phone is required"));
        }

        let mut metadata = BTreeMap::new();
        if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
            metadata.insert("email".to_string(), email.to_string());
        }

        Ok(Self {
            name: name.to_string(),
            phone,
            tags: Vec::new(),
            metadata,
        })
    }

    /// Adds tags to the request.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contact(name: &str, phone: &str) -> Contact {
        Contact {
            id: format!("id-{phone}"),
            name: name.into(),
            phone: phone.into(),
            tags: Vec::new(),
            metadata: BTreeMap::new(),
            email: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn filter_matches_name_case_insensitively_and_phone() {
        let list = vec![
            contact("Asha Rao", "919800000001"),
            contact("Vikram", "919800000002"),
        ];

        let by_name: Vec<_> = filter_contacts(&list, "asha").iter().map(|c| c.name.clone()).collect();
        assert_eq!(by_name, vec!["Asha Rao"]);

        assert_eq!(filter_contacts(&list, "0002").len(), 1);
        assert_eq!(filter_contacts(&list, "").len(), 2);
        assert!(filter_contacts(&list, "zzz").is_empty());
    }

    #[test]
    fn form_normalizes_phone_and_stores_email() {
        let req = ContactRequest::from_form(" Asha ", " +919800000001", Some("a@b.co")).unwrap();
        assert_eq!(req.name, "Asha");
        assert_eq!(req.phone, "919800000001");
        assert_eq!(req.metadata.get("email").map(String::as_str), Some("a@b.co"));
    }

    #[test]
    fn form_requires_name_and_phone() {
        assert!(matches!(
            ContactRequest::from_form("", "1", None),
            Err(ApiError::InvalidInput { field: "name", .. })
        ));
        assert!(matches!(
            ContactRequest::from_form("A", " + ", None),
            Err(ApiError::InvalidInput { field: "phone", .. })
        ));
    }

    #[test]
    fn request_serializes_empty_metadata_and_omits_tags() {
        let req = ContactRequest::from_form("A", "1", Some("  ")).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "A", "phone": "1", "metadata": {}})
        );
    }

    #[test]
    fn email_falls_back_to_metadata() {
        let mut c = contact("A", "1");
        c.metadata.insert("email".into(), "m@x.io".into());
        assert_eq!(c.email(), Some("m@x.io"));
    }

    #[test]
    fn contact_deserializes_with_missing_optionals() {
        let with_nulls: Contact =
            serde_json::from_str(r#"{"id":"1","name":"A","phone":"1","tags":null,"metadata":null}"#)
                .unwrap();
        let bare: Contact = serde_json::from_str(r#"{"id":"1","name":"A","phone":"1"}"#).unwrap();

        assert!(with_nulls.tags.is_empty());
        assert!(with_nulls.metadata.is_empty());
        assert_eq!(with_nulls, bare);
    }
}
