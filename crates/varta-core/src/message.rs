//! # Chat Messages
//!
//! Message history records and the decoder for their provider-shaped
//! payloads.
//!
//! The backend stores each message's WhatsApp payload verbatim as a JSON
//! string. [`MessageContent::decode`] turns it into a tagged value once, so
//! rendering code matches on variants instead of probing JSON fields.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::contact::null_as_default;
use crate::error::{ApiError, ApiResult};
use crate::phone::normalize_phone;
use crate::placeholder::extract_placeholder_keys;
use crate::template::Template;
use crate::time::parse_timestamp;

/// Text sent when no template is selected.
pub const DEFAULT_TEXT: &str = "Hello";

/// Message direction relative to the business number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Sent by the business.
    Outgoing,
    /// Received from the contact.
    Incoming,
    /// A value this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Delivery status reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    /// Accepted by the provider.
    Sent,
    /// Delivered to the handset.
    Delivered,
    /// Read by the recipient.
    Read,
    /// Delivery failed.
    Failed,
    /// A value this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeliveryStatus {
    /// Tick marks shown next to outgoing messages.
    #[must_use]
    pub fn ticks(self) -> &'static str {
        match self {
            Self::Read => "✓✓",
            Self::Failed => "!",
            _ => "✓",
        }
    }
}

/// A message from the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID.
    pub id: String,
    /// Contact the message belongs to.
    #[serde(default)]
    pub contact_id: String,
    /// Direction.
    #[serde(default)]
    pub direction: Direction,
    /// Delivery status.
    #[serde(default)]
    pub status: DeliveryStatus,
    /// Raw provider payload as a JSON string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload_json: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: String,
}

impl Message {
    /// Returns true for messages sent by the business.
    #[must_use]
    pub fn is_outgoing(&self) -> bool {
        self.direction == Direction::Outgoing
    }

    /// Decoded payload.
    #[must_use]
    pub fn content(&self) -> MessageContent {
        MessageContent::decode(&self.payload_json)
    }

    /// Parsed creation time.
    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Local `HH:MM` of the creation time, empty when unparsable.
    #[must_use]
    pub fn time_label(&self) -> String {
        self.created()
            .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Sorts messages oldest first. Unparsable times sort before all others.
pub fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by_key(Message::created);
}

/// Media message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Image.
    Image,
    /// Video.
    Video,
    /// Audio or voice note.
    Audio,
    /// Document.
    Document,
    /// Sticker.
    Sticker,
}

impl MediaKind {
    const ALL: [Self; 5] = [
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Document,
        Self::Sticker,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Sticker => "sticker",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image message",
            Self::Video => "Video message",
            Self::Audio => "Audio message",
            Self::Document => "Document message",
            Self::Sticker => "Sticker",
        }
    }
}

/// A decoded message payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// No payload.
    Empty,
    /// Plain text.
    Text(String),
    /// Template message.
    Template {
        /// Template name.
        name: String,
        /// Rendered or raw body, if the payload carries one.
        body: Option<String>,
        /// Variables sent with the template.
        variables: serde_json::Map<String, Value>,
    },
    /// Media attachment.
    Media(MediaKind),
    /// Reply to an interactive message.
    Interactive {
        /// Button, list row or flow title.
        title: String,
    },
    /// Shared location.
    Location {
        /// Place name, if any.
        name: Option<String>,
    },
    /// Shared contact card.
    Contacts,
    /// Reaction to another message.
    Reaction {
        /// The emoji, possibly empty.
        emoji: String,
    },
    /// A declared type this client does not render specially.
    Other(String),
    /// Unparsable or typeless payload, kept as text.
    Unknown(String),
}

/// JavaScript-style truthiness, which is what the providers' payloads assume.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(_) => true,
    }
}

fn first_truthy<'a>(candidates: impl IntoIterator<Item = Option<&'a Value>>) -> Option<&'a Value> {
    candidates.into_iter().find(|v| truthy(*v)).flatten()
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |v, k| v.get(k))
}

fn first_message(payload: &Value) -> Option<&Value> {
    payload.get("messages").and_then(|m| m.get(0))
}

impl MessageContent {
    /// Decodes a raw payload string.
    ///
    /// Shapes are tried in order: text body, template, image, video, audio,
    /// document, sticker, interactive, location, contacts, reaction. A payload
    /// with another declared `type` (or `messages[0].type`) becomes
    /// [`MessageContent::Other`]; anything else is [`MessageContent::Unknown`].
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(payload) => Self::from_value(&payload),
            Err(_) => Self::Unknown(raw.to_string()),
        }
    }

    /// Decodes an already-parsed payload.
    #[must_use]
    pub fn from_value(payload: &Value) -> Self {
        let declared = first_truthy([
            payload.get("type"),
            first_message(payload).and_then(|m| m.get("type")),
        ]);
        let kind = declared.and_then(Value::as_str).unwrap_or_default();

        if let Some(body) = first_truthy([path(payload, &["text", "body"])]) {
            return Self::Text(text_of(body));
        }
        if kind == "text" {
            if let Some(body) = first_truthy([payload.get("body")]) {
                return Self::Text(text_of(body));
            }
        }

        if kind == "template" || truthy(payload.get("templateName")) {
            let name = first_truthy([
                payload.get("templateName"),
                path(payload, &["template", "name"]),
            ])
            .map_or_else(|| "template_message".to_string(), text_of);
            let body = first_truthy([payload.get("body"), path(payload, &["template", "body"])])
                .map(text_of);
            let variables = payload
                .get("variables")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            return Self::Template {
                name,
                body,
                variables,
            };
        }

        for media in MediaKind::ALL {
            if truthy(payload.get(media.key())) || kind == media.key() {
                return Self::Media(media);
            }
        }

        if truthy(payload.get("interactive")) || kind == "interactive" {
            let interactive =
                first_truthy([payload.get("interactive"), first_message(payload).and_then(|m| m.get("interactive"))]);
            let title = interactive
                .and_then(|i| {
                    first_truthy([
                        path(i, &["button_reply", "title"]),
                        path(i, &["list_reply", "title"]),
                        path(i, &["nfm_reply", "name"]),
                    ])
                })
                .map_or_else(|| "Interactive response".to_string(), text_of);
            return Self::Interactive { title };
        }

        if truthy(payload.get("location")) || kind == "location" {
            let name = first_truthy([path(payload, &["location", "name"])]).map(text_of);
            return Self::Location { name };
        }

        if truthy(payload.get("contacts")) || kind == "contacts" {
            return Self::Contacts;
        }

        if truthy(payload.get("reaction")) || kind == "reaction" {
            let emoji = first_truthy([
                path(payload, &["reaction", "emoji"]),
                first_message(payload).and_then(|m| path(m, &["reaction", "emoji"])),
            ])
            .map(text_of)
            .unwrap_or_default();
            return Self::Reaction { emoji };
        }

        match declared {
            Some(kind) => Self::Other(text_of(kind)),
            None => Self::Unknown(payload.to_string()),
        }
    }

    /// Icon shown before the summary.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Media(MediaKind::Image) => "📷",
            Self::Media(MediaKind::Video) => "🎥",
            Self::Media(MediaKind::Audio) => "🎵",
            Self::Media(MediaKind::Document) => "📄",
            Self::Media(MediaKind::Sticker) => "🧩",
            Self::Interactive { .. } => "🧠",
            Self::Location { .. } => "📍",
            Self::Contacts => "👤",
            Self::Reaction { .. } => "🙂",
            _ => "",
        }
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("(No Content)"),
            Self::Text(body) | Self::Unknown(body) => f.write_str(body),
            Self::Template { name, body, .. } => write!(
                f,
                "Template: {name} - {}",
                body.as_deref().unwrap_or("Template message sent")
            ),
            Self::Media(kind) => f.write_str(kind.label()),
            Self::Interactive { title } => f.write_str(title),
            Self::Location { name: Some(name) } => write!(f, "Location ({name})"),
            Self::Location { name: None } => f.write_str("Location"),
            Self::Contacts => f.write_str("Contact card shared"),
            Self::Reaction { emoji } if emoji.is_empty() => f.write_str("Reaction"),
            Self::Reaction { emoji } => write!(f, "Reaction {emoji}"),
            Self::Other(kind) => write!(f, "{} message", kind.to_uppercase()),
        }
    }
}

/// Body of `POST /messages/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Recipient phone number.
    pub to: String,
    /// Template to send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Template variables by placeholder key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    /// Freeform text, sent only without a template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SendMessageRequest {
    fn recipient(to: &str) -> ApiResult<String> {
        let to = normalize_phone(to);
        if to.is_empty() {
            return Err(ApiError::invalid_input("to", "Recipient phone is required"));
        }
        Ok(to)
    }

    /// A freeform text message. A blank body falls back to [`DEFAULT_TEXT`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when the recipient is blank.
    pub fn text(to: &str, body: &str) -> ApiResult<Self> {
        let body = if body.trim().is_empty() { DEFAULT_TEXT } else { body };
        Ok(Self {
            to: Self::recipient(to)?,
            template_id: None,
            variables: None,
            text: Some(body.to_string()),
        })
    }

    /// A template message. Empty variable maps are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when the recipient is blank.
    pub fn template(
        to: &str,
        template_id: impl Into<String>,
        variables: BTreeMap<String, String>,
    ) -> ApiResult<Self> {
        Ok(Self {
            to: Self::recipient(to)?,
            template_id: Some(template_id.into()),
            variables: (!variables.is_empty()).then_some(variables),
            text: None,
        })
    }
}

/// One empty variable per placeholder in the template body.
#[must_use]
pub fn empty_variables(template: &Template) -> BTreeMap<String, String> {
    extract_placeholder_keys(&template.body())
        .into_iter()
        .map(|k| (k, String::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decode(value: &Value) -> MessageContent {
        MessageContent::decode(&value.to_string())
    }

    #[test]
    fn empty_and_garbage() {
        assert_eq!(MessageContent::decode(""), MessageContent::Empty);
        assert_eq!(
            MessageContent::decode("not json"),
            MessageContent::Unknown("not json".into())
        );
    }

    #[test]
    fn text_shapes() {
        assert_eq!(
            decode(&json!({"text": {"body": "hi"}})),
            MessageContent::Text("hi".into())
        );
        assert_eq!(
            decode(&json!({"type": "text", "body": "yo"})),
            MessageContent::Text("yo".into())
        );
    }

    #[test]
    fn text_body_wins_over_template_name() {
        assert_eq!(
            decode(&json!({"text": {"body": "hi"}, "templateName": "promo"})),
            MessageContent::Text("hi".into())
        );
    }

    #[test]
    fn template_shapes() {
        let content = decode(&json!({
            "templateName": "order_update",
            "variables": {"1": "Asha"}
        }));
        let MessageContent::Template { name, body, variables } = content else {
            panic!("expected template");
        };
        assert_eq!(name, "order_update");
        assert_eq!(body, None);
        assert_eq!(variables.get("1"), Some(&json!("Asha")));

        let nested = decode(&json!({"type": "template", "template": {"name": "n", "body": "b"}}));
        assert_eq!(nested.to_string(), "Template: n - b");

        let bare = decode(&json!({"type": "template"}));
        assert_eq!(bare.to_string(), "Template: template_message - Template message sent");
    }

    #[test]
    fn media_in_priority_order() {
        assert_eq!(
            decode(&json!({"image": {"id": "1"}, "video": {"id": "2"}})),
            MessageContent::Media(MediaKind::Image)
        );
        assert_eq!(
            decode(&json!({"messages": [{"type": "sticker"}]})),
            MessageContent::Media(MediaKind::Sticker)
        );
    }

    #[test]
    fn interactive_titles() {
        assert_eq!(
            decode(&json!({"interactive": {"list_reply": {"title": "Row 2"}}})),
            MessageContent::Interactive { title: "Row 2".into() }
        );
        assert_eq!(
            decode(&json!({"messages": [{"type": "interactive", "interactive": {"nfm_reply": {"name": "flow"}}}]})),
            MessageContent::Interactive { title: "flow".into() }
        );
        assert_eq!(
            decode(&json!({"type": "interactive"})).to_string(),
            "Interactive response"
        );
    }

    #[test]
    fn location_contacts_reaction() {
        assert_eq!(
            decode(&json!({"location": {"name": "HQ", "latitude": 1.0}})).to_string(),
            "Location (HQ)"
        );
        assert_eq!(decode(&json!({"type": "location"})).to_string(), "Location");
        assert_eq!(decode(&json!({"contacts": []})), MessageContent::Contacts);
        assert_eq!(
            decode(&json!({"messages": [{"type": "reaction", "reaction": {"emoji": "👍"}}]})),
            MessageContent::Reaction { emoji: "👍".into() }
        );
    }

    #[test]
    fn unknown_type_and_typeless_fallbacks() {
        assert_eq!(decode(&json!({"type": "order"})).to_string(), "ORDER message");
        let raw = json!({"foo": 1});
        assert_eq!(decode(&raw), MessageContent::Unknown(raw.to_string()));
    }

    #[test]
    fn falsy_values_are_skipped() {
        assert_eq!(
            decode(&json!({"text": {"body": ""}, "image": 0, "type": "video"})),
            MessageContent::Media(MediaKind::Video)
        );
    }

    #[test]
    fn history_sorts_oldest_first() {
        let msg = |id: &str, at: &str| Message {
            id: id.into(),
            contact_id: "c".into(),
            direction: Direction::Incoming,
            status: DeliveryStatus::Read,
            payload_json: String::new(),
            created_at: at.into(),
        };
        let mut list = vec![
            msg("b", "2025-03-01T10:00:00Z"),
            msg("a", "2025-03-01T09:00:00"),
            msg("c", "2025-03-01T11:00:00+00:00"),
        ];
        sort_chronologically(&mut list);
        let ids: Vec<_> = list.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn message_deserializes_unknown_enums() {
        let m: Message = serde_json::from_value(json!({
            "id": "1",
            "direction": "SIDEWAYS",
            "status": "QUEUED",
            "payloadJson": null,
            "createdAt": "2025-03-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(m.direction, Direction::Unknown);
        assert_eq!(m.status, DeliveryStatus::Unknown);
        assert_eq!(m.content(), MessageContent::Empty);
    }

    #[test]
    fn send_request_shapes() {
        let text = SendMessageRequest::text("+919800000001", " ").unwrap();
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({"to": "919800000001", "text": "Hello"})
        );

        let tmpl = SendMessageRequest::template("1", "t-1", BTreeMap::new()).unwrap();
        assert_eq!(
            serde_json::to_value(&tmpl).unwrap(),
            json!({"to": "1", "templateId": "t-1"})
        );

        assert!(SendMessageRequest::text("  ", "x").is_err());
    }
}
