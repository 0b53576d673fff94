//! # Message Templates
//!
//! Template records, the two request shapes the backend accepts, and the
//! [`TemplateDraft`] builder behind the template studio.
//!
//! The backend has two creation surfaces for the same resource:
//!
//! - the legacy flat shape (`POST /templates`): name, body, type, language
//! - the advanced component shape (`POST /templates/v2`): header, body with
//!   sample values, footer and buttons
//!
//! [`TemplateRequest`] names which one a caller means. The fallback from the
//! advanced shape to the legacy one lives in a single adapter,
//! [`CrmClient::create_template`](crate::CrmClient::create_template).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::placeholder::{extract_placeholder_keys, render_keys, render_placeholders, SampleValues};

/// Body preview shown when the draft has no body yet.
pub const EMPTY_BODY_PREVIEW: &str = "Template body preview appears here.";

/// Template content: a flat string, or an object with a `body` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateContent {
    /// Plain body text.
    Text(String),
    /// Structured content carrying the body.
    Structured {
        /// Body text.
        body: String,
    },
    /// Any other shape the backend returns, kept verbatim.
    Other(serde_json::Value),
}

impl TemplateContent {
    /// The body text, or the raw JSON for unrecognized shapes.
    #[must_use]
    pub fn body(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured { body } => body.clone(),
            Self::Other(serde_json::Value::Null) => String::new(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl Default for TemplateContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// A template as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Template ID.
    pub id: String,
    /// Template name.
    pub name: String,
    /// Body content.
    #[serde(default)]
    pub content: TemplateContent,
    /// Legacy type (TEXT, MEDIA, INTERACTIVE, or a header format).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Category for advanced templates.
    #[serde(default)]
    pub category: Option<String>,
    /// Language code.
    #[serde(default)]
    pub language: Option<String>,
    /// Whether the template may be used.
    #[serde(default)]
    pub active: bool,
    /// Provider-side review status.
    #[serde(default)]
    pub status: Option<String>,
    /// Provider template identifier.
    #[serde(default)]
    pub provider_template_id: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Template {
    /// Body text of the template.
    #[must_use]
    pub fn body(&self) -> String {
        self.content.body()
    }

    /// Placeholder keys in the body.
    #[must_use]
    pub fn placeholder_keys(&self) -> Vec<String> {
        extract_placeholder_keys(&self.body())
    }

    /// Category if set, else the legacy type.
    #[must_use]
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.kind)
    }

    /// Language, defaulting to `en`.
    #[must_use]
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or("en")
    }
}

/// Template category for the advanced shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateCategory {
    /// Promotional content.
    #[default]
    Marketing,
    /// Transactional updates.
    Utility,
    /// One-time passwords.
    Authentication,
}

impl TemplateCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Marketing, Self::Utility, Self::Authentication];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marketing => "MARKETING",
            Self::Utility => "UTILITY",
            Self::Authentication => "AUTHENTICATION",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(value))
    }
}

/// Template language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LanguageCode {
    /// English.
    #[default]
    #[serde(rename = "en")]
    En,
    /// Hindi.
    #[serde(rename = "hi")]
    Hi,
    /// US English; the legacy endpoint only knows `en`.
    #[serde(rename = "en_US")]
    EnUs,
}

impl LanguageCode {
    /// All languages in display order.
    pub const ALL: [Self; 3] = [Self::En, Self::Hi, Self::EnUs];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::EnUs => "en_US",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == value)
    }

    /// The code accepted by the legacy endpoint.
    #[must_use]
    pub fn legacy(self) -> Self {
        match self {
            Self::EnUs => Self::En,
            other => other,
        }
    }
}

/// Header kind of an advanced template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeaderKind {
    /// No header component.
    #[default]
    None,
    /// Text header, may contain placeholders.
    Text,
    /// Image header.
    Image,
    /// Video header.
    Video,
    /// Document header.
    Document,
    /// Location header.
    Location,
}

impl HeaderKind {
    /// All kinds in display order.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Text,
        Self::Image,
        Self::Video,
        Self::Document,
        Self::Location,
    ];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
            Self::Document => "DOCUMENT",
            Self::Location => "LOCATION",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str().eq_ignore_ascii_case(value))
    }

    /// Returns true for image, video and document headers.
    #[must_use]
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Document)
    }
}

/// Button kind of an advanced template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonKind {
    /// Canned reply.
    #[default]
    QuickReply,
    /// Opens a URL.
    Url,
    /// Calls a phone number.
    PhoneNumber,
    /// Copies a code.
    CopyCode,
    /// Starts a WhatsApp voice call.
    VoiceCall,
    /// One-time password.
    Otp,
}

impl ButtonKind {
    /// All kinds in display order.
    pub const ALL: [Self; 6] = [
        Self::QuickReply,
        Self::Url,
        Self::PhoneNumber,
        Self::CopyCode,
        Self::VoiceCall,
        Self::Otp,
    ];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QuickReply => "QUICK_REPLY",
            Self::Url => "URL",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::CopyCode => "COPY_CODE",
            Self::VoiceCall => "VOICE_CALL",
            Self::Otp => "OTP",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str().eq_ignore_ascii_case(value))
    }

    /// Returns true if the target is sent as `url`.
    #[must_use]
    pub fn targets_url(self) -> bool {
        matches!(self, Self::Url | Self::Otp)
    }

    /// Returns true if the target is sent as `phoneNumber`.
    #[must_use]
    pub fn targets_phone(self) -> bool {
        matches!(self, Self::PhoneNumber | Self::VoiceCall)
    }
}

impl fmt::Display for ButtonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template button.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateButton {
    /// Button kind.
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    /// Label.
    #[serde(default)]
    pub text: String,
    /// Target URL for URL and OTP buttons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Target number for phone and voice-call buttons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Example value (dynamic URL suffix, coupon code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl TemplateButton {
    /// The URL or phone target, whichever applies.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().or(self.phone_number.as_deref())
    }

    /// Routes `value` to `url` or `phoneNumber` according to the kind.
    ///
    /// Kinds without a target clear both fields.
    pub fn set_target(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.kind.targets_url() {
            self.url = Some(value);
            self.phone_number = None;
        } else if self.kind.targets_phone() {
            self.phone_number = Some(value);
            self.url = None;
        } else {
            self.url = None;
            self.phone_number = None;
        }
    }

    /// Text used when previewing the button.
    #[must_use]
    pub fn preview_label(&self) -> String {
        let label = if self.text.is_empty() {
            self.target().filter(|t| !t.is_empty()).unwrap_or("Action")
        } else {
            &self.text
        };
        format!("[{}] {label}", self.kind)
    }
}

/// Header format inside a `HEADER` component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeaderFormat {
    /// Text header.
    Text,
    /// Image header.
    Image,
    /// Video header.
    Video,
    /// Document header.
    Document,
    /// Location header.
    Location,
}

impl HeaderFormat {
    fn from_kind(kind: HeaderKind) -> Option<Self> {
        match kind {
            HeaderKind::None => None,
            HeaderKind::Text => Some(Self::Text),
            HeaderKind::Image => Some(Self::Image),
            HeaderKind::Video => Some(Self::Video),
            HeaderKind::Document => Some(Self::Document),
            HeaderKind::Location => Some(Self::Location),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
            Self::Document => "DOCUMENT",
            Self::Location => "LOCATION",
        }
    }
}

/// One component of an advanced template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TemplateComponent {
    /// Header.
    Header {
        /// Header format.
        format: HeaderFormat,
        /// Text for text headers.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Uploaded media handle for media headers.
        #[serde(
            rename = "mediaHandle",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        media_handle: Option<String>,
    },
    /// Body with one sample per placeholder, in key order.
    Body {
        /// Body text.
        text: String,
        /// Sample values.
        #[serde(rename = "sampleValues", default)]
        sample_values: Vec<String>,
    },
    /// Footer.
    Footer {
        /// Footer text.
        text: String,
    },
    /// Buttons.
    Buttons {
        /// Buttons in display order.
        buttons: Vec<TemplateButton>,
    },
}

/// Legacy flat template body (`POST/PUT /templates`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTemplateRequest {
    /// Template name.
    pub name: String,
    /// Body content.
    pub content: TemplateContent,
    /// Type: TEXT, MEDIA, INTERACTIVE or a header format.
    #[serde(rename = "type")]
    pub kind: String,
    /// Language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<LanguageCode>,
    /// Provider template ID.
    #[serde(
        rename = "provider_template_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_template_id: Option<String>,
}

/// Advanced component template body (`POST/PUT /templates/v2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedTemplateRequest {
    /// Template name.
    pub name: String,
    /// Category.
    pub category: TemplateCategory,
    /// Language code.
    pub language_code: LanguageCode,
    /// Components in order: header, body, footer, buttons.
    pub components: Vec<TemplateComponent>,
}

impl AdvancedTemplateRequest {
    /// Body text from the `BODY` component.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.components
            .iter()
            .find_map(|c| match c {
                TemplateComponent::Body { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Header format, if the request has a header.
    #[must_use]
    pub fn header_format(&self) -> Option<HeaderFormat> {
        self.components.iter().find_map(|c| match c {
            TemplateComponent::Header { format, .. } => Some(*format),
            _ => None,
        })
    }

    /// The equivalent legacy request.
    ///
    /// The type is the header format (TEXT without a header) and `en_US` is
    /// narrowed to `en`.
    #[must_use]
    pub fn to_legacy(&self) -> LegacyTemplateRequest {
        LegacyTemplateRequest {
            name: self.name.clone(),
            content: TemplateContent::Text(self.body_text().to_string()),
            kind: self
                .header_format()
                .unwrap_or(HeaderFormat::Text)
                .as_str()
                .to_string(),
            language_code: Some(self.language_code.legacy()),
            provider_template_id: None,
        }
    }
}

/// The two ways of creating or updating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRequest {
    /// Flat body via `/templates`.
    Legacy(LegacyTemplateRequest),
    /// Components via `/templates/v2`.
    Advanced(AdvancedTemplateRequest),
}

impl TemplateRequest {
    /// Template name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Legacy(r) => &r.name,
            Self::Advanced(r) => &r.name,
        }
    }
}

/// Editable state of the template studio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    /// Template name.
    pub name: String,
    /// Category.
    pub category: TemplateCategory,
    /// Language.
    pub language: LanguageCode,
    /// Header kind.
    pub header_kind: HeaderKind,
    /// Header text (text headers).
    pub header_text: String,
    /// Media handle (media headers).
    pub header_media_handle: String,
    /// Body text.
    pub body: String,
    /// Footer text; omitted when blank.
    pub footer: String,
    /// Buttons in order.
    pub buttons: Vec<TemplateButton>,
    /// Per-placeholder sample values.
    pub samples: SampleValues,
}

impl TemplateDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder keys detected in the body.
    #[must_use]
    pub fn placeholder_keys(&self) -> Vec<String> {
        extract_placeholder_keys(&self.body)
    }

    /// Replaces the body and re-keys the samples.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        let keys = self.placeholder_keys();
        self.samples.sync(&keys);
    }

    /// Appends an empty quick-reply button.
    pub fn add_button(&mut self) {
        self.buttons.push(TemplateButton::default());
    }

    /// Removes the button at `index`, if any.
    pub fn remove_button(&mut self, index: usize) {
        if index < self.buttons.len() {
            self.buttons.remove(index);
        }
    }

    /// Mutable access to the button at `index`.
    pub fn button_mut(&mut self, index: usize) -> Option<&mut TemplateButton> {
        self.buttons.get_mut(index)
    }

    /// Builds the advanced request.
    #[must_use]
    pub fn to_request(&self) -> AdvancedTemplateRequest {
        let mut components = Vec::with_capacity(4);

        if let Some(format) = HeaderFormat::from_kind(self.header_kind) {
            let (text, media_handle) = match format {
                HeaderFormat::Text => (Some(self.header_text.clone()), None),
                HeaderFormat::Location => (None, None),
                _ => (None, Some(self.header_media_handle.clone())),
            };
            components.push(TemplateComponent::Header {
                format,
                text,
                media_handle,
            });
        }

        let keys = self.placeholder_keys();
        components.push(TemplateComponent::Body {
            text: self.body.clone(),
            sample_values: self.samples.ordered(&keys),
        });

        if !self.footer.trim().is_empty() {
            components.push(TemplateComponent::Footer {
                text: self.footer.clone(),
            });
        }

        if !self.buttons.is_empty() {
            components.push(TemplateComponent::Buttons {
                buttons: self.buttons.clone(),
            });
        }

        AdvancedTemplateRequest {
            name: self.name.clone(),
            category: self.category,
            language_code: self.language,
            components,
        }
    }

    /// Body with samples substituted, computed locally.
    #[must_use]
    pub fn local_preview_body(&self) -> String {
        if self.body.trim().is_empty() {
            return EMPTY_BODY_PREVIEW.to_string();
        }
        render_placeholders(&self.body, &self.samples)
    }

    /// Header line for the preview; empty when there is no header.
    #[must_use]
    pub fn preview_header(&self) -> String {
        match self.header_kind {
            HeaderKind::None => String::new(),
            HeaderKind::Text => {
                let text = if self.header_text.is_empty() {
                    "Header text"
                } else {
                    &self.header_text
                };
                render_keys(text, &self.placeholder_keys(), &self.samples)
            }
            HeaderKind::Location => "Location Header".to_string(),
            kind => {
                let handle = self.header_media_handle.trim();
                if handle.is_empty() {
                    format!("{} Header", kind.as_str())
                } else {
                    format!("{} Header ({handle})", kind.as_str())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn order_draft() -> TemplateDraft {
        let mut draft = TemplateDraft::new();
        draft.name = "order_update".into();
        draft.category = TemplateCategory::Utility;
        draft.language = LanguageCode::EnUs;
        draft.set_body("Hello {{1}}, your order {{2}} is confirmed.");
        draft.samples.set("1", "Asha");
        draft
    }

    #[test]
    fn body_only_request_shape() {
        let json = serde_json::to_value(order_draft().to_request()).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "order_update",
                "category": "UTILITY",
                "languageCode": "en_US",
                "components": [
                    {
                        "type": "BODY",
                        "text": "Hello {{1}}, your order {{2}} is confirmed.",
                        "sampleValues": ["Asha", "sample_2"]
                    }
                ]
            })
        );
    }

    #[test]
    fn full_request_shape() {
        let mut draft = order_draft();
        draft.header_kind = HeaderKind::Image;
        draft.header_media_handle = "4::aW".into();
        draft.footer = "Reply STOP to unsubscribe".into();
        draft.add_button();
        draft.add_button();
        {
            let button = draft.button_mut(1).unwrap();
            button.kind = ButtonKind::Url;
            button.text = "Track".into();
            button.set_target("https://example.test/t");
        }
        draft.button_mut(0).unwrap().text = "Thanks".into();

        let json = serde_json::to_value(draft.to_request()).unwrap();
        let components = json["components"].as_array().unwrap();

        assert_eq!(
            components[0],
            json!({"type": "HEADER", "format": "IMAGE", "mediaHandle": "4::aW"})
        );
        assert_eq!(components[2], json!({"type": "FOOTER", "text": "Reply STOP to unsubscribe"}));
        assert_eq!(
            components[3],
            json!({
                "type": "BUTTONS",
                "buttons": [
                    {"type": "QUICK_REPLY", "text": "Thanks"},
                    {"type": "URL", "text": "Track", "url": "https://example.test/t"}
                ]
            })
        );
    }

    #[test]
    fn location_and_text_headers() {
        let mut draft = order_draft();
        draft.header_kind = HeaderKind::Location;
        let json = serde_json::to_value(draft.to_request()).unwrap();
        assert_eq!(json["components"][0], json!({"type": "HEADER", "format": "LOCATION"}));

        draft.header_kind = HeaderKind::Text;
        draft.header_text = "Order {{1}}".into();
        let json = serde_json::to_value(draft.to_request()).unwrap();
        assert_eq!(
            json["components"][0],
            json!({"type": "HEADER", "format": "TEXT", "text": "Order {{1}}"})
        );
    }

    #[test]
    fn blank_footer_is_omitted() {
        let mut draft = order_draft();
        draft.footer = "   ".into();
        assert_eq!(draft.to_request().components.len(), 1);
    }

    #[test]
    fn button_target_routing() {
        let mut button = TemplateButton {
            kind: ButtonKind::VoiceCall,
            ..TemplateButton::default()
        };
        button.set_target("919800000001");
        assert_eq!(button.phone_number.as_deref(), Some("919800000001"));
        assert_eq!(button.url, None);

        button.kind = ButtonKind::Otp;
        button.set_target("https://otp.test");
        assert_eq!(button.url.as_deref(), Some("https://otp.test"));
        assert_eq!(button.phone_number, None);

        button.kind = ButtonKind::CopyCode;
        button.set_target("SAVE10");
        assert_eq!(button.target(), None);
    }

    #[test]
    fn remove_button_out_of_range_is_noop() {
        let mut draft = TemplateDraft::new();
        draft.add_button();
        draft.remove_button(5);
        assert_eq!(draft.buttons.len(), 1);
        draft.remove_button(0);
        assert!(draft.buttons.is_empty());
    }

    #[test]
    fn local_preview_substitutes_samples() {
        assert_eq!(
            order_draft().local_preview_body(),
            "Hello Asha, your order sample_2 is confirmed."
        );
        assert_eq!(TemplateDraft::new().local_preview_body(), EMPTY_BODY_PREVIEW);
    }

    #[test]
    fn preview_header_variants() {
        let mut draft = order_draft();
        assert_eq!(draft.preview_header(), "");

        draft.header_kind = HeaderKind::Text;
        assert_eq!(draft.preview_header(), "Header text");
        draft.header_text = "For {{1}}".into();
        assert_eq!(draft.preview_header(), "For Asha");
        draft.header_text = "For {{1}} ref {{7}}".into();
        assert_eq!(draft.preview_header(), "For Asha ref {{7}}");

        draft.header_kind = HeaderKind::Location;
        assert_eq!(draft.preview_header(), "Location Header");

        draft.header_kind = HeaderKind::Video;
        assert_eq!(draft.preview_header(), "VIDEO Header");
        draft.header_media_handle = "h1".into();
        assert_eq!(draft.preview_header(), "VIDEO Header (h1)");
    }

    #[test]
    fn legacy_conversion_normalizes_language_and_type() {
        let mut draft = order_draft();
        let legacy = draft.to_request().to_legacy();
        assert_eq!(legacy.kind, "TEXT");
        assert_eq!(legacy.language_code, Some(LanguageCode::En));
        assert_eq!(legacy.content.body(), draft.body);

        draft.header_kind = HeaderKind::Document;
        draft.language = LanguageCode::Hi;
        let legacy = draft.to_request().to_legacy();
        assert_eq!(legacy.kind, "DOCUMENT");
        assert_eq!(legacy.language_code, Some(LanguageCode::Hi));
    }

    #[test]
    fn legacy_request_wire_names() {
        let req = LegacyTemplateRequest {
            name: "promo".into(),
            content: TemplateContent::Structured { body: "Hi {{1}}".into() },
            kind: "TEXT".into(),
            language_code: Some(LanguageCode::Hi),
            provider_template_id: Some("p-1".into()),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "name": "promo",
                "content": {"body": "Hi {{1}}"},
                "type": "TEXT",
                "languageCode": "hi",
                "provider_template_id": "p-1"
            })
        );
    }

    #[test]
    fn template_content_shapes() {
        let flat: Template =
            serde_json::from_value(json!({"id": "1", "name": "a", "content": "Hi {{1}}", "type": "TEXT"}))
                .unwrap();
        let structured: Template =
            serde_json::from_value(json!({"id": "2", "name": "b", "content": {"body": "Yo"}})).unwrap();

        assert_eq!(flat.placeholder_keys(), vec!["1"]);
        assert_eq!(structured.body(), "Yo");
        assert_eq!(structured.language_or_default(), "en");
        assert_eq!(flat.label(), "TEXT");
    }

    #[test]
    fn enum_parsing_round_trips_wire_names() {
        for kind in ButtonKind::ALL {
            assert_eq!(ButtonKind::parse(kind.as_str()), Some(kind));
        }
        for kind in HeaderKind::ALL {
            assert_eq!(HeaderKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(LanguageCode::parse("en_US"), Some(LanguageCode::EnUs));
        assert_eq!(TemplateCategory::parse("utility"), Some(TemplateCategory::Utility));
    }

    #[test]
    fn button_preview_label_falls_back() {
        let mut button = TemplateButton::default();
        assert_eq!(button.preview_label(), "[QUICK_REPLY] Action");
        button.kind = ButtonKind::Url;
        button.set_target("https://x.test");
        assert_eq!(button.preview_label(), "[URL] https://x.test");
    }
}
