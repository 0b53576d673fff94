//! # Varta Core
//!
//! Typed client and client-side domain logic for the Varta WhatsApp CRM.
//!
//! The backend owns every piece of state (contacts, templates, campaigns,
//! message delivery). This crate gives the desktop and command-line front ends
//! a single typed surface over its REST API, plus the handful of rules the
//! client applies before talking to it.
//!
//! ## Modules
//!
//! - [`api`] - HTTP client and one service module per backend resource
//! - [`session`] - Persisted, observable login session
//! - [`config`] - Client configuration (API URL, timeouts)
//! - [`contact`], [`template`], [`campaign`], [`message`] - Resource types and
//!   their client-side helpers
//! - [`placeholder`] - `{{n}}` placeholder detection and substitution
//! - [`phone`] - Phone number normalization
//! - [`history`] - Guard against stale chat-history responses
//!
//! ## Example
//!
//! ```rust,no_run
//! use varta_core::{CrmClient, SessionStore};
//!
//! # async fn run() -> varta_core::ApiResult<()> {
//! let store = SessionStore::in_memory();
//! let client = CrmClient::new("http://localhost:8080/api/v1", store)?;
//!
//! client.login("operator", "secret").await?;
//! for contact in client.list_contacts().await? {
//!     println!("{} <{}>", contact.name, contact.phone);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod campaign;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod message;
pub mod phone;
pub mod placeholder;
pub mod session;
pub mod template;
pub mod time;

pub use api::{CreatedTemplate, CreatedVia, CrmClient};
pub use campaign::{Campaign, CampaignCreated, CampaignExport, CampaignStatus, CampaignUpload};
pub use config::Config;
pub use contact::{filter_contacts, Contact, ContactRequest};
pub use dashboard::{ClientProfile, DashboardStats};
pub use error::{ApiError, ApiResult, ConfigError, SessionError};
pub use history::{HistoryGuard, HistoryTicket};
pub use message::{Direction, DeliveryStatus, MediaKind, Message, MessageContent, SendMessageRequest};
pub use phone::normalize_phone;
pub use placeholder::{extract_placeholder_keys, render_placeholders, SampleValues};
pub use session::{Session, SessionStore, User};
pub use template::{
    AdvancedTemplateRequest, ButtonKind, HeaderKind, LanguageCode, LegacyTemplateRequest,
    Template, TemplateButton, TemplateCategory, TemplateComponent, TemplateContent,
    TemplateDraft, TemplateRequest,
};
