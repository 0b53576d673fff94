//! # API Module
//!
//! HTTP client for the Varta CRM backend.
//!
//! [`CrmClient`] owns transport concerns (base URL, bearer token, tenant
//! header, error normalization). Each resource module adds its endpoints as
//! `impl CrmClient` blocks:
//!
//! - [`auth`] - login, registration, logout
//! - [`contacts`] - contact CRUD
//! - [`templates`] - legacy and advanced templates, preview
//! - [`campaigns`] - campaign list, CSV upload, response export
//! - [`messages`] - send and history
//! - [`clients`] - tenant profile
//! - [`dashboard`] - headline statistics

pub mod auth;
pub mod campaigns;
pub mod client;
pub mod clients;
pub mod contacts;
pub mod dashboard;
pub mod messages;
pub mod templates;

pub use auth::AuthResponse;
pub use client::CrmClient;
pub use templates::{CreatedTemplate, CreatedVia, PREVIEW_DEBOUNCE};
