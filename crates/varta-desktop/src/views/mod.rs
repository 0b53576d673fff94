//! # Views
//!
//! Page-level view components for the Varta desktop application.
//!
//! - [`Login`] - Username and password login
//! - [`Dashboard`] - Statistics and recent campaigns
//! - [`Contacts`] - Contact management
//! - [`Templates`] - Template list and simple form
//! - [`TemplateStudio`] - Component template builder
//! - [`Campaigns`] - Campaign creation and history
//! - [`QuickSend`] - One-to-one chat

mod campaigns;
mod contacts;
mod dashboard;
mod login;
mod quick_send;
mod template_studio;
mod templates;

pub use campaigns::Campaigns;
pub use contacts::Contacts;
pub use dashboard::Dashboard;
pub use login::Login;
pub use quick_send::QuickSend;
pub use template_studio::TemplateStudio;
pub use templates::Templates;
