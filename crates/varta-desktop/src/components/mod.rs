//! # UI Components
//!
//! Reusable UI components for the Varta desktop application.
//!
//! - [`ProtectedLayout`] / [`PublicLayout`] - Route guards and the shell
//! - [`Sidebar`] - Navigation sidebar
//! - [`Header`] - Page title and user menu
//! - [`ProfilePanel`] - Account and tenant details
//! - [`StatCard`] - Dashboard number
//! - [`Modal`] / [`ConfirmDialog`] - Overlays

mod header;
mod layout;
mod modal;
mod profile_panel;
mod sidebar;
mod stat_card;

pub use header::Header;
pub use layout::{ProtectedLayout, PublicLayout};
pub use modal::{ConfirmDialog, Modal};
pub use profile_panel::ProfilePanel;
pub use sidebar::Sidebar;
pub use stat_card::StatCard;
