//! # Routing
//!
//! Defines the application routes, the auth guards and the redirects.

use dioxus::prelude::*;

use crate::components::{ProtectedLayout, PublicLayout};
use crate::views::{Campaigns, Contacts, Dashboard, Login, QuickSend, TemplateStudio, Templates};

/// Application routes.
///
/// Public routes render inside [`PublicLayout`], which sends authenticated
/// users to the dashboard. Everything else renders inside
/// [`ProtectedLayout`], which sends anonymous users to the login page.
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    /// Redirects to the dashboard.
    #[route("/")]
    Root {},

    #[layout(PublicLayout)]
        /// Username and password login.
        #[route("/login")]
        Login {},

        /// Self-service registration is disabled; redirects to login.
        #[route("/register")]
        Register {},
    #[end_layout]

    #[layout(ProtectedLayout)]
        /// Statistics and recent campaigns.
        #[route("/dashboard")]
        Dashboard {},

        /// Contact list with search, create, edit and delete.
        #[route("/contacts")]
        Contacts {},

        /// Simple template list and form.
        #[route("/templates")]
        Templates {},

        /// Component template builder with live preview.
        #[route("/templates/studio")]
        TemplateStudio {},

        /// Campaign creation from CSV and campaign history.
        #[route("/campaigns")]
        Campaigns {},

        /// One-to-one chat and quick send.
        #[route("/quick-send")]
        QuickSend {},
    #[end_layout]

    /// Any unknown path redirects to the dashboard.
    ///
    /// # Parameters
    ///
    /// * `segments` - The unmatched path segments
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

/// `/` redirects to the dashboard; the guard takes over from there.
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    use_effect(move || {
        nav.replace(Route::Dashboard {});
    });
    rsx! {}
}

/// `/register` redirects to the login page.
#[component]
fn Register() -> Element {
    let nav = use_navigator();
    use_effect(move || {
        nav.replace(Route::Login {});
    });
    rsx! {}
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let nav = use_navigator();
    use_effect(move || {
        tracing::debug!(path = %segments.join("/"), "Unknown route");
        nav.replace(Route::Dashboard {});
    });
    rsx! {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn paths_resolve_to_routes() {
        assert_eq!(Route::from_str("/quick-send").unwrap(), Route::QuickSend {});
        assert_eq!(
            Route::from_str("/templates/studio").unwrap(),
            Route::TemplateStudio {}
        );
        assert_eq!(Route::Campaigns {}.to_string(), "/campaigns");
    }

    #[test]
    fn unknown_paths_fall_through() {
        assert_eq!(
            Route::from_str("/reports/weekly").unwrap(),
            Route::NotFound {
                segments: vec!["reports".to_string(), "weekly".to_string()]
            }
        );
    }
}
