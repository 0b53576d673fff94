//! # Layout Components
//!
//! Route guards and the application shell.

use dioxus::prelude::*;

use super::{Header, Sidebar};
use crate::router::Route;
use crate::state::AppState;

/// Guard and shell for authenticated routes.
///
/// Shows a placeholder while the saved session loads, sends anonymous users
/// to `/login`, and otherwise renders the shell around the routed view.
///
/// # Structure
///
/// ```text
/// +---------------------------------------------+
/// | Sidebar |         Header                    |
/// |         |------------------------------------|
/// |  Nav    |                                   |
/// |  Items  |         Main Content              |
/// |         |         (Outlet)                  |
/// |         |                                   |
/// +---------------------------------------------+
/// ```
#[component]
pub fn ProtectedLayout() -> Element {
    let mut state = use_context::<AppState>();
    let nav = use_navigator();

    use_effect(move || {
        if !*state.loading.read() && state.session.read().is_none() {
            tracing::debug!("Not authenticated, redirecting to login");
            nav.replace(Route::Login {});
        }
    });

    if *state.loading.read() {
        return rsx! {
            div { class: "loading fullscreen", "Loading..." }
        };
    }
    if !state.is_logged_in() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "app-layout",

            Sidebar {}

            div {
                class: "main-panel",

                Header {}

                if let Some(err) = state.last_error.read().as_ref() {
                    div {
                        class: "alert alert-error banner",
                        span { "{err}" }
                        button {
                            class: "btn-sm btn-ghost",
                            onclick: move |_| state.clear_error(),
                            "Dismiss"
                        }
                    }
                }

                main {
                    class: "content",

                    Outlet::<Route> {}
                }
            }
        }
    }
}

/// Guard for public routes.
///
/// Renders nothing while the saved session loads and sends authenticated
/// users to the dashboard.
#[component]
pub fn PublicLayout() -> Element {
    let state = use_context::<AppState>();
    let nav = use_navigator();

    use_effect(move || {
        if !*state.loading.read() && state.session.read().is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    if *state.loading.read() || state.is_logged_in() {
        return rsx! {};
    }

    rsx! {
        Outlet::<Route> {}
    }
}
