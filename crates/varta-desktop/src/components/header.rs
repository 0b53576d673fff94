//! # Header Component
//!
//! Application header with the page title and user menu.

use dioxus::prelude::*;

use super::ProfilePanel;
use crate::router::Route;
use crate::state::AppState;

fn page_title(route: &Route) -> &'static str {
    match route {
        Route::Dashboard {} => "Dashboard",
        Route::Contacts {} => "Contacts",
        Route::Templates {} => "Templates",
        Route::TemplateStudio {} => "Template Studio",
        Route::Campaigns {} => "Campaigns",
        Route::QuickSend {} => "Quick Send",
        _ => "Varta CRM",
    }
}

/// Application header component.
///
/// Displays the current page title, the user's avatar and role, and a
/// logout button. Clicking the user opens the profile panel.
#[component]
pub fn Header() -> Element {
    let mut state = use_context::<AppState>();
    let route = use_route::<Route>();
    let mut show_profile = use_signal(|| false);

    let user = state.user();

    rsx! {
        header {
            class: "app-header",

            h1 { "{page_title(&route)}" }

            div { class: "header-right",
                if let Some(user) = user {
                    button {
                        class: "user-menu",
                        onclick: move |_| show_profile.toggle(),
                        div { class: "user-avatar",
                            "{user.username.chars().next().unwrap_or('?').to_uppercase()}"
                        }
                        div { class: "user-info",
                            span { class: "username", "{user.username}" }
                            span { class: "role text-secondary", "{user.role}" }
                        }
                    }
                }
                button {
                    class: "btn-sm btn-ghost",
                    onclick: move |_| state.logout(),
                    "Logout"
                }
            }

            if *show_profile.read() {
                ProfilePanel { on_close: move |()| show_profile.set(false) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_follow_route() {
        assert_eq!(page_title(&Route::QuickSend {}), "Quick Send");
        assert_eq!(page_title(&Route::Login {}), "Varta CRM");
    }
}
