//! # Sidebar Component
//!
//! Navigation sidebar for the application.

use dioxus::prelude::*;

use crate::router::Route;

/// Navigation sidebar component.
#[component]
pub fn Sidebar() -> Element {
    let links = [
        (Route::Dashboard {}, "Dashboard"),
        (Route::Contacts {}, "Contacts"),
        (Route::Templates {}, "Templates"),
        (Route::TemplateStudio {}, "Template Studio"),
        (Route::Campaigns {}, "Campaigns"),
        (Route::QuickSend {}, "Quick Send"),
    ];

    rsx! {
        nav {
            class: "sidebar",

            div {
                class: "sidebar-brand",
                "Varta"
            }

            div {
                class: "nav-links",

                for (route, label) in links {
                    Link {
                        to: route,
                        class: "nav-link",
                        active_class: "active",
                        "{label}"
                    }
                }
            }
        }
    }
}
