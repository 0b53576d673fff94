//! # Stat Card
//!
//! A single headline number on the dashboard.

use dioxus::prelude::*;

/// A titled number.
#[component]
pub fn StatCard(title: String, value: u64) -> Element {
    rsx! {
        div {
            class: "stat-card glass-panel-static",
            span { class: "stat-title text-secondary", "{title}" }
            span { class: "stat-value", "{value}" }
        }
    }
}
