//! # Dashboard View
//!
//! Headline statistics and the most recent campaigns.

use dioxus::prelude::*;
use varta_core::time::display_date;

use crate::components::StatCard;
use crate::router::Route;
use crate::state::AppState;

/// Dashboard view.
///
/// Missing statistics render as zero.
#[component]
pub fn Dashboard() -> Element {
    let state = use_context::<AppState>();

    let stats = use_resource(move || {
        let client = state.client();
        async move { client.dashboard_stats().await }
    });

    rsx! {
        div {
            class: "dashboard-view",

            match &*stats.read() {
                Some(Ok(stats)) => rsx! {
                    div { class: "stat-grid",
                        for (title, value) in stats.cards() {
                            StatCard { title: title.to_string(), value }
                        }
                    }

                    div { class: "section-header",
                        h3 { "Recent Campaigns" }
                        Link { to: Route::Campaigns {}, class: "btn-sm btn-glass", "View all" }
                    }

                    if stats.recent_campaigns.is_empty() {
                        p { class: "text-secondary", "No campaigns yet." }
                    } else {
                        table { class: "data-table",
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Status" }
                                    th { "Progress" }
                                    th { "Created" }
                                }
                            }
                            tbody {
                                for campaign in stats.recent_campaigns.iter() {
                                    tr { key: "{campaign.id}",
                                        td { "{campaign.name}" }
                                        td {
                                            span {
                                                class: "badge badge-{campaign.status.as_str().to_lowercase()}",
                                                "{campaign.status}"
                                            }
                                        }
                                        td { "{campaign.progress_label()}" }
                                        td {
                                            {campaign.created_at.as_deref().map(display_date).unwrap_or_default()}
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                Some(Err(err)) => rsx! {
                    div {
                        class: "alert alert-error",
                        "Error loading dashboard: {err.user_message()}"
                    }
                },
                None => rsx! {
                    div {
                        class: "loading",
                        "Loading dashboard..."
                    }
                },
            }
        }
    }
}
