//! # Profile Panel
//!
//! Dropdown with the operator's account and tenant details.

use dioxus::prelude::*;
use varta_core::dashboard::NO_CLIENT_ID_MESSAGE;
use varta_core::time::display_date;

use crate::state::AppState;

/// Account and tenant details, loaded when the panel opens.
#[component]
pub fn ProfilePanel(on_close: EventHandler<()>) -> Element {
    let state = use_context::<AppState>();
    let user = state.user();
    let has_client_id = user.as_ref().is_some_and(|u| u.client_id.is_some());

    let profile = use_resource(move || {
        let client = state.client();
        async move {
            if has_client_id {
                Some(client.current_client().await)
            } else {
                None
            }
        }
    });

    rsx! {
        div {
            class: "profile-panel glass-panel",

            div { class: "profile-header",
                h3 { "Profile" }
                button {
                    class: "btn-sm btn-ghost",
                    onclick: move |_| on_close.call(()),
                    "Close"
                }
            }

            if let Some(user) = user.as_ref() {
                dl { class: "profile-fields",
                    dt { "Username" }
                    dd { "{user.username}" }
                    dt { "Role" }
                    dd { "{user.role}" }
                    dt { "Client ID" }
                    dd { class: "mono", "{user.client_id.as_deref().unwrap_or(\"N/A\")}" }
                }
            }

            h4 { class: "section-label", "Client Details" }

            match &*profile.read() {
                None => rsx! {
                    div { class: "loading", "Loading client details..." }
                },
                Some(None) => rsx! {
                    p { class: "text-secondary", "{NO_CLIENT_ID_MESSAGE}" }
                },
                Some(Some(Err(err))) => rsx! {
                    div { class: "alert alert-error", "{err.user_message()}" }
                },
                Some(Some(Ok(client))) => rsx! {
                    dl { class: "profile-fields",
                        dt { "Name" }
                        dd { "{client.name}" }
                        dt { "Phone Number ID" }
                        dd { class: "mono", "{client.phone_number_id.as_deref().unwrap_or(\"N/A\")}" }
                        dt { "WABA ID" }
                        dd { class: "mono", "{client.waba_id.as_deref().unwrap_or(\"N/A\")}" }
                        dt { "Created" }
                        dd {
                            {client.created_at.as_deref().map_or_else(|| "N/A".to_string(), display_date)}
                        }
                    }
                },
            }
        }
    }
}
