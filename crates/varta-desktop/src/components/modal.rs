//! # Modal Components
//!
//! Overlay dialogs used by the list views.

use dioxus::prelude::*;

/// A titled overlay. Clicking the backdrop closes it.
#[component]
pub fn Modal(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),

            div {
                class: "modal glass-panel",
                onclick: move |evt| evt.stop_propagation(),

                div { class: "modal-header",
                    h3 { "{title}" }
                    button {
                        class: "btn-sm btn-ghost",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }

                {children}
            }
        }
    }
}

/// Inline yes/no confirmation.
#[component]
pub fn ConfirmDialog(
    message: String,
    #[props(default = "Delete".to_string())] confirm_label: String,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        Modal {
            title: "Confirm",
            on_close: move |()| on_cancel.call(()),

            p { class: "mb-md", "{message}" }

            div { class: "btn-group",
                button {
                    class: "btn-danger",
                    onclick: move |_| on_confirm.call(()),
                    "{confirm_label}"
                }
                button {
                    class: "btn-glass",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
