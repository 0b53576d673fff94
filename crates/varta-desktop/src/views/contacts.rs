//! # Contacts View
//!
//! Searchable contact list with a modal form for create and edit.

use dioxus::prelude::*;
use varta_core::{filter_contacts, Contact, ContactRequest};

use crate::components::{ConfirmDialog, Modal};
use crate::state::AppState;

/// What the contact modal is editing.
#[derive(Clone, PartialEq)]
enum Editing {
    New,
    Existing(String),
}

/// Contacts view component.
///
/// Every create, update or delete re-fetches the whole list.
#[component]
pub fn Contacts() -> Element {
    let state = use_context::<AppState>();

    let mut search = use_signal(String::new);
    let mut editing = use_signal(|| Option::<Editing>::None);
    let mut pending_delete = use_signal(|| Option::<Contact>::None);
    let mut notice = use_signal(|| Option::<Result<String, String>>::None);

    // Form fields
    let mut name_input = use_signal(String::new);
    let mut phone_input = use_signal(String::new);
    let mut email_input = use_signal(String::new);
    let mut saving = use_signal(|| false);
    let mut form_error = use_signal(|| Option::<String>::None);

    let mut contacts = use_resource(move || {
        let client = state.client();
        async move { client.list_contacts().await }
    });

    let mut open_form = move |contact: Option<&Contact>| {
        match contact {
            Some(c) => {
                name_input.set(c.name.clone());
                phone_input.set(c.phone.clone());
                email_input.set(c.email().unwrap_or_default().to_string());
                editing.set(Some(Editing::Existing(c.id.clone())));
            }
            None => {
                name_input.set(String::new());
                phone_input.set(String::new());
                email_input.set(String::new());
                editing.set(Some(Editing::New));
            }
        }
        form_error.set(None);
    };

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let Some(target) = editing.read().clone() else {
            return;
        };

        let email = email_input.read().clone();
        let req = match ContactRequest::from_form(
            &name_input.read(),
            &phone_input.read(),
            Some(email.as_str()),
        ) {
            Ok(req) => req,
            Err(e) => {
                form_error.set(Some(e.user_message()));
                return;
            }
        };

        let client = state.client();
        saving.set(true);
        form_error.set(None);

        spawn(async move {
            let result = match &target {
                Editing::New => client.create_contact(&req).await,
                Editing::Existing(id) => client.update_contact(id, &req).await,
            };
            match result {
                Ok(contact) => {
                    let verb = if target == Editing::New { "Created" } else { "Updated" };
                    notice.set(Some(Ok(format!("{verb} {}", contact.name))));
                    editing.set(None);
                    contacts.restart();
                }
                Err(e) => form_error.set(Some(e.user_message())),
            }
            saving.set(false);
        });
    };

    let on_confirm_delete = move |()| {
        let Some(contact) = pending_delete.take() else {
            return;
        };
        let client = state.client();
        spawn(async move {
            match client.delete_contact(&contact.id).await {
                Ok(()) => {
                    notice.set(Some(Ok(format!("Deleted {}", contact.name))));
                    contacts.restart();
                }
                Err(e) => notice.set(Some(Err(e.user_message()))),
            }
        });
    };

    rsx! {
        div {
            class: "contacts-view",

            div { class: "section-header",
                input {
                    class: "search-input",
                    r#type: "search",
                    placeholder: "Search by name or phone",
                    value: "{search}",
                    oninput: move |evt| search.set(evt.value()),
                }
                button {
                    class: "btn-primary",
                    onclick: move |_| open_form(None),
                    "+ Add Contact"
                }
            }

            match notice.read().as_ref() {
                Some(Ok(msg)) => rsx! { div { class: "alert alert-success", "{msg}" } },
                Some(Err(msg)) => rsx! { div { class: "alert alert-error", "{msg}" } },
                None => rsx! {},
            }

            match &*contacts.read() {
                Some(Ok(items)) => {
                    let term = search.read().clone();
                    let shown = filter_contacts(items, &term);
                    rsx! {
                        if shown.is_empty() {
                            p { class: "text-secondary", "No contacts found." }
                        } else {
                            table { class: "data-table",
                                thead {
                                    tr {
                                        th { "Name" }
                                        th { "Phone" }
                                        th { "Email" }
                                        th { "" }
                                    }
                                }
                                tbody {
                                    for contact in shown {
                                        tr { key: "{contact.id}",
                                            td { "{contact.name}" }
                                            td { class: "mono", "{contact.phone}" }
                                            td { "{contact.email().unwrap_or(\"-\")}" }
                                            td { class: "row-actions",
                                                button {
                                                    class: "btn-sm btn-glass",
                                                    onclick: {
                                                        let contact = contact.clone();
                                                        move |_| open_form(Some(&contact))
                                                    },
                                                    "Edit"
                                                }
                                                button {
                                                    class: "btn-sm btn-danger",
                                                    onclick: {
                                                        let contact = contact.clone();
                                                        move |_| pending_delete.set(Some(contact.clone()))
                                                    },
                                                    "Delete"
                                                }
                                            }
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
                        "Error loading contacts: {err.user_message()}"
                    }
                },
                None => rsx! {
                    div {
                        class: "loading",
                        "Loading contacts..."
                    }
                },
            }

            if let Some(target) = editing.read().clone() {
                Modal {
                    title: if target == Editing::New { "Add Contact".to_string() } else { "Edit Contact".to_string() },
                    on_close: move |()| editing.set(None),

                    form {
                        onsubmit: on_submit,

                        div { class: "form-field mb-md",
                            label { r#for: "contact-name", "Name" }
                            input {
                                id: "contact-name",
                                r#type: "text",
                                value: "{name_input}",
                                disabled: *saving.read(),
                                oninput: move |evt| name_input.set(evt.value()),
                            }
                        }

                        div { class: "form-field mb-md",
                            label { r#for: "contact-phone", "Phone" }
                            input {
                                id: "contact-phone",
                                r#type: "tel",
                                placeholder: "919800000001",
                                value: "{phone_input}",
                                disabled: *saving.read(),
                                oninput: move |evt| phone_input.set(evt.value()),
                            }
                        }

                        div { class: "form-field mb-md",
                            label { r#for: "contact-email", "Email (optional)" }
                            input {
                                id: "contact-email",
                                r#type: "email",
                                value: "{email_input}",
                                disabled: *saving.read(),
                                oninput: move |evt| email_input.set(evt.value()),
                            }
                        }

                        if let Some(err) = form_error.read().as_ref() {
                            div { class: "alert alert-error mb-md", "{err}" }
                        }

                        div { class: "btn-group",
                            button {
                                class: "btn-primary",
                                r#type: "submit",
                                disabled: *saving.read(),
                                if *saving.read() { "Saving..." } else { "Save" }
                            }
                            button {
                                class: "btn-glass",
                                r#type: "button",
                                onclick: move |_| editing.set(None),
                                "Cancel"
                            }
                        }
                    }
                }
            }

            if let Some(contact) = pending_delete.read().as_ref() {
                ConfirmDialog {
                    message: format!("Delete {}? This cannot be undone.", contact.name),
                    on_confirm: on_confirm_delete,
                    on_cancel: move |()| pending_delete.set(None),
                }
            }
        }
    }
}
