//! # Quick Send View
//!
//! One-to-one chat: pick or type a number, read the history, send a text or
//! a template message.

use dioxus::prelude::*;
use std::collections::BTreeMap;
use varta_core::history::reload_after_send;
use varta_core::message::{empty_variables, DEFAULT_TEXT};
use varta_core::{
    filter_contacts, CrmClient, HistoryGuard, Message, SendMessageRequest, Template,
};

use crate::state::AppState;

/// Fetches history for `phone` once it is long enough, else clears it.
///
/// Responses for superseded numbers are dropped by the guard.
fn refresh_history(
    client: CrmClient,
    guard: HistoryGuard,
    mut history: Signal<Vec<Message>>,
    mut history_error: Signal<Option<String>>,
    phone: String,
    min_len: usize,
) {
    let phone = phone.trim().to_string();
    if phone.len() < min_len {
        guard.invalidate();
        history.set(Vec::new());
        history_error.set(None);
        return;
    }

    spawn(async move {
        let Some(result) = guard.fetch_latest(client.message_history(&phone)).await else {
            return;
        };
        match result {
            Ok(messages) => {
                history.set(messages);
                history_error.set(None);
            }
            Err(e) => {
                history.set(Vec::new());
                history_error.set(Some(e.user_message()));
            }
        }
    });
}

/// Quick send view component.
#[component]
pub fn QuickSend() -> Element {
    let state = use_context::<AppState>();
    let guard = use_hook(HistoryGuard::new);
    let min_len = state.history_min_phone_len();

    let mut search = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let history = use_signal(Vec::<Message>::new);
    let history_error = use_signal(|| Option::<String>::None);

    let mut selected_template = use_signal(|| Option::<Template>::None);
    let mut variables = use_signal(BTreeMap::<String, String>::new);
    let mut text = use_signal(|| DEFAULT_TEXT.to_string());
    let mut sending = use_signal(|| false);
    let mut notice = use_signal(|| Option::<Result<String, String>>::None);

    let directory = use_resource(move || {
        let client = state.client();
        async move {
            let (contacts, templates) =
                futures::join!(client.list_contacts(), client.list_templates());
            (contacts, templates)
        }
    });

    let on_phone_input = {
        let guard = guard.clone();
        move |evt: Event<FormData>| {
            let value = evt.value();
            phone.set(value.clone());
            refresh_history(state.client(), guard.clone(), history, history_error, value, min_len);
        }
    };

    let on_send = {
        let guard = guard.clone();
        move |evt: Event<FormData>| {
            evt.prevent_default();
            let to = phone.read().clone();
            let req = match selected_template.read().as_ref() {
                Some(t) => SendMessageRequest::template(&to, t.id.clone(), variables.read().clone()),
                None => SendMessageRequest::text(&to, &text.read()),
            };
            let req = match req {
                Ok(req) => req,
                Err(e) => {
                    notice.set(Some(Err(e.user_message())));
                    return;
                }
            };

            let client = state.client();
            let guard = guard.clone();
            sending.set(true);
            notice.set(None);

            spawn(async move {
                match client.send_message(&req).await {
                    Ok(()) => {
                        notice.set(Some(Ok("Message sent successfully!".to_string())));
                        selected_template.set(None);
                        variables.set(BTreeMap::new());
                        if let Some(number) = reload_after_send(&to, &phone.peek()) {
                            refresh_history(client, guard, history, history_error, number, min_len);
                        }
                    }
                    Err(e) => notice.set(Some(Err(e.user_message()))),
                }
                sending.set(false);
            });
        }
    };

    let directory_ref = directory.read();
    let (contacts, templates) = match &*directory_ref {
        Some((contacts, templates)) => (
            contacts.as_ref().map(Vec::as_slice).map_err(|e| e.user_message()),
            templates.as_ref().map(Vec::as_slice).map_err(|e| e.user_message()),
        ),
        None => (Ok(&[][..]), Ok(&[][..])),
    };
    let loading_directory = directory_ref.is_none();
    let term = search.read().clone();
    let current_phone = phone.read().trim().to_string();

    rsx! {
        div {
            class: "quick-send-view",

            aside { class: "contact-picker glass-panel-static",
                input {
                    class: "search-input",
                    r#type: "search",
                    placeholder: "Search contacts",
                    value: "{search}",
                    oninput: move |evt| search.set(evt.value()),
                }

                if loading_directory {
                    div { class: "loading", "Loading contacts..." }
                }
                match contacts {
                    Ok(items) => rsx! {
                        ul { class: "contact-list",
                            for contact in filter_contacts(items, &term) {
                                li {
                                    key: "{contact.id}",
                                    class: if contact.phone == current_phone { "contact-item active" } else { "contact-item" },
                                    onclick: {
                                        let number = contact.phone.clone();
                                        let guard = guard.clone();
                                        move |_| {
                                            phone.set(number.clone());
                                            refresh_history(
                                                state.client(),
                                                guard.clone(),
                                                history,
                                                history_error,
                                                number.clone(),
                                                min_len,
                                            );
                                        }
                                    },
                                    span { class: "contact-name", "{contact.name}" }
                                    span { class: "contact-phone mono text-secondary", "{contact.phone}" }
                                }
                            }
                        }
                    },
                    Err(msg) => rsx! {
                        div { class: "alert alert-error", "{msg}" }
                    },
                }
            }

            section { class: "chat-panel",
                div { class: "chat-header",
                    input {
                        class: "phone-input",
                        r#type: "tel",
                        placeholder: "Phone number",
                        value: "{phone}",
                        oninput: on_phone_input,
                    }
                }

                div { class: "chat-history",
                    if let Some(err) = history_error.read().as_ref() {
                        div { class: "alert alert-error", "{err}" }
                    }
                    if history.read().is_empty() {
                        p { class: "text-tertiary chat-empty",
                            if current_phone.len() < min_len {
                                "Enter a phone number to see the conversation."
                            } else {
                                "No messages yet."
                            }
                        }
                    }
                    for message in history.read().iter() {
                        ChatBubble { key: "{message.id}", message: message.clone() }
                    }
                }

                form {
                    class: "composer",
                    onsubmit: on_send,

                    div { class: "form-field",
                        select {
                            onchange: move |evt| {
                                let id = evt.value();
                                let found = directory
                                    .read()
                                    .as_ref()
                                    .and_then(|(_, t)| t.as_ref().ok())
                                    .and_then(|items| items.iter().find(|t| t.id == id).cloned());
                                variables.set(found.as_ref().map(empty_variables).unwrap_or_default());
                                selected_template.set(found);
                            },
                            option { value: "", selected: selected_template.read().is_none(), "Free text" }
                            if let Ok(items) = templates {
                                for template in items.iter() {
                                    option {
                                        key: "{template.id}",
                                        value: "{template.id}",
                                        selected: selected_template.read().as_ref().is_some_and(|t| t.id == template.id),
                                        "{template.name}"
                                    }
                                }
                            }
                        }
                    }

                    if let Some(template) = selected_template.read().as_ref() {
                        p { class: "template-body text-secondary", "{template.body()}" }
                        for (key, value) in variables.read().clone() {
                            div { key: "{key}", class: "form-field sample-field",
                                label { "{{{{{key}}}}}" }
                                input {
                                    r#type: "text",
                                    value: "{value}",
                                    oninput: {
                                        let key = key.clone();
                                        move |evt: Event<FormData>| {
                                            variables.write().insert(key.clone(), evt.value());
                                        }
                                    },
                                }
                            }
                        }
                    } else {
                        textarea {
                            rows: "3",
                            value: "{text}",
                            oninput: move |evt| text.set(evt.value()),
                        }
                    }

                    match notice.read().as_ref() {
                        Some(Ok(msg)) => rsx! { div { class: "alert alert-success", "{msg}" } },
                        Some(Err(msg)) => rsx! { div { class: "alert alert-error", "{msg}" } },
                        None => rsx! {},
                    }

                    button {
                        class: "btn-primary",
                        r#type: "submit",
                        disabled: *sending.read() || current_phone.is_empty(),
                        if *sending.read() { "Sending..." } else { "Send" }
                    }
                }
            }
        }
    }
}

#[component]
fn ChatBubble(message: Message) -> Element {
    let content = message.content();
    let outgoing = message.is_outgoing();

    rsx! {
        div {
            class: if outgoing { "bubble outgoing" } else { "bubble incoming" },
            div { class: "bubble-body",
                span { class: "bubble-icon", "{content.icon()}" }
                " {content}"
            }
            div { class: "bubble-meta text-tertiary",
                "{message.time_label()}"
                if outgoing {
                    span { class: "ticks ticks-{message.status:?}", " {message.status.ticks()}" }
                }
            }
        }
    }
}
