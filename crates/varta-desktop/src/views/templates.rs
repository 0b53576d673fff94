//! # Templates View
//!
//! Template list with a simple flat-body form.

use dioxus::prelude::*;
use varta_core::{LanguageCode, LegacyTemplateRequest, Template, TemplateContent, TemplateRequest};

use crate::components::{ConfirmDialog, Modal};
use crate::router::Route;
use crate::state::AppState;

const KINDS: [&str; 3] = ["TEXT", "MEDIA", "INTERACTIVE"];

/// Templates view component.
///
/// Creates and edits through the legacy endpoint. Component templates are
/// built in the template studio.
#[component]
pub fn Templates() -> Element {
    let state = use_context::<AppState>();

    // `Some(None)` is a new template, `Some(Some(id))` an existing one.
    let mut editing = use_signal(|| Option::<Option<String>>::None);
    let mut pending_delete = use_signal(|| Option::<Template>::None);
    let mut notice = use_signal(|| Option::<Result<String, String>>::None);

    let mut name_input = use_signal(String::new);
    let mut body_input = use_signal(String::new);
    let mut kind_input = use_signal(|| KINDS[0].to_string());
    let mut language_input = use_signal(|| LanguageCode::En);
    let mut saving = use_signal(|| false);
    let mut form_error = use_signal(|| Option::<String>::None);

    let mut templates = use_resource(move || {
        let client = state.client();
        async move { client.list_templates().await }
    });

    let mut open_form = move |template: Option<&Template>| {
        if let Some(t) = template {
            name_input.set(t.name.clone());
            body_input.set(t.body());
            kind_input.set(if t.kind.is_empty() { KINDS[0].to_string() } else { t.kind.clone() });
            language_input.set(
                LanguageCode::parse(t.language_or_default()).map_or(LanguageCode::En, LanguageCode::legacy),
            );
            editing.set(Some(Some(t.id.clone())));
        } else {
            name_input.set(String::new());
            body_input.set(String::new());
            kind_input.set(KINDS[0].to_string());
            language_input.set(LanguageCode::En);
            editing.set(Some(None));
        }
        form_error.set(None);
    };

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let Some(target) = editing.read().clone() else {
            return;
        };

        let name = name_input.read().trim().to_string();
        let body = body_input.read().clone();
        if name.is_empty() || body.trim().is_empty() {
            form_error.set(Some("Name and body are required".to_string()));
            return;
        }

        let req = TemplateRequest::Legacy(LegacyTemplateRequest {
            name,
            content: TemplateContent::Structured { body },
            kind: kind_input.read().clone(),
            language_code: Some(*language_input.read()),
            provider_template_id: None,
        });

        let client = state.client();
        saving.set(true);
        form_error.set(None);

        spawn(async move {
            let result = match &target {
                None => client.create_template(&req).await.map(|c| c.template),
                Some(id) => client.update_template(id, &req).await,
            };
            match result {
                Ok(template) => {
                    let verb = if target.is_none() { "Created" } else { "Updated" };
                    notice.set(Some(Ok(format!("{verb} template {}", template.name))));
                    editing.set(None);
                    templates.restart();
                }
                Err(e) => form_error.set(Some(e.user_message())),
            }
            saving.set(false);
        });
    };

    let on_confirm_delete = move |()| {
        let Some(template) = pending_delete.take() else {
            return;
        };
        let client = state.client();
        spawn(async move {
            match client.delete_template(&template.id).await {
                Ok(()) => {
                    notice.set(Some(Ok(format!("Deleted template {}", template.name))));
                    templates.restart();
                }
                Err(e) => notice.set(Some(Err(e.user_message()))),
            }
        });
    };

    rsx! {
        div {
            class: "templates-view",

            div { class: "section-header",
                h2 { "Message Templates" }
                div { class: "btn-group",
                    Link { to: Route::TemplateStudio {}, class: "btn-glass", "Open Studio" }
                    button {
                        class: "btn-primary",
                        onclick: move |_| open_form(None),
                        "+ New Template"
                    }
                }
            }

            match notice.read().as_ref() {
                Some(Ok(msg)) => rsx! { div { class: "alert alert-success", "{msg}" } },
                Some(Err(msg)) => rsx! { div { class: "alert alert-error", "{msg}" } },
                None => rsx! {},
            }

            match &*templates.read() {
                Some(Ok(items)) if items.is_empty() => rsx! {
                    p { class: "text-secondary", "No templates yet. Create one to get started!" }
                },
                Some(Ok(items)) => rsx! {
                    div { class: "card-grid",
                        for template in items.iter() {
                            div { key: "{template.id}", class: "template-card glass-panel-static",
                                div { class: "card-header",
                                    h3 { "{template.name}" }
                                    span { class: "badge", "{template.label()}" }
                                }
                                p { class: "template-body", "{template.body()}" }
                                div { class: "meta",
                                    span { "Language: {template.language_or_default()}" }
                                    if let Some(status) = template.status.as_ref() {
                                        span { " · {status}" }
                                    }
                                }
                                div { class: "row-actions",
                                    button {
                                        class: "btn-sm btn-glass",
                                        onclick: {
                                            let template = template.clone();
                                            move |_| open_form(Some(&template))
                                        },
                                        "Edit"
                                    }
                                    button {
                                        class: "btn-sm btn-danger",
                                        onclick: {
                                            let template = template.clone();
                                            move |_| pending_delete.set(Some(template.clone()))
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                },
                Some(Err(err)) => rsx! {
                    div {
                        class: "alert alert-error",
                        "Error loading templates: {err.user_message()}"
                    }
                },
                None => rsx! {
                    div {
                        class: "loading",
                        "Loading templates..."
                    }
                },
            }

            if let Some(target) = editing.read().clone() {
                Modal {
                    title: if target.is_none() { "New Template".to_string() } else { "Edit Template".to_string() },
                    on_close: move |()| editing.set(None),

                    form {
                        onsubmit: on_submit,

                        div { class: "form-field mb-md",
                            label { r#for: "template-name", "Name" }
                            input {
                                id: "template-name",
                                r#type: "text",
                                value: "{name_input}",
                                disabled: *saving.read(),
                                oninput: move |evt| name_input.set(evt.value()),
                            }
                        }

                        div { class: "form-field mb-md",
                            label { r#for: "template-body", "Body" }
                            textarea {
                                id: "template-body",
                                rows: "5",
                                placeholder: "Hello {{{{1}}}}, your order {{{{2}}}} has shipped.",
                                value: "{body_input}",
                                disabled: *saving.read(),
                                oninput: move |evt| body_input.set(evt.value()),
                            }
                        }

                        div { class: "form-row",
                            div { class: "form-field mb-md",
                                label { r#for: "template-type", "Type" }
                                select {
                                    id: "template-type",
                                    value: "{kind_input}",
                                    onchange: move |evt| kind_input.set(evt.value()),
                                    for kind in KINDS {
                                        option { value: kind, selected: *kind_input.read() == kind, "{kind}" }
                                    }
                                }
                            }

                            div { class: "form-field mb-md",
                                label { r#for: "template-language", "Language" }
                                select {
                                    id: "template-language",
                                    onchange: move |evt| {
                                        if let Some(lang) = LanguageCode::parse(&evt.value()) {
                                            language_input.set(lang);
                                        }
                                    },
                                    for lang in [LanguageCode::En, LanguageCode::Hi] {
                                        option {
                                            value: lang.as_str(),
                                            selected: *language_input.read() == lang,
                                            "{lang.as_str()}"
                                        }
                                    }
                                }
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

            if let Some(template) = pending_delete.read().as_ref() {
                ConfirmDialog {
                    message: format!("Delete template {}?", template.name),
                    on_confirm: on_confirm_delete,
                    on_cancel: move |()| pending_delete.set(None),
                }
            }
        }
    }
}
