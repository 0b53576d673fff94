//! # Template Studio View
//!
//! Component template builder with a live preview.

use dioxus::prelude::*;
use varta_core::api::PREVIEW_DEBOUNCE;
use varta_core::{ButtonKind, HeaderKind, LanguageCode, TemplateCategory, TemplateDraft, TemplateRequest};

use crate::router::Route;
use crate::state::AppState;

/// Template studio view component.
///
/// Edits a [`TemplateDraft`]. The preview is requested once edits pause and
/// falls back to local substitution when the preview endpoint fails.
#[component]
pub fn TemplateStudio() -> Element {
    let state = use_context::<AppState>();

    let mut draft = use_signal(TemplateDraft::new);
    let mut creating = use_signal(|| false);
    let mut result = use_signal(|| Option::<Result<String, String>>::None);

    let preview = use_resource(move || {
        let client = state.client();
        let snapshot = draft.read().clone();
        async move {
            client
                .preview_template_debounced(&snapshot, PREVIEW_DEBOUNCE)
                .await
        }
    });

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let current = draft.read().clone();
        if current.name.trim().is_empty() || current.body.trim().is_empty() {
            result.set(Some(Err("Template name and body are required".to_string())));
            return;
        }

        let client = state.client();
        creating.set(true);
        result.set(None);

        spawn(async move {
            match client
                .create_template(&TemplateRequest::Advanced(current.to_request()))
                .await
            {
                Ok(created) => {
                    result.set(Some(Ok(created.message().to_string())));
                    draft.set(TemplateDraft::new());
                }
                Err(e) => result.set(Some(Err(e.user_message()))),
            }
            creating.set(false);
        });
    };

    let snapshot = draft.read().clone();
    let keys = snapshot.placeholder_keys();
    let header_preview = snapshot.preview_header();

    rsx! {
        div {
            class: "studio-view",

            Link {
                to: Route::Templates {},
                class: "back-link",
                "← Back to Templates"
            }

            div { class: "studio-columns",
                form {
                    class: "studio-form glass-panel-static",
                    onsubmit: on_submit,

                    div { class: "form-field mb-md",
                        label { r#for: "studio-name", "Template Name" }
                        input {
                            id: "studio-name",
                            r#type: "text",
                            placeholder: "order_update",
                            value: "{snapshot.name}",
                            disabled: *creating.read(),
                            oninput: move |evt| draft.write().name = evt.value(),
                        }
                    }

                    div { class: "form-row",
                        div { class: "form-field mb-md",
                            label { r#for: "studio-category", "Category" }
                            select {
                                id: "studio-category",
                                onchange: move |evt| {
                                    if let Some(category) = TemplateCategory::parse(&evt.value()) {
                                        draft.write().category = category;
                                    }
                                },
                                for category in TemplateCategory::ALL {
                                    option {
                                        value: category.as_str(),
                                        selected: snapshot.category == category,
                                        "{category.as_str()}"
                                    }
                                }
                            }
                        }

                        div { class: "form-field mb-md",
                            label { r#for: "studio-language", "Language" }
                            select {
                                id: "studio-language",
                                onchange: move |evt| {
                                    if let Some(language) = LanguageCode::parse(&evt.value()) {
                                        draft.write().language = language;
                                    }
                                },
                                for language in LanguageCode::ALL {
                                    option {
                                        value: language.as_str(),
                                        selected: snapshot.language == language,
                                        "{language.as_str()}"
                                    }
                                }
                            }
                        }
                    }

                    h4 { class: "section-label", "Header" }
                    div { class: "form-field mb-md",
                        select {
                            onchange: move |evt| {
                                if let Some(kind) = HeaderKind::parse(&evt.value()) {
                                    draft.write().header_kind = kind;
                                }
                            },
                            for kind in HeaderKind::ALL {
                                option {
                                    value: kind.as_str(),
                                    selected: snapshot.header_kind == kind,
                                    "{kind.as_str()}"
                                }
                            }
                        }
                    }
                    if snapshot.header_kind == HeaderKind::Text {
                        div { class: "form-field mb-md",
                            input {
                                r#type: "text",
                                placeholder: "Header text",
                                value: "{snapshot.header_text}",
                                oninput: move |evt| draft.write().header_text = evt.value(),
                            }
                        }
                    }
                    if snapshot.header_kind.is_media() {
                        div { class: "form-field mb-md",
                            input {
                                r#type: "text",
                                placeholder: "Media handle",
                                value: "{snapshot.header_media_handle}",
                                oninput: move |evt| draft.write().header_media_handle = evt.value(),
                            }
                        }
                    }

                    h4 { class: "section-label", "Body" }
                    div { class: "form-field mb-md",
                        textarea {
                            rows: "6",
                            placeholder: "Hi {{{{1}}}}, your order {{{{2}}}} is on its way.",
                            value: "{snapshot.body}",
                            oninput: move |evt| draft.write().set_body(evt.value()),
                        }
                    }

                    if !keys.is_empty() {
                        h4 { class: "section-label", "Sample Values" }
                        for key in keys.iter().cloned() {
                            div { key: "{key}", class: "form-field sample-field mb-sm",
                                label { "{{{{{key}}}}}" }
                                input {
                                    r#type: "text",
                                    value: "{snapshot.samples.get(&key).unwrap_or_default()}",
                                    oninput: {
                                        let key = key.clone();
                                        move |evt: Event<FormData>| draft.write().samples.set(key.clone(), evt.value())
                                    },
                                }
                            }
                        }
                    }

                    h4 { class: "section-label", "Footer" }
                    div { class: "form-field mb-md",
                        input {
                            r#type: "text",
                            placeholder: "Optional footer",
                            value: "{snapshot.footer}",
                            oninput: move |evt| draft.write().footer = evt.value(),
                        }
                    }

                    div { class: "section-header",
                        h4 { class: "section-label", "Buttons" }
                        button {
                            class: "btn-sm btn-glass",
                            r#type: "button",
                            onclick: move |_| draft.write().add_button(),
                            "+ Add Button"
                        }
                    }
                    for (index, button) in snapshot.buttons.iter().enumerate() {
                        ButtonEditor {
                            key: "{index}",
                            index,
                            kind: button.kind,
                            text: button.text.clone(),
                            target: button.target().unwrap_or_default().to_string(),
                            example: button.example.clone().unwrap_or_default(),
                            draft,
                        }
                    }

                    match result.read().as_ref() {
                        Some(Ok(msg)) => rsx! { div { class: "alert alert-success mb-md", "{msg}" } },
                        Some(Err(msg)) => rsx! { div { class: "alert alert-error mb-md", "{msg}" } },
                        None => rsx! {},
                    }

                    button {
                        class: "btn-primary",
                        r#type: "submit",
                        disabled: *creating.read(),
                        if *creating.read() { "Creating..." } else { "Create Template" }
                    }
                }

                div { class: "studio-preview",
                    h4 { class: "section-label", "Preview" }
                    div { class: "phone-bubble",
                        if !header_preview.is_empty() {
                            div { class: "bubble-header", "{header_preview}" }
                        }
                        div { class: "bubble-body",
                            match &*preview.read() {
                                Some(body) => rsx! { "{body}" },
                                None => rsx! { "{snapshot.local_preview_body()}" },
                            }
                        }
                        if !snapshot.footer.trim().is_empty() {
                            div { class: "bubble-footer text-secondary", "{snapshot.footer}" }
                        }
                        for button in snapshot.buttons.iter() {
                            div { class: "bubble-button", "{button.preview_label()}" }
                        }
                    }
                }
            }
        }
    }
}

/// One editable button row.
#[component]
fn ButtonEditor(
    index: usize,
    kind: ButtonKind,
    text: String,
    target: String,
    example: String,
    draft: Signal<TemplateDraft>,
) -> Element {
    let target_label = if kind.targets_url() {
        Some("URL")
    } else if kind.targets_phone() {
        Some("Phone number")
    } else {
        None
    };

    rsx! {
        div { class: "button-row",
            select {
                onchange: move |evt| {
                    if let Some(new_kind) = ButtonKind::parse(&evt.value()) {
                        if let Some(button) = draft.write().button_mut(index) {
                            // Re-route the target for the new kind.
                            let target = button.target().map(str::to_string);
                            button.kind = new_kind;
                            button.set_target(target.unwrap_or_default());
                        }
                    }
                },
                for option_kind in ButtonKind::ALL {
                    option {
                        value: option_kind.as_str(),
                        selected: kind == option_kind,
                        "{option_kind}"
                    }
                }
            }
            input {
                r#type: "text",
                placeholder: "Label",
                value: "{text}",
                oninput: move |evt| {
                    if let Some(button) = draft.write().button_mut(index) {
                        button.text = evt.value();
                    }
                },
            }
            if let Some(label) = target_label {
                input {
                    r#type: "text",
                    placeholder: "{label}",
                    value: "{target}",
                    oninput: move |evt| {
                        if let Some(button) = draft.write().button_mut(index) {
                            button.set_target(evt.value());
                        }
                    },
                }
            }
            input {
                r#type: "text",
                placeholder: "Example",
                value: "{example}",
                oninput: move |evt| {
                    if let Some(button) = draft.write().button_mut(index) {
                        let value = evt.value();
                        button.example = (!value.is_empty()).then_some(value);
                    }
                },
            }
            button {
                class: "btn-sm btn-danger",
                r#type: "button",
                onclick: move |_| draft.write().remove_button(index),
                "Remove"
            }
        }
    }
}
