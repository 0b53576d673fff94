//! # Campaigns View
//!
//! Campaign creation from a CSV file and the campaign history.

use dioxus::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use varta_core::time::{display_date, parse_local_input};
use varta_core::{Campaign, CampaignUpload};

use crate::state::AppState;

/// Delay before switching to the history tab after a successful create.
const SWITCH_TO_HISTORY_AFTER: Duration = Duration::from_millis(1500);

/// CSV picked through the native file dialog.
#[derive(Clone, PartialEq)]
struct CsvFile {
    name: String,
    bytes: Vec<u8>,
}

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Create,
    History,
}

/// Campaigns view component.
#[component]
pub fn Campaigns() -> Element {
    let state = use_context::<AppState>();

    let mut tab = use_signal(|| Tab::Create);

    let mut name_input = use_signal(String::new);
    let mut template_input = use_signal(String::new);
    let mut csv_file = use_signal(|| Option::<CsvFile>::None);
    // Bumped to remount the file input, which cannot be cleared by value.
    let mut picker_key = use_signal(|| 0u32);
    let mut schedule_input = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut result = use_signal(|| Option::<Result<String, String>>::None);
    let mut export_notice = use_signal(|| Option::<Result<String, String>>::None);

    let templates = use_resource(move || {
        let client = state.client();
        async move { client.list_templates().await }
    });

    let mut campaigns = use_resource(move || {
        let client = state.client();
        async move { client.list_campaigns().await }
    });

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();

        let name = name_input.read().trim().to_string();
        if name.is_empty() {
            result.set(Some(Err("Campaign name is required".to_string())));
            return;
        }

        let schedule = schedule_input.read().clone();
        let scheduled_at = if schedule.trim().is_empty() {
            None
        } else if let Some(at) = parse_local_input(&schedule) {
            Some(at)
        } else {
            result.set(Some(Err("Invalid schedule time".to_string())));
            return;
        };

        let (file_name, bytes) = csv_file
            .read()
            .as_ref()
            .map(|f| (f.name.clone(), f.bytes.clone()))
            .unwrap_or_default();
        let upload = match CampaignUpload::new(
            name,
            template_input.read().clone(),
            file_name,
            bytes,
        ) {
            Ok(upload) => upload
                .scheduled_at(scheduled_at)
                .uploaded_by_user(state.user().map(|u| u.id)),
            Err(e) => {
                result.set(Some(Err(e.user_message())));
                return;
            }
        };

        let client = state.client();
        submitting.set(true);
        result.set(None);

        spawn(async move {
            match client.create_campaign(upload).await {
                Ok(created) => {
                    tracing::info!(id = %created.id, "Campaign created");
                    result.set(Some(Ok("Campaign created successfully!".to_string())));
                    name_input.set(String::new());
                    template_input.set(String::new());
                    csv_file.set(None);
                    picker_key += 1;
                    schedule_input.set(String::new());
                    submitting.set(false);

                    tokio::time::sleep(SWITCH_TO_HISTORY_AFTER).await;
                    result.set(None);
                    tab.set(Tab::History);
                    campaigns.restart();
                }
                Err(e) => {
                    result.set(Some(Err(e.user_message())));
                    submitting.set(false);
                }
            }
        });
    };

    let on_pick_csv = move |evt: Event<FormData>| async move {
        let Some(file) = evt.files().into_iter().next() else {
            csv_file.set(None);
            return;
        };
        match file.read_bytes().await {
            Ok(bytes) => {
                tracing::debug!(name = %file.name(), bytes = bytes.len(), "Picked campaign CSV");
                csv_file.set(Some(CsvFile {
                    name: file.name(),
                    bytes: bytes.to_vec(),
                }));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read campaign CSV");
                csv_file.set(None);
                result.set(Some(Err("Could not read the selected file.".to_string())));
            }
        }
    };

    let on_export = move |id: String| {
        let client = state.client();
        export_notice.set(None);
        spawn(async move {
            let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
            let saved = match client.export_campaign_responses(&id).await {
                Ok(export) => export.save_to(&dir),
                Err(e) => Err(e),
            };
            match saved {
                Ok(path) => export_notice.set(Some(Ok(format!("Saved {}", path.display())))),
                Err(e) => {
                    tracing::warn!(campaign = %id, error = %e, "Export failed");
                    export_notice.set(Some(Err("Failed to export campaign responses.".to_string())));
                }
            }
        });
    };

    let current_tab = *tab.read();

    rsx! {
        div {
            class: "campaigns-view",

            div { class: "tabs",
                button {
                    class: if current_tab == Tab::Create { "tab active" } else { "tab" },
                    onclick: move |_| tab.set(Tab::Create),
                    "Create Campaign"
                }
                button {
                    class: if current_tab == Tab::History { "tab active" } else { "tab" },
                    onclick: move |_| {
                        tab.set(Tab::History);
                        campaigns.restart();
                    },
                    "Campaign History"
                }
            }

            if current_tab == Tab::Create {
                form {
                    class: "campaign-form glass-panel-static",
                    onsubmit: on_submit,

                    div { class: "form-field mb-md",
                        label { r#for: "campaign-name", "Campaign Name" }
                        input {
                            id: "campaign-name",
                            r#type: "text",
                            value: "{name_input}",
                            disabled: *submitting.read(),
                            oninput: move |evt| name_input.set(evt.value()),
                        }
                    }

                    div { class: "form-field mb-md",
                        label { r#for: "campaign-template", "Message Template" }
                        select {
                            id: "campaign-template",
                            disabled: *submitting.read(),
                            onchange: move |evt| template_input.set(evt.value()),
                            option { value: "", selected: template_input.read().is_empty(), "Select a template" }
                            if let Some(Ok(items)) = &*templates.read() {
                                for template in items.iter() {
                                    option {
                                        key: "{template.id}",
                                        value: "{template.id}",
                                        selected: *template_input.read() == template.id,
                                        "{template.name} ({template.label()})"
                                    }
                                }
                            }
                        }
                    }

                    div { class: "form-field mb-md",
                        label { r#for: "campaign-csv", "Contacts CSV" }
                        input {
                            key: "{picker_key}",
                            id: "campaign-csv",
                            r#type: "file",
                            accept: ".csv,text/csv",
                            disabled: *submitting.read(),
                            onchange: on_pick_csv,
                        }
                        if let Some(file) = csv_file.read().as_ref() {
                            span { class: "field-hint text-secondary",
                                "{file.name} ({file.bytes.len()} bytes)"
                            }
                        }
                    }

                    div { class: "form-field mb-md",
                        label { r#for: "campaign-schedule", "Schedule (optional)" }
                        input {
                            id: "campaign-schedule",
                            r#type: "datetime-local",
                            value: "{schedule_input}",
                            disabled: *submitting.read(),
                            oninput: move |evt| schedule_input.set(evt.value()),
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
                        disabled: *submitting.read(),
                        if *submitting.read() { "Creating..." } else { "Create Campaign" }
                    }
                }
            } else {
                match export_notice.read().as_ref() {
                    Some(Ok(msg)) => rsx! { div { class: "alert alert-success", "{msg}" } },
                    Some(Err(msg)) => rsx! { div { class: "alert alert-error", "{msg}" } },
                    None => rsx! {},
                }

                match &*campaigns.read() {
                    Some(Ok(items)) if items.is_empty() => rsx! {
                        p { class: "text-secondary", "No campaigns yet." }
                    },
                    Some(Ok(items)) => rsx! {
                        table { class: "data-table",
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Status" }
                                    th { "Schedule" }
                                    th { "Progress" }
                                    th { "Created" }
                                    th { "" }
                                }
                            }
                            tbody {
                                for campaign in items.iter() {
                                    CampaignRow {
                                        key: "{campaign.id}",
                                        campaign: campaign.clone(),
                                        on_export: on_export,
                                    }
                                }
                            }
                        }
                    },
                    Some(Err(err)) => rsx! {
                        div {
                            class: "alert alert-error",
                            "Error loading campaigns: {err.user_message()}"
                        }
                    },
                    None => rsx! {
                        div {
                            class: "loading",
                            "Loading campaigns..."
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn CampaignRow(campaign: Campaign, on_export: EventHandler<String>) -> Element {
    let percent = campaign.progress_percent();
    let schedule = campaign.schedule_label();
    let created = campaign.created_at.as_deref().map(display_date).unwrap_or_default();
    let id = campaign.id.clone();

    rsx! {
        tr {
            td { "{campaign.name}" }
            td {
                span {
                    class: "badge badge-{campaign.status.as_str().to_lowercase()}",
                    "{campaign.status}"
                }
            }
            td { "{schedule}" }
            td {
                div { class: "progress",
                    div { class: "progress-bar", style: "width: {percent:.0}%" }
                }
                span { class: "progress-label text-secondary", "{campaign.progress_label()}" }
            }
            td { "{created}" }
            td {
                button {
                    class: "btn-sm btn-glass",
                    onclick: move |_| on_export.call(id.clone()),
                    "Export CSV"
                }
            }
        }
    }
}
