//! CLI command implementations.

use anyhow::{anyhow, bail, Context as _, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use varta_core::message::empty_variables;
use varta_core::time::{display_date, parse_local_input};
use varta_core::{
    filter_contacts, ButtonKind, CampaignUpload, Config, ContactRequest, CrmClient, HeaderKind,
    LanguageCode, LegacyTemplateRequest, SendMessageRequest, SessionStore, TemplateButton,
    TemplateCategory, TemplateContent, TemplateDraft, TemplateRequest,
};

/// Parses `KEY=VALUE`.
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Parses `KIND:TEXT[:TARGET]`, e.g. `URL:Track order:https://example.com`.
fn parse_button(s: &str) -> Result<TemplateButton> {
    let mut parts = s.splitn(3, ':');
    let kind = parts.next().unwrap_or_default();
    let kind = ButtonKind::parse(kind).ok_or_else(|| anyhow!("unknown button type `{kind}`"))?;
    let mut button = TemplateButton {
        kind,
        text: parts.next().unwrap_or_default().to_string(),
        ..TemplateButton::default()
    };
    if let Some(target) = parts.next() {
        button.set_target(target);
    }
    Ok(button)
}

/// Component template options shared by `templates build` and `templates preview`.
#[derive(clap::Args, Debug)]
pub struct StudioArgs {
    /// Template name
    #[arg(long)]
    name: String,
    /// Body text with {{1}}-style placeholders
    #[arg(long)]
    body: String,
    /// MARKETING, UTILITY or AUTHENTICATION
    #[arg(long, default_value = "MARKETING")]
    category: String,
    /// en, hi or en_US
    #[arg(long, default_value = "en")]
    language: String,
    /// NONE, TEXT, IMAGE, VIDEO, DOCUMENT or LOCATION
    #[arg(long, default_value = "NONE")]
    header: String,
    /// Header text for TEXT headers
    #[arg(long)]
    header_text: Option<String>,
    /// Media handle for IMAGE, VIDEO and DOCUMENT headers
    #[arg(long)]
    header_media: Option<String>,
    /// Footer text
    #[arg(long)]
    footer: Option<String>,
    /// Button as KIND:TEXT[:TARGET] (repeatable)
    #[arg(long = "button")]
    buttons: Vec<String>,
    /// Sample value as KEY=VALUE (repeatable)
    #[arg(long = "sample", value_parser = parse_key_value)]
    samples: Vec<(String, String)>,
}

impl StudioArgs {
    fn to_draft(&self) -> Result<TemplateDraft> {
        let mut draft = TemplateDraft::new();
        draft.name = self.name.clone();
        draft.category = TemplateCategory::parse(&self.category)
            .ok_or_else(|| anyhow!("unknown category `{}`", self.category))?;
        draft.language = LanguageCode::parse(&self.language)
            .ok_or_else(|| anyhow!("unknown language `{}`", self.language))?;
        draft.header_kind = HeaderKind::parse(&self.header)
            .ok_or_else(|| anyhow!("unknown header type `{}`", self.header))?;
        draft.header_text = self.header_text.clone().unwrap_or_default();
        draft.header_media_handle = self.header_media.clone().unwrap_or_default();
        draft.footer = self.footer.clone().unwrap_or_default();
        draft.set_body(self.body.clone());
        for (key, value) in &self.samples {
            draft.samples.set(key.clone(), value.clone());
        }
        for raw in &self.buttons {
            draft.buttons.push(parse_button(raw)?);
        }
        Ok(draft)
    }
}

/// Shared state for one CLI invocation.
pub struct Context {
    client: CrmClient,
    json: bool,
}

impl Context {
    /// Loads configuration and the saved session.
    pub fn new(api_url: Option<String>, session: Option<PathBuf>, json: bool) -> Result<Self> {
        let mut config = Config::load();
        if let Some(url) = api_url {
            config.api_url = url;
        }

        let store = match session.or_else(Config::session_path) {
            Some(path) => SessionStore::open(path),
            None => {
                tracing::warn!("No config directory, session will not be saved");
                SessionStore::in_memory()
            }
        };

        tracing::debug!(api_url = %config.api_url, "Using API");
        let client = CrmClient::from_config(&config, store)?;
        Ok(Self { client, json })
    }

    fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table();
        }
        Ok(())
    }

    fn require_login(&self) -> Result<()> {
        if self.client.session().is_authenticated() {
            Ok(())
        } else {
            bail!("Not logged in. Run `varta login <username>` first.")
        }
    }

    // ==================== Auth ====================

    /// Log in.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let session = self
            .client
            .login(username, password)
            .await
            .context("Invalid credentials")?;
        println!("Logged in as {} ({})", session.user.username, session.user.role);
        Ok(())
    }

    /// Register an account.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        self.client.register(username, password).await?;
        println!("Registered {username}. Log in with `varta login {username}`.");
        Ok(())
    }

    /// Log out.
    pub fn logout(&self) {
        self.client.logout();
        println!("Logged out.");
    }

    /// Show the current user and tenant profile.
    pub async fn whoami(&self) -> Result<()> {
        self.require_login()?;
        let Some(user) = self.client.session().user() else {
            bail!("Not logged in.");
        };
        println!("User:      {}", user.username);
        println!("Role:      {}", user.role);
        println!("Client ID: {}", user.client_id.as_deref().unwrap_or("N/A"));

        match self.client.current_client().await {
            Ok(profile) => {
                println!();
                println!("Client Details");
                println!("  Name:            {}", profile.name);
                println!("  ID:              {}", profile.id);
                println!(
                    "  Phone Number ID: {}",
                    profile.phone_number_id.as_deref().unwrap_or("N/A")
                );
                println!("  WABA ID:         {}", profile.waba_id.as_deref().unwrap_or("N/A"));
                println!(
                    "  Created:         {}",
                    profile.created_at.as_deref().map_or_else(|| "N/A".into(), display_date)
                );
            }
            Err(e) => println!("\n{}", e.user_message()),
        }
        Ok(())
    }

    /// Show dashboard statistics.
    pub async fn stats(&self) -> Result<()> {
        self.require_login()?;
        let stats = self.client.dashboard_stats().await?;
        self.emit(&stats, || {
            for (title, value) in stats.cards() {
                println!("{title:<18} {value}");
            }
            if !stats.recent_campaigns.is_empty() {
                println!();
                println!("Recent campaigns:");
                for c in &stats.recent_campaigns {
                    println!("  {:<24} {:<10} {}", c.name, c.status, c.progress_label());
                }
            }
        })
    }

    // ==================== Contacts ====================

    /// List contacts.
    pub async fn contacts_list(&self, search: Option<&str>) -> Result<()> {
        self.require_login()?;
        let contacts = self.client.list_contacts().await?;
        let shown = filter_contacts(&contacts, search.unwrap_or_default());
        self.emit(&shown, || {
            if shown.is_empty() {
                println!("No contacts found.");
            }
            for c in &shown {
                println!(
                    "{:<38} {:<24} {:<16} {}",
                    c.id,
                    c.name,
                    c.phone,
                    c.email().unwrap_or("-")
                );
            }
        })
    }

    /// Add a contact.
    pub async fn contacts_add(&self, name: &str, phone: &str, email: Option<&str>) -> Result<()> {
        self.require_login()?;
        let req = ContactRequest::from_form(name, phone, email)?;
        let contact = self.client.create_contact(&req).await?;
        println!("Created contact {} ({})", contact.name, contact.id);
        Ok(())
    }

    /// Update a contact.
    pub async fn contacts_update(
        &self,
        id: &str,
        name: &str,
        phone: &str,
        email: Option<&str>,
    ) -> Result<()> {
        self.require_login()?;
        let req = ContactRequest::from_form(name, phone, email)?;
        let contact = self.client.update_contact(id, &req).await?;
        println!("Updated contact {} ({})", contact.name, contact.id);
        Ok(())
    }

    /// Delete a contact.
    pub async fn contacts_delete(&self, id: &str) -> Result<()> {
        self.require_login()?;
        self.client.delete_contact(id).await?;
        println!("Deleted contact {id}");
        Ok(())
    }

    // ==================== Templates ====================

    /// List templates.
    pub async fn templates_list(&self) -> Result<()> {
        self.require_login()?;
        let templates = self.client.list_templates().await?;
        self.emit(&templates, || {
            if templates.is_empty() {
                println!("No templates found.");
            }
            for t in &templates {
                println!(
                    "{:<38} {:<24} {:<14} {:<6} {}",
                    t.id,
                    t.name,
                    t.label(),
                    t.language_or_default(),
                    if t.active { "active" } else { "inactive" }
                );
            }
        })
    }

    /// Show one template.
    pub async fn templates_show(&self, id: &str) -> Result<()> {
        self.require_login()?;
        let t = self.client.get_template(id).await?;
        self.emit(&t, || {
            println!("{} ({})", t.name, t.id);
            println!("Type:     {}", t.label());
            println!("Language: {}", t.language_or_default());
            if let Some(status) = &t.status {
                println!("Status:   {status}");
            }
            let keys = t.placeholder_keys();
            if !keys.is_empty() {
                println!("Variables: {}", keys.join(", "));
            }
            println!();
            println!("{}", t.body());
        })
    }

    /// Create a template through the legacy endpoint.
    pub async fn templates_create(
        &self,
        name: &str,
        body: &str,
        kind: &str,
        language: &str,
    ) -> Result<()> {
        self.require_login()?;
        let language_code =
            LanguageCode::parse(language).ok_or_else(|| anyhow!("unknown language `{language}`"))?;
        let req = TemplateRequest::Legacy(LegacyTemplateRequest {
            name: name.to_string(),
            content: TemplateContent::Structured {
                body: body.to_string(),
            },
            kind: kind.to_uppercase(),
            language_code: Some(language_code.legacy()),
            provider_template_id: None,
        });
        let created = self.client.create_template(&req).await?;
        println!("Created template {} ({})", created.template.name, created.template.id);
        Ok(())
    }

    /// Create a component template, falling back to the legacy endpoint.
    pub async fn templates_build(&self, args: &StudioArgs) -> Result<()> {
        self.require_login()?;
        let draft = args.to_draft()?;
        let created = self
            .client
            .create_template(&TemplateRequest::Advanced(draft.to_request()))
            .await?;
        println!("{}", created.message());
        println!("Created template {} ({})", created.template.name, created.template.id);
        Ok(())
    }

    /// Preview a component template.
    pub async fn templates_preview(&self, args: &StudioArgs) -> Result<()> {
        self.require_login()?;
        let draft = args.to_draft()?;
        let body = self.client.preview_template(&draft).await;

        let header = draft.preview_header();
        if !header.is_empty() {
            println!("{header}");
            println!();
        }
        println!("{body}");
        if !draft.footer.trim().is_empty() {
            println!();
            println!("{}", draft.footer);
        }
        for button in &draft.buttons {
            println!("{}", button.preview_label());
        }
        Ok(())
    }

    /// Delete a template.
    pub async fn templates_delete(&self, id: &str) -> Result<()> {
        self.require_login()?;
        self.client.delete_template(id).await?;
        println!("Deleted template {id}");
        Ok(())
    }

    // ==================== Campaigns ====================

    /// List campaigns.
    pub async fn campaigns_list(&self) -> Result<()> {
        self.require_login()?;
        let campaigns = self.client.list_campaigns().await?;
        self.emit(&campaigns, || {
            if campaigns.is_empty() {
                println!("No campaigns found.");
            }
            for c in &campaigns {
                println!(
                    "{:<38} {:<24} {:<10} {:<18} {:>5.1}% ({}) {}",
                    c.id,
                    c.name,
                    c.status,
                    c.schedule_label(),
                    c.progress_percent(),
                    c.progress_label(),
                    c.created_at.as_deref().map(display_date).unwrap_or_default()
                );
            }
        })
    }

    /// Show one campaign.
    pub async fn campaigns_show(&self, id: &str) -> Result<()> {
        self.require_login()?;
        let c = self.client.get_campaign(id).await?;
        self.emit(&c, || {
            println!("{} ({})", c.name, c.id);
            println!("Status:    {}", c.status);
            println!("Scheduled: {}", c.schedule_label());
            println!(
                "Progress:  {:.1}% ({})",
                c.progress_percent(),
                c.progress_label()
            );
        })
    }

    /// Create a campaign from a CSV file.
    pub async fn campaigns_create(
        &self,
        name: &str,
        template_id: &str,
        csv: &Path,
        schedule: Option<&str>,
    ) -> Result<()> {
        self.require_login()?;
        let scheduled_at = match schedule {
            Some(raw) => Some(
                parse_local_input(raw).ok_or_else(|| anyhow!("invalid schedule `{raw}`"))?,
            ),
            None => None,
        };
        let upload = CampaignUpload::from_path(name, template_id, csv)?
            .scheduled_at(scheduled_at)
            .uploaded_by_user(self.client.session().user().map(|u| u.id));

        let created = self.client.create_campaign(upload).await?;
        println!("Campaign created successfully!");
        println!("  ID:     {}", created.id);
        println!("  Status: {}", created.status);
        Ok(())
    }

    /// Download a campaign's responses.
    pub async fn campaigns_export(&self, id: &str, out: &Path) -> Result<()> {
        self.require_login()?;
        let export = self
            .client
            .export_campaign_responses(id)
            .await
            .context("Failed to export campaign responses.")?;
        let path = export.save_to(out)?;
        println!("Saved {}", path.display());
        Ok(())
    }

    // ==================== Messages ====================

    /// Print chat history.
    pub async fn messages_history(&self, phone: &str) -> Result<()> {
        self.require_login()?;
        let history = self.client.message_history(phone).await?;
        self.emit(&history, || {
            if history.is_empty() {
                println!("No messages yet.");
            }
            for m in &history {
                let content = m.content();
                let arrow = if m.is_outgoing() { ">>" } else { "<<" };
                let ticks = if m.is_outgoing() { m.status.ticks() } else { "" };
                println!(
                    "{} {arrow} {} {content} {ticks}",
                    m.time_label(),
                    content.icon()
                );
            }
        })
    }

    /// Send a text or template message.
    pub async fn messages_send(
        &self,
        to: &str,
        template_id: Option<&str>,
        vars: Vec<(String, String)>,
        text: &str,
    ) -> Result<()> {
        self.require_login()?;
        let req = match template_id {
            Some(id) => {
                let template = self.client.get_template(id).await?;
                let mut variables: BTreeMap<String, String> = empty_variables(&template);
                variables.extend(vars);
                SendMessageRequest::template(to, id, variables)?
            }
            None => SendMessageRequest::text(to, text)?,
        };
        self.client.send_message(&req).await?;
        println!("Message sent successfully!");
        Ok(())
    }
}
