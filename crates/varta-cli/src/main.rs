//! Varta CLI - Command-line interface for the Varta WhatsApp CRM.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use varta_core::config::API_URL_ENV;

mod commands;

/// Varta - WhatsApp CRM from the terminal
#[derive(Parser, Debug)]
#[command(name = "varta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// API base URL, including the /api/v1 prefix
    #[arg(long, env = API_URL_ENV, global = true)]
    api_url: Option<String>,

    /// Session file (default: platform config directory)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and save the session
    Login {
        /// Username
        username: String,
        /// Password
        #[arg(long, env = "VARTA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an operator account
    Register {
        /// Username
        username: String,
        /// Password
        #[arg(long, env = "VARTA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the logged-in user and tenant
    Whoami,

    /// Show dashboard statistics
    Stats,

    /// Manage contacts
    Contacts {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage message templates
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// Manage campaigns
    Campaigns {
        #[command(subcommand)]
        command: CampaignCommands,
    },

    /// Send messages and read chat history
    Messages {
        #[command(subcommand)]
        command: MessageCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
enum ContactCommands {
    /// List contacts
    List {
        /// Filter by name or phone
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a contact
    Add {
        /// Display name
        #[arg(long)]
        name: String,
        /// Phone number (a leading + is stripped)
        #[arg(long)]
        phone: String,
        /// Email address
        #[arg(long)]
        email: Option<String>,
    },

    /// Update a contact
    Update {
        /// Contact ID
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Phone number (a leading + is stripped)
        #[arg(long)]
        phone: String,
        /// Email address
        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a contact
    Delete {
        /// Contact ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateCommands {
    /// List templates
    List,

    /// Show one template
    Show {
        /// Template ID
        id: String,
    },

    /// Create a simple template through the legacy endpoint
    Create {
        /// Template name
        #[arg(long)]
        name: String,
        /// Body text with {{1}}-style placeholders
        #[arg(long)]
        body: String,
        /// TEXT, MEDIA or INTERACTIVE
        #[arg(long = "type", default_value = "TEXT")]
        kind: String,
        /// en or hi
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Create a component template (header, body, footer, buttons)
    Build(commands::StudioArgs),

    /// Preview a component template without creating it
    Preview(commands::StudioArgs),

    /// Delete a template
    Delete {
        /// Template ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum CampaignCommands {
    /// List campaigns with progress
    List,

    /// Show one campaign
    Show {
        /// Campaign ID
        id: String,
    },

    /// Create a campaign from a CSV file
    Create {
        /// Campaign name
        #[arg(long)]
        name: String,
        /// Template ID
        #[arg(long)]
        template: String,
        /// CSV file with the recipients
        #[arg(long)]
        csv: PathBuf,
        /// Local start time, YYYY-MM-DDTHH:MM (default: immediate)
        #[arg(long)]
        schedule: Option<String>,
    },

    /// Download the responses CSV
    Export {
        /// Campaign ID
        id: String,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum MessageCommands {
    /// Show chat history with a number
    History {
        /// Phone number
        phone: String,
    },

    /// Send a text or template message
    Send {
        /// Recipient phone number
        to: String,
        /// Template ID; omit to send text
        #[arg(long)]
        template: Option<String>,
        /// Template variable, KEY=VALUE (repeatable)
        #[arg(long = "var", value_parser = commands::parse_key_value)]
        vars: Vec<(String, String)>,
        /// Text to send without a template
        #[arg(long, default_value = varta_core::message::DEFAULT_TEXT)]
        text: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("varta={log_level},varta_core={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = commands::Context::new(cli.api_url, cli.session, cli.json)?;

    match cli.command {
        Commands::Login { username, password } => ctx.login(&username, &password).await,
        Commands::Register { username, password } => ctx.register(&username, &password).await,
        Commands::Logout => {
            ctx.logout();
            Ok(())
        }
        Commands::Whoami => ctx.whoami().await,
        Commands::Stats => ctx.stats().await,
        Commands::Contacts { command } => match command {
            ContactCommands::List { search } => ctx.contacts_list(search.as_deref()).await,
            ContactCommands::Add { name, phone, email } => {
                ctx.contacts_add(&name, &phone, email.as_deref()).await
            }
            ContactCommands::Update {
                id,
                name,
                phone,
                email,
            } => {
                ctx.contacts_update(&id, &name, &phone, email.as_deref())
                    .await
            }
            ContactCommands::Delete { id } => ctx.contacts_delete(&id).await,
        },
        Commands::Templates { command } => match command {
            TemplateCommands::List => ctx.templates_list().await,
            TemplateCommands::Show { id } => ctx.templates_show(&id).await,
            TemplateCommands::Create {
                name,
                body,
                kind,
                language,
            } => ctx.templates_create(&name, &body, &kind, &language).await,
            TemplateCommands::Build(args) => ctx.templates_build(&args).await,
            TemplateCommands::Preview(args) => ctx.templates_preview(&args).await,
            TemplateCommands::Delete { id } => ctx.templates_delete(&id).await,
        },
        Commands::Campaigns { command } => match command {
            CampaignCommands::List => ctx.campaigns_list().await,
            CampaignCommands::Show { id } => ctx.campaigns_show(&id).await,
            CampaignCommands::Create {
                name,
                template,
                csv,
                schedule,
            } => {
                ctx.campaigns_create(&name, &template, &csv, schedule.as_deref())
                    .await
            }
            CampaignCommands::Export { id, out } => ctx.campaigns_export(&id, &out).await,
        },
        Commands::Messages { command } => match command {
            MessageCommands::History { phone } => ctx.messages_history(&phone).await,
            MessageCommands::Send {
                to,
                template,
                vars,
                text,
            } => ctx.messages_send(&to, template.as_deref(), vars, &text).await,
        },
        Commands::Version => {
            println!("varta {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_send_with_repeated_vars() {
        let cli = Cli::try_parse_from([
            "varta", "messages", "send", "+919800000001", "--template", "t-1", "--var", "1=Asha",
            "--var", "2=ORD-7",
        ])
        .unwrap();

        let Commands::Messages {
            command: MessageCommands::Send { to, template, vars, text },
        } = cli.command
        else {
            panic!("expected messages send");
        };
        assert_eq!(to, "+919800000001");
        assert_eq!(template.as_deref(), Some("t-1"));
        assert_eq!(
            vars,
            vec![("1".to_string(), "Asha".to_string()), ("2".to_string(), "ORD-7".to_string())]
        );
        assert_eq!(text, "Hello");
    }

    #[test]
    fn verbosity_and_globals_anywhere() {
        let cli = Cli::try_parse_from(["varta", "contacts", "list", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }
}
