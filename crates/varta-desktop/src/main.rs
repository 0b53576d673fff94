//! # Varta Desktop
//!
//! Native desktop client for the Varta WhatsApp CRM.
//!
//! ## Architecture
//!
//! All state lives in the remote CRM backend. This application talks to it
//! through [`varta_core::CrmClient`] and renders the operator workflows:
//! dashboard, contacts, templates, campaigns and one-to-one chat.
//!
//! ## Modules
//!
//! - [`components`] - Shell and reusable UI components
//! - [`router`] - Application routes and guards
//! - [`state`] - Global application state
//! - [`views`] - Page-level view components

use dioxus::desktop::{Config as WindowConfig, LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use varta_core::{Config, CrmClient, SessionStore};

mod components;
mod router;
mod state;
mod views;

use router::Route;
use state::AppState;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "varta_desktop=info,varta_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Varta Desktop");

    let config = Config::load();
    // The saved session is read during bootstrap, not here.
    let store = Config::session_path().map_or_else(SessionStore::in_memory, SessionStore::at);

    let client = match CrmClient::from_config(&config, store) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build API client");
            std::process::exit(1);
        }
    };

    let cfg = WindowConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Varta CRM")
            .with_inner_size(LogicalSize::new(1280.0, 820.0))
            .with_min_inner_size(LogicalSize::new(960.0, 640.0)),
    );

    dioxus::LaunchBuilder::desktop()
        .with_cfg(cfg)
        .with_context(config)
        .with_context(client)
        .launch(App);
}

/// Root application component.
///
/// Provides global state, restores the saved session, keeps the `session`
/// signal in step with the store, and renders the router.
#[component]
fn App() -> Element {
    let config = use_context::<Config>();
    let client = use_context::<CrmClient>();
    let state = use_context_provider(move || AppState::new(config, client));

    // Bootstrap from disk once, then mirror every store change (login,
    // logout, 401 from any page) into the signal.
    use_future(move || async move {
        let mut state = state;
        let mut session = state.session;
        let mut loading = state.loading;

        let store = state.client().session().clone();
        let mut rx = store.subscribe();
        session.set(store.load());
        rx.borrow_and_update();
        loading.set(false);

        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().clone();
            if current.is_none() && session.peek().is_some() {
                tracing::info!("Session expired");
                state.set_error("Your session has expired. Please log in again.");
            }
            session.set(current);
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/styles.css") }
        Router::<Route> {}
    }
}
