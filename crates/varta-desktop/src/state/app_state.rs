//! # Application State
//!
//! Global state management using Dioxus signals and context.

use dioxus::prelude::*;
use varta_core::{ApiResult, Config, CrmClient, Session, User};

/// Global application state.
///
/// Shared across all components via Dioxus context.
/// Use `use_context::<AppState>()` to access in components.
///
/// # Examples
///
/// ```rust,ignore
/// #[component]
/// fn Greeting() -> Element {
///     let state = use_context::<AppState>();
///     let name = state.user().map(|u| u.username).unwrap_or_default();
///
///     rsx! {
///         p { "Signed in as {name}" }
///     }
/// }
/// ```
#[derive(Clone, Copy)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Signal<Config>,

    /// Current session; mirrors the client's session store.
    pub session: Signal<Option<Session>>,

    /// True until the saved session has been read.
    pub loading: Signal<bool>,

    /// Last error shown in the shell banner.
    pub last_error: Signal<Option<String>>,

    client: Signal<CrmClient>,
}

impl AppState {
    /// Creates the state around an API client. The session is restored later
    /// by the bootstrap task.
    #[must_use]
    pub fn new(config: Config, client: CrmClient) -> Self {
        Self {
            config: Signal::new(config),
            session: Signal::new(None),
            loading: Signal::new(true),
            last_error: Signal::new(None),
            client: Signal::new(client),
        }
    }

    /// A handle to the API client. Clones share the session store.
    #[must_use]
    pub fn client(&self) -> CrmClient {
        self.client.read().clone()
    }

    /// Check if user is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.read().is_some()
    }

    /// The logged-in user.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.read().as_ref().map(|s| s.user.clone())
    }

    /// Minimum phone length before chat history is fetched.
    #[must_use]
    pub fn history_min_phone_len(&self) -> usize {
        self.config.read().history_min_phone_len
    }

    // ==================== Authentication Methods ====================

    /// Log in and publish the new session.
    ///
    /// # Errors
    ///
    /// Returns the client's error when the backend rejects the credentials.
    pub async fn login(mut self, username: &str, password: &str) -> ApiResult<()> {
        let session = self.client().login(username, password).await?;
        self.session.set(Some(session));
        self.last_error.set(None);
        Ok(())
    }

    /// Log out and forget the saved session.
    pub fn logout(&mut self) {
        self.client.read().logout();
        self.session.set(None);
        self.last_error.set(None);
    }

    /// Records an error message for the shell banner.
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.last_error.set(Some(msg.into()));
    }

    /// Clears the last error.
    pub fn clear_error(&mut self) {
        self.last_error.set(None);
    }
}
