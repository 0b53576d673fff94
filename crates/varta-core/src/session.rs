//! # Session Store
//!
//! The persisted login session (bearer token and user) shared by the API
//! client and the UI.
//!
//! A [`SessionStore`] is created once at startup and passed explicitly to
//! everything that needs it. It is written only by login, logout and the API
//! client's 401/403 handling; every write is broadcast to subscribers.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::SessionError;

/// The authenticated operator as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Role name (e.g. `ADMIN`).
    #[serde(default)]
    pub role: String,
    /// Tenant the user belongs to, sent as `X-Client-Id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// A logged-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// The user the token belongs to.
    pub user: User,
}

impl Session {
    /// Tenant identifier, if the user has one.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.user.client_id.as_deref()
    }
}

struct Inner {
    path: Option<PathBuf>,
    tx: watch::Sender<Option<Session>>,
}

/// Observable, optionally file-backed session holder.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Creates a store that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_path(None)
    }

    /// Creates a store persisted at `path` without reading it yet.
    ///
    /// Call [`SessionStore::load`] to bootstrap from disk.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::with_path(Some(path.into()))
    }

    /// Creates a store persisted at `path` and loads any saved session.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self::at(path);
        store.load();
        store
    }

    fn with_path(path: Option<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(Inner { path, tx }),
        }
    }

    /// File backing this store, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Reads the persisted session into the store and returns it.
    ///
    /// A missing or unreadable file leaves the store logged out.
    pub fn load(&self) -> Option<Session> {
        let path = self.inner.path.as_ref()?;

        let session = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Session>(&contents) {
                Ok(session) => {
                    tracing::info!(username = %session.user.username, "Restored session");
                    Some(session)
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Discarding unreadable session file");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read session file");
                None
            }
        };

        self.inner.tx.send_replace(session.clone());
        session
    }

    /// The current session, if logged in.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.inner.tx.borrow().clone()
    }

    /// Returns true if a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.tx.borrow().is_some()
    }

    /// The current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    /// The current tenant identifier.
    #[must_use]
    pub fn client_id(&self) -> Option<String> {
        self.inner
            .tx
            .borrow()
            .as_ref()
            .and_then(|s| s.user.client_id.clone())
    }

    /// The current user.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Stores and persists a new session, notifying subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session file cannot be written. The
    /// in-memory session is updated regardless.
    pub fn set(&self, session: Session) -> Result<(), SessionError> {
        let result = self.persist(&session);
        self.inner.tx.send_replace(Some(session));
        result
    }

    fn persist(&self, session: &Session) -> Result<(), SessionError> {
        let Some(path) = self.inner.path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(session)?)?;
        tracing::debug!(?path, "Persisted session");
        Ok(())
    }

    /// Drops the session and its file, notifying subscribers.
    pub fn clear(&self) {
        if let Some(path) = self.inner.path.as_ref() {
            match fs::remove_file(path) {
                Ok(()) => tracing::debug!(?path, "Removed session file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(?path, error = %e, "Failed to remove session file"),
            }
        }
        self.inner.tx.send_replace(None);
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.tx.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.inner.path)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
