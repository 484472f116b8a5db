//! Authentication session
//!
//! Tracks whether a user is logged in, persisted across restarts under
//! its own storage key. Logging out never touches favorites.

use crate::config::storage::SESSION_KEY;
use crate::data::storage::{load_record, save_record, Storage};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { username: String },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Authenticated { username } => Some(username.as_str()),
            Session::Anonymous => None,
        }
    }
}

/// Decides whether a username/password pair may log in
pub trait Authenticator: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Single hardcoded demo account
///
/// Placeholder until a real credential backend exists.
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    username: String,
    password: String,
}

impl FixedCredentials {
    pub const DEMO_USERNAME: &'static str = "testuser";
    pub const DEMO_PASSWORD: &'static str = "password123";

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self::new(Self::DEMO_USERNAME, Self::DEMO_PASSWORD)
    }
}

impl Authenticator for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

// =============================================================================
// Persisted record
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct SessionUser {
    username: String,
}

/// On-disk shape: `{ "isAuthenticated": bool, "user": { "username" } | null }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default)]
    user: Option<SessionUser>,
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        match session {
            Session::Anonymous => Self {
                is_authenticated: false,
                user: None,
            },
            Session::Authenticated { username } => Self {
                is_authenticated: true,
                user: Some(SessionUser {
                    username: username.clone(),
                }),
            },
        }
    }
}

impl SessionRecord {
    /// Rebuild the session, treating any half-populated record as logged out
    fn into_session(self) -> Session {
        match (self.is_authenticated, self.user) {
            (true, Some(user)) => Session::Authenticated {
                username: user.username,
            },
            (false, None) => Session::Anonymous,
            (is_authenticated, user) => {
                warn!(
                    is_authenticated,
                    has_user = user.is_some(),
                    "inconsistent session record, starting anonymous"
                );
                Session::Anonymous
            }
        }
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Owns the session and writes it through on every transition
pub struct SessionStore {
    session: Session,
    storage: Arc<dyn Storage>,
    authenticator: Box<dyn Authenticator>,
}

impl SessionStore {
    /// Rehydrate from storage using the demo credentials
    pub fn load(storage: Arc<dyn Storage>) -> Result<Self> {
        Self::load_with(storage, Box::new(FixedCredentials::default()))
    }

    /// Rehydrate from storage with a custom authenticator
    pub fn load_with(storage: Arc<dyn Storage>, authenticator: Box<dyn Authenticator>) -> Result<Self> {
        let session = load_record::<SessionRecord>(storage.as_ref(), SESSION_KEY)?
            .map(SessionRecord::into_session)
            .unwrap_or_default();

        Ok(Self {
            session,
            storage,
            authenticator,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    /// Attempt to log in. Returns `Ok(false)` for bad credentials, leaving
    /// the current state untouched.
    pub fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        if !self.authenticator.verify(username, password) {
            info!(username, "login rejected");
            return Ok(false);
        }

        let next = Session::Authenticated {
            username: username.to_string(),
        };
        self.persist(&next)?;
        self.session = next;
        info!(username, "logged in");
        Ok(true)
    }

    /// Log out unconditionally
    ///
    /// The in-memory session is anonymous even when the write fails; the
    /// write error is still returned.
    pub fn logout(&mut self) -> Result<()> {
        if let Session::Authenticated { username } = std::mem::take(&mut self.session) {
            info!(username = %username, "logged out");
        }
        self.persist(&Session::Anonymous)
    }

    fn persist(&self, session: &Session) -> Result<()> {
        save_record(self.storage.as_ref(), SESSION_KEY, &SessionRecord::from(session))
    }
}
