//! Client-held auth session: token plus cached user profile.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway reads the token from here on every request, login and logout
//! replace it wholesale, and a 401 from any endpoint expires it. Consumers
//! that care about those transitions (the CLI, a UI shell) subscribe to
//! [`SessionEvent`]s instead of the gateway navigating on their behalf.

use tokio::sync::broadcast;

use crate::models::{AuthSession, SessionUser};
use crate::storage::Storage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

const EVENT_CAPACITY: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    /// The backend rejected the token; the caller should send the user to login.
    Expired { message: String },
}

#[derive(Debug)]
pub struct Session {
    storage: Storage,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    /// Read whatever session survived the last run.
    #[must_use]
    pub fn restore(&self) -> Option<AuthSession> {
        let token = self.token()?;
        Some(AuthSession { token, user: self.user() })
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get::<String>(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.storage.get(USER_KEY)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the stored session with `session`.
    pub fn establish(&self, session: AuthSession) {
        self.storage.set(TOKEN_KEY, &session.token);
        match &session.user {
            Some(user) => self.storage.set(USER_KEY, user),
            None => self.storage.remove(USER_KEY),
        }
        tracing::info!(user = session.user.as_ref().map(|u| u.email.as_str()), "session established");
        self.emit(SessionEvent::LoggedIn);
    }

    /// Drop the session after an explicit logout.
    pub fn end(&self) {
        self.wipe();
        tracing::info!("session ended");
        self.emit(SessionEvent::LoggedOut);
    }

    /// Drop the session because the backend rejected it.
    pub fn expire(&self, message: &str) {
        self.wipe();
        tracing::warn!(message, "session expired");
        self.emit(SessionEvent::Expired { message: message.to_owned() });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn wipe(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is the common case outside interactive front ends.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
