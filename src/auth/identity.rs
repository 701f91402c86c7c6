use anyhow::Result;
use std::fmt;
use tokio::sync::watch;

/// Identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Trimmed, non-empty identifier
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            anyhow::bail!("user id must not be empty");
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session state as last reported by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// The initial session check has not finished yet
    #[default]
    Unknown,
    Unauthenticated,
    Authenticated(UserId),
}

impl AuthState {
    pub fn user(&self) -> Option<&UserId> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Owner of the session state; everybody else holds a receiver
pub struct IdentityService {
    tx: watch::Sender<AuthState>,
}

impl IdentityService {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::Unknown);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.tx.borrow().user().cloned()
    }

    /// Finish the initial session check with whatever session was found
    pub fn resolve_initial(&self, session: Option<UserId>) {
        match session {
            Some(user) => self.sign_in(user),
            None => self.publish(AuthState::Unauthenticated),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        self.publish(AuthState::Authenticated(user));
    }

    pub fn sign_out(&self) {
        self.publish(AuthState::Unauthenticated);
    }

    fn publish(&self, state: AuthState) {
        match &state {
            AuthState::Authenticated(user) => tracing::info!(user = %user, "signed in"),
            AuthState::Unauthenticated => tracing::info!("no authenticated session"),
            AuthState::Unknown => {}
        }
        // Works with zero receivers, unlike `send`.
        self.tx.send_replace(state);
    }
}

impl Default for IdentityService {
    fn default() -> Self {
        Self::new()
    }
}
