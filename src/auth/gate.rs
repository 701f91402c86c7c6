use tokio::sync::watch;

use super::identity::{AuthState, UserId};

/// Entry point the front end should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Spinner while the initial session check is pending
    Loading,
    Login,
    Home,
}

pub fn route_for(state: &AuthState) -> Route {
    match state {
        AuthState::Unknown => Route::Loading,
        AuthState::Unauthenticated => Route::Login,
        AuthState::Authenticated(_) => Route::Home,
    }
}

/// Observer side of the identity service
pub struct AuthGate {
    rx: watch::Receiver<AuthState>,
    closed: bool,
}

impl AuthGate {
    pub fn new(rx: watch::Receiver<AuthState>) -> Self {
        Self { rx, closed: false }
    }

    pub fn route(&self) -> Route {
        route_for(&self.rx.borrow())
    }

    pub fn user(&self) -> Option<UserId> {
        self.rx.borrow().user().cloned()
    }

    /// False once the identity service has gone away
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Wait for the next state change and return the resulting route
    ///
    /// Returns `None` once the sender is dropped; the last state stays readable.
    pub async fn changed(&mut self) -> Option<Route> {
        if self.closed {
            return None;
        }
        match self.rx.changed().await {
            Ok(()) => Some(self.route()),
            Err(_) => {
                self.closed = true;
                None
            }
        }
    }
}
