//! Authentication state value and its read-only view.
//!
//! DESIGN
//! ======
//! `Unknown` is distinct from `Unauthenticated` so consumers can tell "not
//! hydrated yet" apart from "no session". Both report `false` from
//! [`AuthState::is_authenticated`].

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

use tokio::sync::watch;

/// Summary of whether a valid session currently exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Hydration has not completed yet.
    #[default]
    Unknown,
    /// No session.
    Unauthenticated,
    /// A validated session exists.
    Authenticated,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// `true` once any session operation has produced an outcome.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn from_authenticated(is_authenticated: bool) -> Self {
        if is_authenticated { Self::Authenticated } else { Self::Unauthenticated }
    }
}

/// Read-only subscription to the store's [`AuthState`].
///
/// Cloning is cheap; every clone observes the same single writer.
#[derive(Clone, Debug)]
pub struct AuthView {
    rx: watch::Receiver<AuthState>,
}

impl AuthView {
    pub(crate) fn new(rx: watch::Receiver<AuthState>) -> Self {
        Self { rx }
    }

    /// Current value, marking it as seen.
    pub fn current(&mut self) -> AuthState {
        *self.rx.borrow_and_update()
    }

    /// Current value without touching change tracking.
    #[must_use]
    pub fn peek(&self) -> AuthState {
        *self.rx.borrow()
    }

    /// Wait until the state is published again.
    ///
    /// # Errors
    ///
    /// Returns an error once the owning store has been dropped.
    pub async fn changed(&mut self) -> Result<AuthState, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(*self.rx.borrow_and_update())
    }
}
