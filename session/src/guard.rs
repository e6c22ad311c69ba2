//! Route guard decision for protected views.
//!
//! The decision is a pure function of the current [`AuthState`]; callers
//! re-run it on every navigation or render pass instead of caching it.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use crate::state::AuthState;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// What to do with a navigation to a protected destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access<T> {
    /// Render the requested destination unchanged.
    Render(T),
    /// Hydration has not finished; show a placeholder and wait.
    Pending,
    /// Send the visitor to the given path.
    Redirect(&'static str),
}

#[must_use]
pub fn check<T>(state: AuthState, target: T) -> Access<T> {
    match state {
        AuthState::Authenticated => Access::Render(target),
        AuthState::Unknown => Access::Pending,
        AuthState::Unauthenticated => Access::Redirect(LOGIN_PATH),
    }
}

/// `true` when a protected view must navigate away right now.
#[must_use]
pub fn should_redirect(state: AuthState) -> bool {
    matches!(check(state, ()), Access::Redirect(_))
}
