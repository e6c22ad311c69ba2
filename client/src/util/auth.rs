//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes must apply identical unauthenticated redirect behavior.
//! The decision itself is `session::guard::check`; this module wires it to
//! the router.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use session::{Access, AuthState, guard};

/// Redirect target for the current state, if a protected view must leave.
pub fn redirect_path(state: AuthState) -> Option<&'static str> {
    match guard::check(state, ()) {
        Access::Redirect(path) => Some(path),
        Access::Render(()) | Access::Pending => None,
    }
}

/// Redirect to the login view whenever auth has resolved without a session.
///
/// Re-evaluated every time `auth` changes, so signing out while a protected
/// view is mounted navigates away on the next pass.
pub fn install_unauth_redirect<F>(auth: ReadSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(path) = redirect_path(auth.get()) {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
