//! Session context for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell creates one [`SessionStore`] at startup and provides a
//! [`SessionContext`] through Leptos context. Pages call store operations;
//! everything else reads the mirrored `auth` signal. Hydration of a stored
//! session is kicked off here so it starts before any protected view renders.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

#[cfg(feature = "hydrate")]
use std::rc::Rc;

use leptos::prelude::*;
use session::{AuthState, CognitoProvider, SessionStore};

use crate::config::ClientConfig;
use crate::util::browser::BrowserTokenStore;

pub type Provider = CognitoProvider<BrowserTokenStore>;
pub type Store = SessionStore<Provider>;

/// Handle to the session store plus a read-only mirror of its state.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub auth: ReadSignal<AuthState>,
    #[cfg(feature = "hydrate")]
    store: StoredValue<Rc<Store>, LocalStorage>,
}

impl SessionContext {
    /// The store. Only exists in the browser.
    #[cfg(feature = "hydrate")]
    pub fn store(&self) -> Rc<Store> {
        self.store.get_value()
    }
}

/// Create the store, start hydration and provide the context.
///
/// On the server the state stays `Unknown`, so protected views render their
/// loading placeholder and the browser takes over after hydration.
pub fn provide_session(config: &ClientConfig) -> SessionContext {
    let auth = RwSignal::new(AuthState::Unknown);

    #[cfg(feature = "hydrate")]
    let ctx = {
        let provider = Provider::new(config.cognito.clone(), BrowserTokenStore)
            .with_clock(crate::util::browser::now_secs);
        let store = Rc::new(SessionStore::new(provider, crate::util::browser::AlertNotifier));

        let mut view = store.view();
        leptos::task::spawn_local(async move {
            auth.set(view.current());
            while let Ok(next) = view.changed().await {
                auth.set(next);
            }
        });

        let hydrating = store.clone();
        leptos::task::spawn_local(async move {
            match hydrating.hydrate().await {
                Ok(_) => log::info!("stored session restored"),
                Err(e) => log::debug!("no session restored: {e}"),
            }
        });

        SessionContext { auth: auth.read_only(), store: StoredValue::new_local(store) }
    };

    #[cfg(not(feature = "hydrate"))]
    let ctx = {
        let _ = config;
        SessionContext { auth: auth.read_only() }
    };

    provide_context(ctx);
    ctx
}

/// Fetch the session context provided by the shell.
pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

/// Label for the nav-bar auth link; `None` until auth has resolved, so the
/// bar shows no link rather than an empty one.
pub fn nav_label(state: AuthState) -> Option<&'static str> {
    match state {
        AuthState::Authenticated => Some("Sign out"),
        AuthState::Unauthenticated => Some("Sign in"),
        AuthState::Unknown => None,
    }
}
