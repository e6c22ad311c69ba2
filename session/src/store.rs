//! Session state store: the single writer of [`AuthState`].
//!
//! ARCHITECTURE
//! ============
//! State is published through a `watch` channel; consumers only ever hold
//! [`AuthView`]s. The store mutates state only when a provider call has
//! completed, never optimistically.
//!
//! ORDERING
//! ========
//! Every mutating operation notes the publish generation when it starts. Its
//! completion is published only if nothing else was published since, so an
//! `authenticate` that resolves after a later `logout` cannot flip the state
//! back. A stale completion that agrees with the current state still
//! succeeds; one that disagrees fails with [`SessionError::Superseded`].
//! Since every publish resolves the state, a stale completion never finds it
//! `Unknown`.

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::provider::{
    Challenge, CodeDelivery, IdentityProvider, Notifier, ProviderError, Session, SignIn, UserHandle,
};
use crate::state::{AuthState, AuthView};

/// Errors returned by [`SessionStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No stored user handle. Expected at first visit; not a user-facing error.
    #[error("no current session")]
    NoSession,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A newer operation published a different outcome before this one
    /// completed.
    #[error("superseded by a newer session operation")]
    Superseded,
}

pub struct SessionStore<P> {
    provider: P,
    notifier: Box<dyn Notifier>,
    state: watch::Sender<AuthState>,
    generation: Mutex<u64>,
}

impl<P: IdentityProvider> SessionStore<P> {
    pub fn new(provider: P, notifier: impl Notifier + 'static) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self { provider, notifier: Box::new(notifier), state, generation: Mutex::new(0) }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn view(&self) -> AuthView {
        AuthView::new(self.state.subscribe())
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Ticket for an operation starting now: the number of publishes so far.
    fn begin(&self) -> u64 {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish `next` if nothing was published since `ticket` was taken.
    ///
    /// Only publishing advances the generation, so operations that end
    /// without a state change never invalidate others still in flight.
    fn commit(&self, ticket: u64, next: AuthState) -> bool {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *generation != ticket {
            tracing::debug!(ticket, current = *generation, ?next, "discarding stale session completion");
            return false;
        }
        *generation += 1;
        self.state.send_replace(next);
        true
    }

    /// Publish `Authenticated` for a sign-in that `handle` just completed.
    ///
    /// A stale sign-in is accepted when the state already says
    /// `Authenticated`. Otherwise a newer operation signed the user out, and
    /// the tokens the provider persisted for this sign-in are dropped again.
    async fn settle_sign_in(&self, ticket: u64, handle: &UserHandle) -> Result<(), SessionError> {
        if self.commit(ticket, AuthState::Authenticated) || self.state() == AuthState::Authenticated {
            return Ok(());
        }
        self.provider.sign_out(handle).await;
        Err(SessionError::Superseded)
    }

    /// Recover a previously stored session.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] when nothing is stored, or the provider's
    /// error when validation fails. Both leave the state `Unauthenticated`.
    /// [`SessionError::Superseded`] when a newer operation published a
    /// different outcome first.
    pub async fn hydrate(&self) -> Result<Session, SessionError> {
        let ticket = self.begin();
        let Some(handle) = self.provider.current_user() else {
            self.commit(ticket, AuthState::Unauthenticated);
            tracing::debug!("no stored user handle");
            return Err(SessionError::NoSession);
        };

        match self.provider.validate_session(&handle).await {
            Ok(session) => {
                self.settle_sign_in(ticket, &handle).await?;
                tracing::info!(username = %handle.username, "session hydrated");
                Ok(session)
            }
            Err(e) => {
                tracing::debug!(error = %e, "session hydration failed");
                if self.commit(ticket, AuthState::Unauthenticated) || self.state() == AuthState::Unauthenticated {
                    Err(e.into())
                } else {
                    Err(SessionError::Superseded)
                }
            }
        }
    }

    /// Current session for API calls, refreshed if expired.
    ///
    /// Never publishes state, so it can run alongside any other operation.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] when nothing is stored, or the provider's
    /// error when the stored session cannot be validated.
    pub async fn session(&self) -> Result<Session, SessionError> {
        let handle = self.provider.current_user().ok_or(SessionError::NoSession)?;
        Ok(self.provider.validate_session(&handle).await?)
    }

    /// Check credentials with the provider.
    ///
    /// A `NewPasswordRequired` outcome resolves `Ok` without changing state.
    ///
    /// # Errors
    ///
    /// The provider's error on rejection; state is left unchanged.
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> Result<SignIn, SessionError> {
        let ticket = self.begin();
        match self.provider.authenticate(identifier, secret).await {
            Ok(SignIn::Authenticated(session)) => {
                self.settle_sign_in(ticket, &UserHandle::new(identifier)).await?;
                tracing::info!(%identifier, "signed in");
                Ok(SignIn::Authenticated(session))
            }
            Ok(SignIn::NewPasswordRequired(challenge)) => {
                tracing::info!(%identifier, challenge = %challenge.name, "sign-in needs a new password");
                Ok(SignIn::NewPasswordRequired(challenge))
            }
            Err(e) => {
                tracing::warn!(%identifier, error = %e, "sign-in failed");
                Err(e.into())
            }
        }
    }

    /// Finish a sign-in that returned `NewPasswordRequired`.
    ///
    /// # Errors
    ///
    /// The provider's error on rejection; state is left unchanged.
    pub async fn complete_new_password(
        &self,
        identifier: &str,
        challenge: &Challenge,
        new_secret: &str,
    ) -> Result<Session, SessionError> {
        let ticket = self.begin();
        let session = self
            .provider
            .complete_new_password(identifier, challenge, new_secret)
            .await
            .inspect_err(|e| tracing::warn!(%identifier, error = %e, "new password rejected"))?;
        self.settle_sign_in(ticket, &UserHandle::new(identifier)).await?;
        tracing::info!(%identifier, "signed in after password change");
        Ok(session)
    }

    /// Drop the current session. No-op when no handle is stored.
    pub async fn logout(&self) {
        let Some(handle) = self.provider.current_user() else {
            return;
        };
        let ticket = self.begin();
        self.commit(ticket, AuthState::Unauthenticated);
        self.provider.sign_out(&handle).await;
        tracing::info!(username = %handle.username, "signed out");
    }

    /// Ask the provider to send a reset code.
    ///
    /// # Errors
    ///
    /// The provider's error, after its message was pushed to the notifier.
    pub async fn forgot_password(&self, identifier: &str) -> Result<CodeDelivery, SessionError> {
        match self.provider.begin_password_reset(identifier).await {
            Ok(delivery) => Ok(delivery),
            Err(e) => {
                self.notifier.notify(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Confirm a reset. A reset does not sign the user in.
    ///
    /// # Errors
    ///
    /// The provider's error on an invalid code or rejected secret.
    pub async fn reset_password(&self, identifier: &str, code: &str, new_secret: &str) -> Result<(), SessionError> {
        self.provider
            .confirm_password_reset(identifier, code, new_secret)
            .await
            .map_err(SessionError::from)
    }
}
