//! Identity-provider capability surface and its value types.
//!
//! DESIGN
//! ======
//! The store never speaks a wire protocol itself. Everything it needs from the
//! hosted directory goes through [`IdentityProvider`], which keeps the store
//! testable against scripted stubs. Futures are `?Send` because the browser
//! HTTP stack is single-threaded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// VALUE TYPES
// =============================================================================

/// "Current user" handle recovered from local persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserHandle {
    pub username: String,
}

impl UserHandle {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }
}

/// Token bundle issued by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix seconds after which the ID token is no longer accepted.
    pub expires_at: u64,
}

impl Session {
    #[must_use]
    pub fn is_valid_at(&self, now_secs: u64) -> bool {
        !self.id_token.is_empty() && now_secs < self.expires_at
    }
}

/// Intermediate outcome that needs more user input before a session exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub name: String,
    /// Opaque provider token that must be echoed back with the response.
    pub session: String,
    pub parameters: HashMap<String, String>,
}

impl Challenge {
    pub const NEW_PASSWORD_REQUIRED: &'static str = "NEW_PASSWORD_REQUIRED";

    #[must_use]
    pub fn requires_new_password(&self) -> bool {
        self.name == Self::NEW_PASSWORD_REQUIRED
    }
}

/// Outcome of a credential check that did not fail.
///
/// `NewPasswordRequired` resolves successfully but is not a completed login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignIn {
    Authenticated(Session),
    NewPasswordRequired(Challenge),
}

/// Where a password-reset code was delivered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeDelivery {
    pub destination: Option<String>,
    pub medium: Option<String>,
}

// =============================================================================
// ERROR
// =============================================================================

/// Failures reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider refused the request (bad credentials, bad code, ...).
    #[error("{message}")]
    Rejected { kind: String, message: String },

    /// The provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with a body we could not understand.
    #[error("unexpected identity provider response: {0}")]
    Malformed(String),

    /// Sign-in asked for a challenge this client cannot answer (MFA, ...).
    #[error("sign-in requires an unsupported step: {0}")]
    UnsupportedChallenge(String),

    /// Local persistence holds no usable session for the handle.
    #[error("no stored session")]
    NoTokens,
}

impl ProviderError {
    #[must_use]
    pub fn rejected(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected { kind: kind.into(), message: message.into() }
    }

    /// Provider error kind, e.g. `NotAuthorizedException`, when known.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Rejected { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Capabilities consumed from the hosted identity provider.
#[async_trait::async_trait(?Send)]
pub trait IdentityProvider {
    /// Handle of the last signed-in user, if local persistence has one.
    fn current_user(&self) -> Option<UserHandle>;

    /// Validate the stored session for `handle`, refreshing it if expired.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when no usable session can be produced.
    async fn validate_session(&self, handle: &UserHandle) -> Result<Session, ProviderError>;

    /// Run the credential challenge.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on bad credentials or transport failure.
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<SignIn, ProviderError>;

    /// Answer a `NEW_PASSWORD_REQUIRED` challenge.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the provider rejects the new secret.
    async fn complete_new_password(
        &self,
        identifier: &str,
        challenge: &Challenge,
        new_secret: &str,
    ) -> Result<Session, ProviderError>;

    /// Invalidate the session. Best effort; never fails.
    async fn sign_out(&self, handle: &UserHandle);

    /// Start the password-reset flow.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the provider refuses to send a code.
    async fn begin_password_reset(&self, identifier: &str) -> Result<CodeDelivery, ProviderError>;

    /// Confirm a password reset with the delivered code.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on an invalid code or rejected secret.
    async fn confirm_password_reset(&self, identifier: &str, code: &str, new_secret: &str)
    -> Result<(), ProviderError>;
}

/// User-visible notification sink for failures the user must see immediately.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Notifier that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(%message, "user notification");
    }
}
