//! # session
//!
//! Authentication state for the cardodds web client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The client holds exactly one [`SessionStore`]. It is the only writer of
//! [`AuthState`]; pages and the route guard read it through an [`AuthView`].
//! The store talks to the hosted identity provider through the
//! [`IdentityProvider`] trait, implemented for Cognito user pools by
//! [`CognitoProvider`].
//!
//! ```text
//! pages ──► SessionStore ──► IdentityProvider ──► Cognito JSON API
//!   ▲            │
//!   └── AuthView ┘──► guard::check
//! ```

pub mod cognito;
pub mod guard;
pub mod provider;
pub mod state;
pub mod store;

pub use cognito::{CognitoConfig, CognitoProvider, MemoryTokenStore, TokenStore, system_clock};
pub use guard::{Access, LOGIN_PATH};
pub use provider::{
    Challenge, CodeDelivery, IdentityProvider, LogNotifier, Notifier, ProviderError, Session, SignIn, UserHandle,
};
pub use state::{AuthState, AuthView};
pub use store::{SessionError, SessionStore};
