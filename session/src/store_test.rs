use super::*;
use crate::provider::UserHandle;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tokio::sync::Notify;

// =========================================================================
// StubProvider
// =========================================================================

#[derive(Clone, Copy)]
enum AuthScript {
    Succeed,
    NewPassword,
    Reject,
}

struct StubProvider {
    handle: RefCell<Option<UserHandle>>,
    validate: Result<Session, ProviderError>,
    validate_gate: Option<Rc<Notify>>,
    auth: AuthScript,
    auth_gate: Option<Rc<Notify>>,
    reset: Result<CodeDelivery, ProviderError>,
    sign_outs: Cell<usize>,
    confirmed: RefCell<Vec<(String, String, String)>>,
}

impl StubProvider {
    fn new() -> Self {
        Self {
            handle: RefCell::new(None),
            validate: Ok(session()),
            validate_gate: None,
            auth: AuthScript::Succeed,
            auth_gate: None,
            reset: Ok(CodeDelivery { destination: Some("u***@example.com".into()), medium: Some("EMAIL".into()) }),
            sign_outs: Cell::new(0),
            confirmed: RefCell::new(Vec::new()),
        }
    }

    fn with_handle(self, username: &str) -> Self {
        *self.handle.borrow_mut() = Some(UserHandle::new(username));
        self
    }
}

fn session() -> Session {
    Session {
        id_token: "id-token".into(),
        access_token: "access-token".into(),
        refresh_token: Some("refresh-token".into()),
        expires_at: 4_000_000_000,
    }
}

fn challenge() -> Challenge {
    Challenge { name: Challenge::NEW_PASSWORD_REQUIRED.into(), session: "opaque".into(), parameters: HashMap::new() }
}

fn bad_credentials() -> ProviderError {
    ProviderError::rejected("NotAuthorizedException", "Incorrect username or password.")
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for StubProvider {
    fn current_user(&self) -> Option<UserHandle> {
        self.handle.borrow().clone()
    }

    async fn validate_session(&self, _handle: &UserHandle) -> Result<Session, ProviderError> {
        if let Some(gate) = &self.validate_gate {
            gate.notified().await;
        }
        self.validate.clone()
    }

    async fn authenticate(&self, identifier: &str, _secret: &str) -> Result<SignIn, ProviderError> {
        if let Some(gate) = &self.auth_gate {
            gate.notified().await;
        }
        match self.auth {
            AuthScript::Succeed => {
                *self.handle.borrow_mut() = Some(UserHandle::new(identifier));
                Ok(SignIn::Authenticated(session()))
            }
            AuthScript::NewPassword => Ok(SignIn::NewPasswordRequired(challenge())),
            AuthScript::Reject => Err(bad_credentials()),
        }
    }

    async fn complete_new_password(
        &self,
        identifier: &str,
        _challenge: &Challenge,
        new_secret: &str,
    ) -> Result<Session, ProviderError> {
        if new_secret.len() < 8 {
            return Err(ProviderError::rejected("InvalidPasswordException", "Password too short."));
        }
        *self.handle.borrow_mut() = Some(UserHandle::new(identifier));
        Ok(session())
    }

    async fn sign_out(&self, _handle: &UserHandle) {
        self.sign_outs.set(self.sign_outs.get() + 1);
        *self.handle.borrow_mut() = None;
    }

    async fn begin_password_reset(&self, _identifier: &str) -> Result<CodeDelivery, ProviderError> {
        self.reset.clone()
    }

    async fn confirm_password_reset(&self, identifier: &str, code: &str, new_secret: &str) -> Result<(), ProviderError> {
        if code != "123456" {
            return Err(ProviderError::rejected("CodeMismatchException", "Invalid verification code provided."));
        }
        self.confirmed
            .borrow_mut()
            .push((identifier.to_owned(), code.to_owned(), new_secret.to_owned()));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}

fn store(provider: StubProvider) -> SessionStore<StubProvider> {
    SessionStore::new(provider, RecordingNotifier::default())
}

// =========================================================================
// initial state
// =========================================================================

#[test]
fn new_store_starts_unknown_and_unauthenticated() {
    let store = store(StubProvider::new());
    assert_eq!(store.state(), AuthState::Unknown);
    assert!(!store.state().is_authenticated());
}

// =========================================================================
// hydrate
// =========================================================================

#[tokio::test]
async fn hydrate_without_handle_fails_and_resolves_unauthenticated() {
    let store = store(StubProvider::new());
    let err = store.hydrate().await.unwrap_err();
    assert_eq!(err, SessionError::NoSession);
    assert_eq!(store.state(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn hydrate_with_valid_session_authenticates() {
    let store = store(StubProvider::new().with_handle("user@example.com"));
    let restored = store.hydrate().await.unwrap();
    assert_eq!(restored, session());
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn hydrate_validation_failure_clears_state() {
    let mut provider = StubProvider::new().with_handle("user@example.com");
    provider.validate = Err(ProviderError::NoTokens);
    let store = store(provider);

    let err = store.hydrate().await.unwrap_err();
    assert_eq!(err, SessionError::Provider(ProviderError::NoTokens));
    assert_eq!(store.state(), AuthState::Unauthenticated);
}

// =========================================================================
// authenticate
// =========================================================================

#[tokio::test]
async fn authenticate_success_sets_authenticated() {
    let store = store(StubProvider::new());
    let outcome = store.authenticate("user@example.com", "correctpw").await.unwrap();
    assert_eq!(outcome, SignIn::Authenticated(session()));
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn authenticate_failure_leaves_state_unchanged() {
    let mut provider = StubProvider::new();
    provider.auth = AuthScript::Reject;
    let store = store(provider);

    let err = store.authenticate("user@example.com", "wrongpw").await.unwrap_err();
    assert_eq!(err, SessionError::Provider(bad_credentials()));
    assert_eq!(err.to_string(), "Incorrect username or password.");
    assert!(!store.state().is_authenticated());
}

#[tokio::test]
async fn authenticate_failure_after_hydrate_keeps_unauthenticated() {
    let mut provider = StubProvider::new();
    provider.auth = AuthScript::Reject;
    let store = store(provider);
    let _ = store.hydrate().await;

    let _ = store.authenticate("user@example.com", "wrongpw").await;
    assert_eq!(store.state(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn new_password_challenge_resolves_without_authenticating() {
    let mut provider = StubProvider::new();
    provider.auth = AuthScript::NewPassword;
    let store = store(provider);
    let _ = store.hydrate().await;

    let outcome = store.authenticate("user@example.com", "temporary").await.unwrap();
    let SignIn::NewPasswordRequired(challenge) = outcome else {
        panic!("expected a new-password challenge");
    };
    assert!(challenge.requires_new_password());
    assert_eq!(store.state(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn new_password_challenge_keeps_authenticated_state() {
    let mut provider = StubProvider::new().with_handle("user@example.com");
    provider.auth = AuthScript::NewPassword;
    let store = store(provider);
    store.hydrate().await.unwrap();

    store.authenticate("other@example.com", "temporary").await.unwrap();
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn complete_new_password_authenticates() {
    let mut provider = StubProvider::new();
    provider.auth = AuthScript::NewPassword;
    let store = store(provider);

    let SignIn::NewPasswordRequired(challenge) = store.authenticate("user@example.com", "temporary").await.unwrap()
    else {
        panic!("expected a new-password challenge");
    };
    store
        .complete_new_password("user@example.com", &challenge, "a-long-new-password")
        .await
        .unwrap();
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn complete_new_password_rejection_leaves_state() {
    let store = store(StubProvider::new());
    let _ = store.hydrate().await;

    let err = store
        .complete_new_password("user@example.com", &challenge(), "short")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Provider(ProviderError::Rejected { .. })));
    assert_eq!(store.state(), AuthState::Unauthenticated);
}

// =========================================================================
// logout
// =========================================================================

#[tokio::test]
async fn logout_without_handle_is_noop() {
    let store = store(StubProvider::new());
    store.logout().await;
    assert!(!store.state().is_authenticated());
    assert_eq!(store.provider().sign_outs.get(), 0);
}

#[tokio::test]
async fn authenticate_then_logout_signs_out_once() {
    let store = store(StubProvider::new());
    store.authenticate("user@example.com", "correctpw").await.unwrap();
    assert!(store.state().is_authenticated());

    store.logout().await;
    assert_eq!(store.state(), AuthState::Unauthenticated);
    assert_eq!(store.provider().sign_outs.get(), 1);

    store.logout().await;
    assert_eq!(store.provider().sign_outs.get(), 1);
}

#[tokio::test]
async fn logout_racing_pending_authenticate_wins() {
    let gate = Rc::new(Notify::new());
    let mut provider = StubProvider::new().with_handle("user@example.com");
    provider.auth_gate = Some(gate.clone());
    let store = store(provider);

    let (outcome, ()) = tokio::join!(store.authenticate("user@example.com", "correctpw"), async {
        tokio::task::yield_now().await;
        store.logout().await;
        gate.notify_one();
    });

    assert_eq!(outcome.unwrap_err(), SessionError::Superseded);
    assert_eq!(store.state(), AuthState::Unauthenticated);
    // The late sign-in's persisted tokens are dropped again.
    assert_eq!(store.provider().sign_outs.get(), 2);
    assert_eq!(store.provider().current_user(), None);
}

#[tokio::test]
async fn concurrent_sign_ins_both_succeed() {
    let gate = Rc::new(Notify::new());
    let mut provider = StubProvider::new();
    provider.auth_gate = Some(gate.clone());
    let store = store(provider);

    let (first, second, ()) = tokio::join!(
        store.authenticate("user@example.com", "correctpw"),
        store.authenticate("user@example.com", "correctpw"),
        async { gate.notify_waiters() }
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(store.state(), AuthState::Authenticated);
    assert_eq!(store.provider().sign_outs.get(), 0);
}

// =========================================================================
// hydrate racing other operations
// =========================================================================

fn gated_hydrate_provider(gate: &Rc<Notify>) -> StubProvider {
    let mut provider = StubProvider::new().with_handle("user@example.com");
    provider.validate_gate = Some(gate.clone());
    provider
}

#[tokio::test]
async fn hydrate_survives_rejected_sign_in() {
    let gate = Rc::new(Notify::new());
    let mut provider = gated_hydrate_provider(&gate);
    provider.auth = AuthScript::Reject;
    let store = store(provider);

    let (hydrated, signed_in) = tokio::join!(store.hydrate(), async {
        let outcome = store.authenticate("user@example.com", "wrongpw").await;
        gate.notify_one();
        outcome
    });

    assert!(signed_in.is_err());
    assert_eq!(hydrated.unwrap(), session());
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn hydrate_survives_new_password_challenge() {
    let gate = Rc::new(Notify::new());
    let mut provider = gated_hydrate_provider(&gate);
    provider.auth = AuthScript::NewPassword;
    let store = store(provider);

    let (hydrated, signed_in) = tokio::join!(store.hydrate(), async {
        let outcome = store.authenticate("user@example.com", "temporary").await;
        gate.notify_one();
        outcome
    });

    assert!(matches!(signed_in, Ok(SignIn::NewPasswordRequired(_))));
    assert!(hydrated.is_ok());
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn overlapping_hydrates_both_succeed() {
    let gate = Rc::new(Notify::new());
    let store = store(gated_hydrate_provider(&gate));

    let (first, second, ()) = tokio::join!(store.hydrate(), store.hydrate(), async { gate.notify_waiters() });

    assert_eq!(first.unwrap(), session());
    assert_eq!(second.unwrap(), session());
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn logout_racing_pending_hydrate_wins() {
    let gate = Rc::new(Notify::new());
    let store = store(gated_hydrate_provider(&gate));

    let (hydrated, ()) = tokio::join!(store.hydrate(), async {
        tokio::task::yield_now().await;
        store.logout().await;
        gate.notify_one();
    });

    assert_eq!(hydrated.unwrap_err(), SessionError::Superseded);
    assert_eq!(store.state(), AuthState::Unauthenticated);
    assert_eq!(store.provider().current_user(), None);
}

#[tokio::test]
async fn failed_hydrate_does_not_overwrite_newer_sign_in() {
    let gate = Rc::new(Notify::new());
    let mut provider = gated_hydrate_provider(&gate);
    provider.validate = Err(ProviderError::NoTokens);
    let store = store(provider);

    let (hydrated, signed_in) = tokio::join!(store.hydrate(), async {
        let outcome = store.authenticate("user@example.com", "correctpw").await;
        gate.notify_one();
        outcome
    });

    assert!(signed_in.is_ok());
    assert_eq!(hydrated.unwrap_err(), SessionError::Superseded);
    assert_eq!(store.state(), AuthState::Authenticated);
}

// =========================================================================
// session
// =========================================================================

#[tokio::test]
async fn session_returns_tokens_without_publishing() {
    let store = store(StubProvider::new().with_handle("user@example.com"));
    assert_eq!(store.session().await.unwrap(), session());
    assert_eq!(store.state(), AuthState::Unknown);
}

#[tokio::test]
async fn session_without_handle_is_no_session() {
    let store = store(StubProvider::new());
    assert_eq!(store.session().await.unwrap_err(), SessionError::NoSession);
    assert_eq!(store.state(), AuthState::Unknown);
}

#[tokio::test]
async fn session_runs_alongside_hydrate() {
    let gate = Rc::new(Notify::new());
    let store = store(gated_hydrate_provider(&gate));

    let (hydrated, current, ()) = tokio::join!(store.hydrate(), store.session(), async { gate.notify_waiters() });

    assert!(hydrated.is_ok());
    assert!(current.is_ok());
    assert_eq!(store.state(), AuthState::Authenticated);
}

#[tokio::test]
async fn view_tracks_store_transitions() {
    let store = store(StubProvider::new());
    let mut view = store.view();
    assert_eq!(view.current(), AuthState::Unknown);

    store.authenticate("user@example.com", "correctpw").await.unwrap();
    assert_eq!(view.changed().await.unwrap(), AuthState::Authenticated);

    store.logout().await;
    assert_eq!(view.changed().await.unwrap(), AuthState::Unauthenticated);
}

// =========================================================================
// password reset
// =========================================================================

#[tokio::test]
async fn forgot_password_returns_delivery() {
    let store = store(StubProvider::new());
    let delivery = store.forgot_password("user@example.com").await.unwrap();
    assert_eq!(delivery.medium.as_deref(), Some("EMAIL"));
}

#[tokio::test]
async fn forgot_password_failure_notifies_user_and_fails() {
    let notifier = RecordingNotifier::default();
    let mut provider = StubProvider::new();
    provider.reset = Err(ProviderError::rejected("LimitExceededException", "Attempt limit exceeded."));
    let store = SessionStore::new(provider, notifier.clone());

    let err = store.forgot_password("user@example.com").await.unwrap_err();
    assert!(matches!(err, SessionError::Provider(_)));
    assert_eq!(*notifier.messages.borrow(), vec!["Attempt limit exceeded.".to_owned()]);
}

#[tokio::test]
async fn reset_password_does_not_sign_in() {
    let store = store(StubProvider::new());
    let _ = store.hydrate().await;

    store
        .reset_password("user@example.com", "123456", "new-password")
        .await
        .unwrap();
    assert_eq!(store.state(), AuthState::Unauthenticated);
    assert_eq!(store.provider().confirmed.borrow().len(), 1);
}

#[tokio::test]
async fn reset_password_bad_code_fails() {
    let store = store(StubProvider::new());
    let err = store
        .reset_password("user@example.com", "000000", "new-password")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::Provider(ProviderError::rejected("CodeMismatchException", "Invalid verification code provided."))
    );
    assert_eq!(store.state(), AuthState::Unknown);
}
