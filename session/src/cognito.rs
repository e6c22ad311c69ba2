//! Cognito user-pool client implementing [`IdentityProvider`].
//!
//! Thin HTTP wrapper over the user-pool JSON API. Request bodies and response
//! parsing are plain functions so they can be tested without a network.
//!
//! PERSISTENCE
//! ===========
//! Tokens are kept in a [`TokenStore`] under the key layout the Cognito
//! browser SDK uses, so sessions created by either survive page reloads:
//!
//! ```text
//! CognitoIdentityServiceProvider.{client_id}.LastAuthUser
//! CognitoIdentityServiceProvider.{client_id}.{username}.idToken
//! CognitoIdentityServiceProvider.{client_id}.{username}.accessToken
//! CognitoIdentityServiceProvider.{client_id}.{username}.refreshToken
//! CognitoIdentityServiceProvider.{client_id}.{username}.expiresAt
//! ```

#[cfg(test)]
#[path = "cognito_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::provider::{Challenge, CodeDelivery, IdentityProvider, ProviderError, Session, SignIn, UserHandle};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const KEY_PREFIX: &str = "CognitoIdentityServiceProvider";

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CognitoConfig {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
}

impl CognitoConfig {
    /// Build a config; an empty `region` is taken from the pool id prefix
    /// (`us-east-1_AbCdEf` → `us-east-1`).
    #[must_use]
    pub fn new(region: &str, user_pool_id: &str, client_id: &str) -> Self {
        let region = if region.trim().is_empty() {
            user_pool_id.split_once('_').map_or("", |(r, _)| r)
        } else {
            region.trim()
        };
        Self { region: region.to_owned(), user_pool_id: user_pool_id.to_owned(), client_id: client_id.to_owned() }
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("https://cognito-idp.{}.amazonaws.com/", self.region)
    }

    fn last_user_key(&self) -> String {
        format!("{KEY_PREFIX}.{}.LastAuthUser", self.client_id)
    }

    fn token_key(&self, username: &str, name: &str) -> String {
        format!("{KEY_PREFIX}.{}.{username}.{name}", self.client_id)
    }
}

// =============================================================================
// TOKEN STORE
// =============================================================================

/// Local key/value persistence for provider tokens.
pub trait TokenStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// In-process token store used by tests and server rendering.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    items: Mutex<HashMap<String, String>>,
}

impl TokenStore for MemoryTokenStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct CognitoProvider<S> {
    http: reqwest::Client,
    config: CognitoConfig,
    store: S,
    clock: fn() -> u64,
}

/// Wall-clock unix seconds. Not available on `wasm32-unknown-unknown`;
/// browser callers pass their own clock via [`CognitoProvider::with_clock`].
#[must_use]
pub fn system_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl<S: TokenStore> CognitoProvider<S> {
    pub fn new(config: CognitoConfig, store: S) -> Self {
        Self { http: reqwest::Client::new(), config, store, clock: system_clock }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &CognitoConfig {
        &self.config
    }

    async fn call<B: Serialize>(&self, operation: &str, body: &B) -> Result<String, ProviderError> {
        let payload = serde_json::to_string(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let response = self
            .http
            .post(self.config.endpoint())
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .body(payload)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            let err = parse_error(status, &text);
            tracing::debug!(%operation, status, error = %err, "cognito request rejected");
            return Err(err);
        }
        Ok(text)
    }

    fn save_session(&self, username: &str, session: &Session) {
        let cfg = &self.config;
        self.store.set_item(&cfg.token_key(username, "idToken"), &session.id_token);
        self.store.set_item(&cfg.token_key(username, "accessToken"), &session.access_token);
        match &session.refresh_token {
            Some(token) => self.store.set_item(&cfg.token_key(username, "refreshToken"), token),
            None => self.store.remove_item(&cfg.token_key(username, "refreshToken")),
        }
        self.store
            .set_item(&cfg.token_key(username, "expiresAt"), &session.expires_at.to_string());
        self.store.set_item(&cfg.last_user_key(), username);
    }

    fn load_session(&self, username: &str) -> Option<Session> {
        let cfg = &self.config;
        Some(Session {
            id_token: self.store.get_item(&cfg.token_key(username, "idToken"))?,
            access_token: self.store.get_item(&cfg.token_key(username, "accessToken"))?,
            refresh_token: self.store.get_item(&cfg.token_key(username, "refreshToken")),
            expires_at: self
                .store
                .get_item(&cfg.token_key(username, "expiresAt"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        })
    }

    /// Stored session for `username`, refreshed through `REFRESH_TOKEN_AUTH`
    /// once expired.
    async fn restore_session(&self, username: &str) -> Result<Session, ProviderError> {
        let stored = self.load_session(username).ok_or(ProviderError::NoTokens)?;
        if stored.is_valid_at((self.clock)()) {
            return Ok(stored);
        }

        let refresh_token = stored.refresh_token.ok_or(ProviderError::NoTokens)?;
        tracing::debug!(%username, "refreshing expired session");
        let text = {
            let body = initiate_auth_request(
                "REFRESH_TOKEN_AUTH",
                &self.config.client_id,
                [("REFRESH_TOKEN", refresh_token.as_str())],
            );
            self.call("InitiateAuth", &body).await?
        };
        let SignIn::Authenticated(mut session) = parse_auth_response(&text, (self.clock)())? else {
            return Err(ProviderError::Malformed("challenge returned for token refresh".into()));
        };
        // Refresh responses do not rotate the refresh token.
        session.refresh_token.get_or_insert(refresh_token);
        self.save_session(username, &session);
        Ok(session)
    }

    fn clear_session(&self, username: &str) {
        for name in ["idToken", "accessToken", "refreshToken", "expiresAt"] {
            self.store.remove_item(&self.config.token_key(username, name));
        }
        self.store.remove_item(&self.config.last_user_key());
    }
}

#[async_trait::async_trait(?Send)]
impl<S: TokenStore> IdentityProvider for CognitoProvider<S> {
    fn current_user(&self) -> Option<UserHandle> {
        self.store
            .get_item(&self.config.last_user_key())
            .filter(|name| !name.is_empty())
            .map(UserHandle::new)
    }

    async fn validate_session(&self, handle: &UserHandle) -> Result<Session, ProviderError> {
        self.restore_session(&handle.username).await.inspect_err(|e| {
            if discards_stored_session(e) {
                tracing::debug!(username = %handle.username, error = %e, "dropping unusable stored session");
                self.clear_session(&handle.username);
            }
        })
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<SignIn, ProviderError> {
        let body = initiate_auth_request(
            "USER_PASSWORD_AUTH",
            &self.config.client_id,
            [("USERNAME", identifier), ("PASSWORD", secret)],
        );
        let text = self.call("InitiateAuth", &body).await?;
        let outcome = parse_auth_response(&text, (self.clock)())?;
        if let SignIn::Authenticated(session) = &outcome {
            self.save_session(identifier, session);
        }
        Ok(outcome)
    }

    async fn complete_new_password(
        &self,
        identifier: &str,
        challenge: &Challenge,
        new_secret: &str,
    ) -> Result<Session, ProviderError> {
        let body = RespondToAuthChallengeRequest {
            challenge_name: Challenge::NEW_PASSWORD_REQUIRED,
            client_id: &self.config.client_id,
            session: &challenge.session,
            challenge_responses: HashMap::from([("USERNAME", identifier), ("NEW_PASSWORD", new_secret)]),
        };
        let text = self.call("RespondToAuthChallenge", &body).await?;
        match parse_auth_response(&text, (self.clock)())? {
            SignIn::Authenticated(session) => {
                self.save_session(identifier, &session);
                Ok(session)
            }
            SignIn::NewPasswordRequired(next) => {
                Err(ProviderError::Malformed(format!("unexpected follow-up challenge {}", next.name)))
            }
        }
    }

    async fn sign_out(&self, handle: &UserHandle) {
        if let Some(session) = self.load_session(&handle.username) {
            let body = GlobalSignOutRequest { access_token: &session.access_token };
            if let Err(e) = self.call("GlobalSignOut", &body).await {
                tracing::warn!(username = %handle.username, error = %e, "global sign-out failed");
            }
        }
        self.clear_session(&handle.username);
    }

    async fn begin_password_reset(&self, identifier: &str) -> Result<CodeDelivery, ProviderError> {
        let body = ForgotPasswordRequest { client_id: &self.config.client_id, username: identifier };
        let text = self.call("ForgotPassword", &body).await?;
        parse_code_delivery(&text)
    }

    async fn confirm_password_reset(
        &self,
        identifier: &str,
        code: &str,
        new_secret: &str,
    ) -> Result<(), ProviderError> {
        let body = ConfirmForgotPasswordRequest {
            client_id: &self.config.client_id,
            username: identifier,
            confirmation_code: code,
            password: new_secret,
        };
        self.call("ConfirmForgotPassword", &body).await?;
        Ok(())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'a str,
    client_id: &'a str,
    auth_parameters: HashMap<&'a str, &'a str>,
}

fn initiate_auth_request<'a, const N: usize>(
    auth_flow: &'a str,
    client_id: &'a str,
    parameters: [(&'a str, &'a str); N],
) -> InitiateAuthRequest<'a> {
    InitiateAuthRequest { auth_flow, client_id, auth_parameters: HashMap::from(parameters) }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RespondToAuthChallengeRequest<'a> {
    challenge_name: &'a str,
    client_id: &'a str,
    session: &'a str,
    challenge_responses: HashMap<&'a str, &'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GlobalSignOutRequest<'a> {
    access_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ForgotPasswordRequest<'a> {
    client_id: &'a str,
    username: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmForgotPasswordRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    confirmation_code: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct AuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
    session: Option<String>,
    challenge_parameters: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
    access_token: String,
    refresh_token: Option<String>,
    expires_in: u64,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct ForgotPasswordResponse {
    code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CodeDeliveryDetails {
    destination: Option<String>,
    delivery_medium: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Turn an `InitiateAuth`/`RespondToAuthChallenge` body into a [`SignIn`].
fn parse_auth_response(text: &str, now_secs: u64) -> Result<SignIn, ProviderError> {
    let body: AuthResponse = serde_json::from_str(text).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if let Some(result) = body.authentication_result {
        return Ok(SignIn::Authenticated(Session {
            id_token: result.id_token,
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_at: now_secs.saturating_add(result.expires_in),
        }));
    }

    match body.challenge_name {
        Some(name) if name == Challenge::NEW_PASSWORD_REQUIRED => Ok(SignIn::NewPasswordRequired(Challenge {
            name,
            session: body.session.unwrap_or_default(),
            parameters: body.challenge_parameters,
        })),
        Some(name) => Err(ProviderError::UnsupportedChallenge(name)),
        None => Err(ProviderError::Malformed("neither tokens nor challenge in response".into())),
    }
}

fn parse_code_delivery(text: &str) -> Result<CodeDelivery, ProviderError> {
    let body: ForgotPasswordResponse =
        serde_json::from_str(text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    Ok(body
        .code_delivery_details
        .map(|d| CodeDelivery { destination: d.destination, medium: d.delivery_medium })
        .unwrap_or_default())
}

/// Map a non-2xx body to a [`ProviderError`].
///
/// `__type` may carry a namespace (`com.amazonaws...#NotAuthorizedException`);
/// only the part after `#` is kept.
fn parse_error(status: u16, text: &str) -> ProviderError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody { kind: Some(kind), message }) => {
            let kind = kind.rsplit('#').next().unwrap_or(&kind).to_owned();
            let message = message.unwrap_or_else(|| kind.clone());
            ProviderError::Rejected { kind, message }
        }
        _ => ProviderError::Malformed(format!("status {status}: {text}")),
    }
}

/// Whether a failed restore means the stored tokens can never work again.
///
/// Transport failures keep them so an offline reload can retry later.
fn discards_stored_session(err: &ProviderError) -> bool {
    matches!(err, ProviderError::Rejected { .. } | ProviderError::NoTokens)
}
