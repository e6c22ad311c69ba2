//! Client configuration baked in at build time.
//!
//! Values come from `COGNITO_REGION`, `COGNITO_USER_POOL_ID`,
//! `COGNITO_CLIENT_ID` and `API_BASE_URL` in the build environment. The
//! browser has no process environment, so they are read with `option_env!`.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use session::CognitoConfig;

pub const DEFAULT_API_BASE_URL: &str = "/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub cognito: CognitoConfig,
    /// Backend data service base URL, without a trailing slash.
    pub api_base_url: String,
}

impl ClientConfig {
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("COGNITO_REGION"),
            option_env!("COGNITO_USER_POOL_ID"),
            option_env!("COGNITO_CLIENT_ID"),
            option_env!("API_BASE_URL"),
        )
    }

    fn from_values(
        region: Option<&str>,
        user_pool_id: Option<&str>,
        client_id: Option<&str>,
        api_base_url: Option<&str>,
    ) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        Self {
            cognito: CognitoConfig::new(
                region.unwrap_or_default(),
                user_pool_id.unwrap_or_default(),
                client_id.unwrap_or_default(),
            ),
            api_base_url,
        }
    }
}
