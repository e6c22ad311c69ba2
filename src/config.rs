//! Host configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before this runs, so values there behave like
//! real environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid SITE_ADDR: {0}")]
    InvalidSiteAddr(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub port: u16,
    /// Full bind address; takes precedence over `port` when set.
    pub site_addr: Option<SocketAddr>,
    /// Gzip responses. On unless `HTTP_COMPRESSION` is falsy.
    pub compression: bool,
}

impl HostConfig {
    /// Build host config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000, binds on all interfaces
    /// - `SITE_ADDR`: `ip:port`, overrides `PORT`
    /// - `HTTP_COMPRESSION`: `1/true/yes/on` or `0/false/no/off`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT").as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw.to_owned()))?,
        };
        let site_addr = match lookup("SITE_ADDR").as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidSiteAddr(raw.to_owned()))?),
        };
        let compression = lookup("HTTP_COMPRESSION").as_deref().and_then(parse_bool).unwrap_or(true);
        Ok(Self { port, site_addr, compression })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.site_addr
            .unwrap_or(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port))
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
