//! Process configuration from environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use cin_auth::GateConfig;

pub const BIND_ADDR_ENV: &str = "CIN_BIND_ADDR";
pub const SESSION_COOKIE_ENV: &str = "CIN_SESSION_COOKIE";
pub const SIGN_IN_PATH_ENV: &str = "CIN_SIGN_IN_PATH";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_COOKIE: &str = "cin-session";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: invalid socket address '{value}': {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{var}: '{value}' must be an absolute path starting with '/'")]
    InvalidPath { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Cookie carrying the session token when no bearer header is sent.
    pub session_cookie: String,
    pub gate: GateConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            gate: GateConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_ENV,
                value: bind.clone(),
                source,
            })?;

        let session_cookie =
            lookup(SESSION_COOKIE_ENV).unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
        if session_cookie.trim().is_empty() {
            return Err(ConfigError::Empty(SESSION_COOKIE_ENV));
        }

        let mut gate = GateConfig::default();
        if let Some(sign_in_path) = lookup(SIGN_IN_PATH_ENV) {
            if !sign_in_path.starts_with('/') {
                return Err(ConfigError::InvalidPath {
                    var: SIGN_IN_PATH_ENV,
                    value: sign_in_path,
                });
            }
            gate.sign_in_path = sign_in_path;
        }

        Ok(Self {
            bind_addr,
            session_cookie: session_cookie.trim().to_string(),
            gate,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (BIND_ADDR_ENV, "127.0.0.1:9000"),
            (SESSION_COOKIE_ENV, "sb-access-token"),
            (SIGN_IN_PATH_ENV, "/login"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.session_cookie, "sb-access-token");
        assert_eq!(config.gate.sign_in_path, "/login");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ApiConfig::from_lookup(lookup_from(&[(BIND_ADDR_ENV, "not-an-addr")])),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup_from(&[(SESSION_COOKIE_ENV, " ")])),
            Err(ConfigError::Empty(SESSION_COOKIE_ENV))
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup_from(&[(SIGN_IN_PATH_ENV, "login")])),
            Err(ConfigError::InvalidPath { .. })
        ));
    }
}
