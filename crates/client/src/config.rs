//! Client configuration, read from the environment with defaults.

use reqwest::Url;
use thiserror::Error;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_PROFILE_PATH: &str = "/users/me/";
pub const DEFAULT_CATALOG_PATH: &str = "/permissions/";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto.
    pub api_url: Url,
    /// Application route the session-expiry redirect sends the user to.
    pub login_path: String,
    pub profile_path: String,
    pub catalog_path: String,
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            profile_path: DEFAULT_PROFILE_PATH.to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
        })
    }

    /// Read `TRADEDESK_API_URL`, `TRADEDESK_LOGIN_PATH`,
    /// `TRADEDESK_PROFILE_PATH` and `TRADEDESK_CATALOG_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("TRADEDESK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&api_url)?;

        if let Some(path) = lookup("TRADEDESK_LOGIN_PATH") {
            config.login_path = parse_path("TRADEDESK_LOGIN_PATH", path)?;
        }
        if let Some(path) = lookup("TRADEDESK_PROFILE_PATH") {
            config.profile_path = parse_path("TRADEDESK_PROFILE_PATH", path)?;
        }
        if let Some(path) = lookup("TRADEDESK_CATALOG_PATH") {
            config.catalog_path = parse_path("TRADEDESK_CATALOG_PATH", path)?;
        }

        Ok(config)
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Absolute URL for an API path such as `/shipments/?page=2`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.api_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        var: "TRADEDESK_API_URL",
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            var: "TRADEDESK_API_URL",
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn parse_path(var: &'static str, raw: String) -> Result<String, ConfigError> {
    let path = raw.trim();
    if !path.starts_with('/') {
        return Err(ConfigError::Invalid {
            var,
            reason: format!("'{path}' must start with '/'"),
        });
    }
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/api");
        assert_eq!(config.login_path, DEFAULT_LOGIN_PATH);
        assert_eq!(config.profile_path, DEFAULT_PROFILE_PATH);
        assert_eq!(config.catalog_path, DEFAULT_CATALOG_PATH);
    }

    #[test]
    fn overrides_from_environment() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TRADEDESK_API_URL", "https://erp.example.com/api/v2/"),
            ("TRADEDESK_LOGIN_PATH", "/auth/sign-in"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("erp.example.com"));
        assert_eq!(config.login_path, "/auth/sign-in");
    }

    #[test]
    fn rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[("TRADEDESK_API_URL", "ftp://files")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TRADEDESK_API_URL", .. }));

        assert!(ClientConfig::from_lookup(lookup(&[("TRADEDESK_API_URL", "not a url")])).is_err());
        assert!(
            ClientConfig::from_lookup(lookup(&[("TRADEDESK_LOGIN_PATH", "login")])).is_err()
        );
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ClientConfig::new("http://localhost:8000/api/").unwrap();
        assert_eq!(
            config.endpoint("/shipments/?page=2").unwrap().as_str(),
            "http://localhost:8000/api/shipments/?page=2"
        );
        assert_eq!(
            config.endpoint("users/me/").unwrap().as_str(),
            "http://localhost:8000/api/users/me/"
        );
    }
}
