//! Client configuration parsed from environment variables.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TOAST_LIFE_MS: u64 = 3000;
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub toast_life: Duration,
    pub login_route: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            toast_life: Duration::from_millis(DEFAULT_TOAST_LIFE_MS),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `API_BASE_URL`: default `http://localhost:3000`
    /// - `TOAST_LIFE_MS`: default 3000
    /// - `LOGIN_ROUTE`: default `/login`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = match lookup("API_BASE_URL") {
            Some(v) if v.trim().is_empty() => return Err(ConfigError::Empty { var: "API_BASE_URL" }),
            Some(v) => v.trim().trim_end_matches('/').to_string(),
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let toast_life_ms = match lookup("TOAST_LIFE_MS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(ConfigError::InvalidNumber { var: "TOAST_LIFE_MS", value: v }),
            },
            None => DEFAULT_TOAST_LIFE_MS,
        };

        let login_route = lookup("LOGIN_ROUTE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOGIN_ROUTE.to_string());

        Ok(Self {
            api_base_url,
            toast_life: Duration::from_millis(toast_life_ms),
            login_route,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn parses_overrides() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "https://erp.example.test/"),
            ("TOAST_LIFE_MS", "4000"),
            ("LOGIN_ROUTE", "/auth"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_base_url, "https://erp.example.test");
        assert_eq!(cfg.toast_life, Duration::from_millis(4000));
        assert_eq!(cfg.login_route, "/auth");
    }

    #[test]
    fn rejects_bad_toast_life() {
        let err = ClientConfig::from_lookup(lookup(&[("TOAST_LIFE_MS", "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidNumber { var: "TOAST_LIFE_MS", value: "soon".into() });

        let err = ClientConfig::from_lookup(lookup(&[("TOAST_LIFE_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn rejects_empty_base_url() {
        let err = ClientConfig::from_lookup(lookup(&[("API_BASE_URL", " ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { var: "API_BASE_URL" });
    }
}
