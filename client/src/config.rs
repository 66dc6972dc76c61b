use crate::error::ConfigError;
use std::env;
use std::time::Duration;
use url::Url;

pub const BASE_URL_VAR: &str = "PDF_CHAT_BASE_URL";
pub const SCROLL_DELAY_VAR: &str = "PDF_CHAT_SCROLL_DELAY_MS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_SCROLL_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base of the `/upload` and `/ask` endpoints. Always ends in `/`.
    pub base_url: Url,
    pub scroll_delay: Duration,
}

impl ClientConfig {
    /// The built-in defaults, before any environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            scroll_delay: Duration::from_millis(DEFAULT_SCROLL_DELAY_MS),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new()?;

        if let Some(value) = lookup(BASE_URL_VAR) {
            config.base_url = parse_base_url(value.trim())?;
        }

        if let Some(value) = lookup(SCROLL_DELAY_VAR) {
            let millis = value.trim().parse::<u64>().map_err(|_| ConfigError::ScrollDelay {
                var: SCROLL_DELAY_VAR,
                value: value.clone(),
            })?;
            config.scroll_delay = Duration::from_millis(millis);
        }

        log::debug!(
            "Client config: base_url={}, scroll_delay={:?}",
            config.base_url,
            config.scroll_delay
        );
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_scroll_delay(mut self, scroll_delay: Duration) -> Self {
        self.scroll_delay = scroll_delay;
        self
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value).map_err(|source| ConfigError::BaseUrl {
        var: BASE_URL_VAR,
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            var: BASE_URL_VAR,
            value: value.to_string(),
        });
    }

    // Endpoints are joined relative to the base, which drops the last path
    // segment unless the path ends in a slash.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::new().unwrap());
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.scroll_delay, Duration::from_millis(100));
    }

    #[test]
    fn reads_values_from_lookup() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://docs.example.com/chat"),
            (SCROLL_DELAY_VAR, "25"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://docs.example.com/chat/");
        assert_eq!(config.scroll_delay, Duration::from_millis(25));
        assert_eq!(
            config.base_url.join("ask").unwrap().as_str(),
            "https://docs.example.com/chat/ask"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_VAR, "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_VAR, "ftp://example.com")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme { .. }));
    }

    #[test]
    fn rejects_non_numeric_scroll_delay() {
        let err = ClientConfig::from_lookup(lookup_from(&[(SCROLL_DELAY_VAR, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ScrollDelay { .. }));
    }
}
