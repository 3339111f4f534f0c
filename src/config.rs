/// Application configuration, read once at startup.
///
/// The service address comes from `TRAVEL_JOURNAL_API_URL`, which may also be
/// set in a `.env` file in the working directory.
use reqwest::Url;

pub const API_URL_VAR: &str = "TRAVEL_JOURNAL_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TRAVEL_JOURNAL_API_URL={value:?} is not a valid URL: {reason}")]
    InvalidUrl { value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base address of the record service, without a trailing slash
    pub api_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(error) if error.not_found() => {}
            Err(error) => tracing::warn!(%error, "ignoring unreadable .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw = lookup(API_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let invalid = |reason: String| ConfigError::InvalidUrl {
            value: raw.clone(),
            reason,
        };
        let url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }

        Ok(Self {
            api_base_url: raw.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with(value: Option<&str>) -> impl Fn(&str) -> Option<String> + '_ {
        move |key| {
            assert_eq!(key, API_URL_VAR);
            value.map(str::to_string)
        }
    }

    #[test]
    fn defaults_to_local_service() {
        let config = AppConfig::from_lookup(lookup_with(None)).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        let config = AppConfig::from_lookup(lookup_with(Some("  "))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config =
            AppConfig::from_lookup(lookup_with(Some("https://journal.example.com/api/v1/")))
                .unwrap();
        assert_eq!(config.api_base_url, "https://journal.example.com/api/v1");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            AppConfig::from_lookup(lookup_with(Some("not a url"))),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(AppConfig::from_lookup(lookup_with(Some("ftp://files.example.com"))).is_err());
    }
}
