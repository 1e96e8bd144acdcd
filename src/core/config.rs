//! Application configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.

/// Backend used when `BACKEND_URL` is not set
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend that `/api/*` is forwarded to
    /// Example: https://portal-api.university.edu
    pub backend_url: String,

    /// Upstream request timeout in seconds
    pub backend_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("BACKEND_URL").ok(),
            std::env::var("BACKEND_TIMEOUT_SECS").ok(),
        )
    }

    fn from_vars(backend_url: Option<String>, timeout: Option<String>) -> Self {
        let backend_url = backend_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let backend_timeout_secs = timeout.and_then(|t| match t.trim().parse() {
            Ok(secs) => Some(secs),
            Err(_) => {
                tracing::warn!("Ignoring invalid BACKEND_TIMEOUT_SECS: {}", t);
                None
            }
        });

        Self {
            backend_url,
            backend_timeout_secs,
        }
    }

    /// Check if the backend URL was left at its default
    pub fn uses_default_backend(&self) -> bool {
        self.backend_url == DEFAULT_BACKEND_URL
    }

    pub fn backend_timeout(&self) -> Option<std::time::Duration> {
        self.backend_timeout_secs.map(std::time::Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_backend_url_uses_default() {
        let config = Config::from_vars(None, None);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert!(config.uses_default_backend());
        assert!(config.backend_timeout().is_none());
    }

    #[test]
    fn test_blank_backend_url_uses_default() {
        let config = Config::from_vars(Some("   ".to_string()), None);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = Config::from_vars(Some("https://api.uni.edu/v1/".to_string()), None);
        assert_eq!(config.backend_url, "https://api.uni.edu/v1");
        assert!(!config.uses_default_backend());
    }

    #[test]
    fn test_timeout_parsing() {
        let config = Config::from_vars(None, Some("15".to_string()));
        assert_eq!(config.backend_timeout(), Some(std::time::Duration::from_secs(15)));

        let config = Config::from_vars(None, Some("soon".to_string()));
        assert!(config.backend_timeout_secs.is_none());
    }

    #[test]
    fn test_config_from_env_returns_config() {
        // Values depend on the environment; only check it loads
        let config = Config::from_env();
        assert!(!config.backend_url.is_empty());
    }
}
