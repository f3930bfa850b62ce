use crate::api::error::{ApiError, Result};

/// Where the API lives when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Base URL baked in at build time (`MEDIA_API_URL`), else the local default.
pub fn default_api_url() -> &'static str {
    option_env!("MEDIA_API_URL").unwrap_or(DEFAULT_API_URL)
}

/// Validated location of the media server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ApiError::InvalidUrl("URL cannot be empty".into()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base_url = url.trim_end_matches('/').to_string();
        if base_url.ends_with("//") || base_url.ends_with(':') {
            return Err(ApiError::InvalidUrl(format!("{url} has no host")));
        }

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(default_api_url()).unwrap_or_else(|_| Self {
            base_url: DEFAULT_API_URL.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ApiConfig::new("  http://localhost:8000///  ").unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.endpoint("/album/3"), "http://localhost:8000/album/3");
        assert_eq!(config.endpoint("albums"), "http://localhost:8000/albums");
    }

    #[test]
    fn empty_url_rejected() {
        match ApiConfig::new("   ") {
            Err(ApiError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn url_without_scheme_rejected() {
        assert!(matches!(
            ApiConfig::new("127.0.0.1:8000"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiConfig::new("https://"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn default_is_usable() {
        let config = ApiConfig::default();
        assert!(config.base_url().starts_with("http"));
    }
}
