use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::core::BookgenError;

pub const BACKEND_URL_VAR: &str = "BOOKGEN_BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const DEFAULT_LOG_FILTER: &str = "bookgen=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { backend_url: DEFAULT_BACKEND_URL.to_string() }
    }
}

impl AppConfig {
    /// Reads the backend URL from the environment, loading `.env` first when present.
    pub fn from_env() -> Result<Self, BookgenError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BookgenError> {
        match lookup(BACKEND_URL_VAR) {
            Some(url) if !url.trim().is_empty() => Self::with_backend_url(url.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn with_backend_url(url: &str) -> Result<Self, BookgenError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BookgenError::InvalidBackendUrl(url.to_string()));
        }
        Ok(Self { backend_url: url.to_string() })
    }

    /// Base URL with trailing slashes removed and `/api` appended.
    pub fn api_root(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }
}

/// Installs the fmt subscriber, filtered by `RUST_LOG` or `bookgen=info`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_root(), "http://localhost:8001/api");
    }

    #[test]
    fn api_root_drops_trailing_slash() {
        let config = AppConfig::with_backend_url("http://host:8001/").unwrap();
        assert_eq!(config.api_root(), "http://host:8001/api");
    }

    #[test]
    fn reads_variable_and_rejects_garbage() {
        let config = AppConfig::from_lookup(|key| {
            (key == BACKEND_URL_VAR).then(|| "https://books.example.com".to_string())
        })
        .unwrap();
        assert_eq!(config.api_root(), "https://books.example.com/api");

        let blank = AppConfig::from_lookup(|_| Some("   ".to_string())).unwrap();
        assert_eq!(blank, AppConfig::default());

        let err = AppConfig::from_lookup(|_| Some("localhost:8001".to_string())).unwrap_err();
        assert!(matches!(err, BookgenError::InvalidBackendUrl(_)));
    }
}
