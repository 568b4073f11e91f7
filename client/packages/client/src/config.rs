use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const ENV_BASE_URL: &str = "AGENT_CONSOLE_URL";
pub const ENV_TOKEN: &str = "AGENT_CONSOLE_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {value}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url must use http or https: {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.to_string()));
        }
        let token = token
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(Self { base_url, token })
    }

    /// Reads `AGENT_CONSOLE_URL` and `AGENT_CONSOLE_TOKEN`, falling back to
    /// the local default endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url, std::env::var(ENV_TOKEN).ok())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            token: None,
        }
    }
}
