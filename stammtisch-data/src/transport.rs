//! HTTP client configuration shared by the provider adapters.

use std::time::Duration;

use reqwest::Client;
use stammtisch_core::ProviderError;
use thiserror::Error;
use url::Url;

/// Default user agent sent to every provider.
pub const DEFAULT_USER_AGENT: &str = "stammtisch/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for adapter construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not an absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// Rejected value.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings for one provider endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// API key sent as the `key` query parameter, when the service needs one.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpConfig {
    /// Create a configuration for `base_url` with default timeout and agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            api_key: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Join `path` onto the base URL without doubling slashes.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    /// The `key` query parameter, or nothing when no key is configured.
    pub(crate) fn key_query(&self) -> Vec<(&'static str, &str)> {
        self.api_key
            .as_deref()
            .map(|key| ("key", key))
            .into_iter()
            .collect()
    }

    /// Validate the base URL and build a client honouring the timeout.
    pub(crate) fn build_client(&self) -> Result<Client, ProviderBuildError> {
        Url::parse(&self.base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)
    }

    /// Map a transport failure for `url` onto [`ProviderError`].
    ///
    /// `url` must not carry the API key; the request URL is stripped from
    /// `error` for the same reason.
    pub(crate) fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> ProviderError {
        let error = error.without_url();
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return ProviderError::Parse {
                message: error.to_string(),
            };
        }

        ProviderError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}
