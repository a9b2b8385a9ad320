use thiserror::Error;

/// Failures reported by an external provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL without credentials.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request never produced a response.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL without credentials.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL without credentials.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response body was not in the expected shape.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Parser or validation message.
        message: String,
    },
}

/// Errors from [`crate::lookup`] providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The provider returned no usable result.
    #[error("no result found for {query}")]
    NotFound {
        /// Description of what was looked up.
        query: String,
    },
    /// The provider could not be reached or answered with garbage.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The request was rejected before reaching the provider.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },
}

impl LookupError {
    /// Build a [`LookupError::NotFound`] for `query`.
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Build a [`LookupError::InvalidInput`] with `reason`.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
