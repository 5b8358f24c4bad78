use thiserror::Error;

use crate::provider::Provider;

/// Everything that can go wrong while turning one task into one provider call.
///
/// None of these abort a request: the executor folds each of them into a
/// failed `Outcome` whose `error` is this type's `Display` output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{0} API key not configured")]
    MissingCredential(Provider),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Invalid parameters for {provider}: {message}")]
    InvalidParams { provider: Provider, message: String },

    /// Non-2xx answer; `message` is the provider's own text or the generic fallback.
    #[error("{message}")]
    Api {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport { provider: Provider, message: String },

    #[error("{provider} returned an unexpected response: {message}")]
    Decode { provider: Provider, message: String },

    #[error("{provider} request timed out after {timeout_ms} ms")]
    Timeout { provider: Provider, timeout_ms: u64 },
}

impl ProviderError {
    /// Stable machine-readable class, used for structured logging.
    pub fn class(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "configuration",
            Self::UnknownService(_) | Self::UnknownAgent(_) => "dispatch",
            Self::InvalidParams { .. } => "invalid_params",
            Self::Api { .. } => "provider",
            Self::Transport { .. } | Self::Decode { .. } => "transport",
            Self::Timeout { .. } => "timeout",
        }
    }

    /// Fallback message used when a provider's error envelope carries no text.
    pub fn generic_api(provider: Provider, status: u16) -> Self {
        Self::Api {
            provider,
            status,
            message: format!("{} API error", provider.display_name()),
        }
    }
}
