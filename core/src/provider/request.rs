use serde_json::{Map, Value};

use crate::error::ProviderError;

use super::kind::{Agent, Provider};
use super::params::{ImageParams, LumaParams, RunwayParams, SpeechParams, TextParams};

/// A fully-typed call against one provider.
///
/// This is the closed set the dispatcher matches on; adding a provider means
/// adding a variant here and the compiler points at every place to update.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRequest {
    Stability(ImageParams),
    Luma(LumaParams),
    Runway(RunwayParams),
    ElevenLabs(SpeechParams),
    Anthropic(TextParams),
    OpenAi(TextParams),
    Perplexity(TextParams),
    Google(TextParams),
}

impl ProviderRequest {
    pub fn provider(&self) -> Provider {
        match self {
            Self::Stability(_) => Provider::Stability,
            Self::Luma(_) => Provider::Luma,
            Self::Runway(_) => Provider::Runway,
            Self::ElevenLabs(_) => Provider::ElevenLabs,
            Self::Anthropic(_) => Provider::Anthropic,
            Self::OpenAi(_) => Provider::OpenAi,
            Self::Perplexity(_) => Provider::Perplexity,
            Self::Google(_) => Provider::Google,
        }
    }

    /// Build a request from an orchestrator `service` name and its open params.
    pub fn for_service(service: &str, params: Map<String, Value>) -> Result<Self, ProviderError> {
        let provider = Provider::from_service(service)
            .ok_or_else(|| ProviderError::UnknownService(service.to_string()))?;
        Self::from_params(provider, params)
    }

    /// Build a request from a sub-agent name and its open params.
    pub fn for_agent(agent: &str, params: Map<String, Value>) -> Result<Self, ProviderError> {
        let agent = Agent::from_id(agent)
            .ok_or_else(|| ProviderError::UnknownAgent(agent.to_string()))?;
        Self::from_params(agent.provider(), params)
    }

    pub fn from_params(provider: Provider, params: Map<String, Value>) -> Result<Self, ProviderError> {
        let value = Value::Object(params);
        let request = match provider {
            Provider::Stability => Self::Stability(decode(provider, value)?),
            Provider::Luma => Self::Luma(decode(provider, value)?),
            Provider::Runway => Self::Runway(decode(provider, value)?),
            Provider::ElevenLabs => Self::ElevenLabs(decode(provider, value)?),
            Provider::Anthropic => Self::Anthropic(decode(provider, value)?),
            Provider::OpenAi => Self::OpenAi(decode(provider, value)?),
            Provider::Perplexity => Self::Perplexity(decode(provider, value)?),
            Provider::Google => Self::Google(decode(provider, value)?),
        };
        Ok(request)
    }
}

fn decode<T: serde::de::DeserializeOwned>(provider: Provider, value: Value) -> Result<T, ProviderError> {
    serde_json::from_value(value).map_err(|e| ProviderError::InvalidParams {
        provider,
        message: e.to_string(),
    })
}
