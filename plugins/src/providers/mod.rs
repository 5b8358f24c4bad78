//! One adapter per third-party API behind a single [`ProviderDispatcher`].
//!
//! Adapters share nothing but the immutable [`ProviderClient`]; each owns its
//! endpoint, defaults, and error-envelope parsing.

mod anthropic;
mod elevenlabs;
mod google;
pub mod http;
mod luma;
mod openai;
mod perplexity;
mod runway;
mod stability;

use async_trait::async_trait;
use conductor_core::api::{
    Credentials, ProviderDispatcher, ProviderError, ProviderRequest, ProvidersConfig, TaskPayload,
};

pub use http::{default_base_url, ProviderClient};

/// Live dispatcher: one HTTPS call per request, no retries.
#[derive(Clone)]
pub struct HttpDispatcher {
    client: ProviderClient,
}

impl HttpDispatcher {
    pub fn new(cfg: &ProvidersConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: ProviderClient::new(cfg)?,
        })
    }
}

#[async_trait]
impl ProviderDispatcher for HttpDispatcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn dispatch(
        &self,
        request: &ProviderRequest,
        credentials: &Credentials,
    ) -> Result<TaskPayload, ProviderError> {
        let client = &self.client;
        match request {
            ProviderRequest::Stability(p) => stability::generate(client, p, credentials).await,
            ProviderRequest::Luma(p) => luma::generate(client, p, credentials).await,
            ProviderRequest::Runway(p) => runway::generate(client, p, credentials).await,
            ProviderRequest::ElevenLabs(p) => elevenlabs::synthesize(client, p, credentials).await,
            ProviderRequest::Anthropic(p) => anthropic::complete(client, p, credentials).await,
            ProviderRequest::OpenAi(p) => openai::complete(client, p, credentials).await,
            ProviderRequest::Perplexity(p) => perplexity::research(client, p, credentials).await,
            ProviderRequest::Google(p) => google::complete(client, p, credentials).await,
        }
    }
}
