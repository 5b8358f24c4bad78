use std::collections::HashMap;
use std::time::{Duration, Instant};

use conductor_core::api::{Credentials, Provider, ProviderError, ProvidersConfig};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

const TARGET: &str = "conductor.provider";
const BODY_PREVIEW_LIMIT: usize = 512;

/// Pulls a human-readable message out of a provider's error envelope.
pub(crate) type ErrorExtractor = fn(&Value) -> Option<String>;

pub fn default_base_url(provider: Provider) -> &'static str {
    match provider {
        Provider::Stability => "https://api.stability.ai",
        Provider::Luma => "https://api.lumalabs.ai",
        Provider::Runway => "https://api.dev.runwayml.com",
        Provider::ElevenLabs => "https://api.elevenlabs.io",
        Provider::Anthropic => "https://api.anthropic.com",
        Provider::OpenAi => "https://api.openai.com",
        Provider::Perplexity => "https://api.perplexity.ai",
        Provider::Google => "https://generativelanguage.googleapis.com",
    }
}

/// Shared, immutable HTTP plumbing for every adapter.
#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    timeout_ms: u64,
    // Normalized (no trailing slash) base URL per provider.
    base_urls: HashMap<Provider, String>,
}

impl ProviderClient {
    pub fn new(cfg: &ProvidersConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if cfg.http_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(cfg.http_timeout_ms));
        }
        let http = builder.build()?;

        let base_urls = Provider::ALL
            .into_iter()
            .map(|p| {
                let base = cfg
                    .base_url(p.service_id())
                    .unwrap_or_else(|| default_base_url(p));
                (p, base.trim_end_matches('/').to_string())
            })
            .collect();

        Ok(Self {
            http,
            timeout_ms: cfg.http_timeout_ms,
            base_urls,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn endpoint(&self, provider: Provider, path: &str) -> String {
        let base = self
            .base_urls
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| default_base_url(provider));
        format!("{}{}", base, path)
    }

    pub(crate) async fn send(
        &self,
        provider: Provider,
        req: RequestBuilder,
    ) -> Result<Response, ProviderError> {
        let start = Instant::now();
        tracing::debug!(target: TARGET, stage = "provider.http.in", provider = %provider);

        let resp = req
            .send()
            .await
            .map_err(|err| self.transport_error(provider, err))?;

        tracing::debug!(
            target: TARGET,
            stage = "provider.http.out",
            provider = %provider,
            status = resp.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(resp)
    }

    /// Send, check the status, and decode a JSON body into `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        provider: Provider,
        req: RequestBuilder,
        extract: ErrorExtractor,
    ) -> Result<T, ProviderError> {
        let resp = self.send(provider, req).await?;
        let resp = ensure_success(provider, resp, extract).await?;
        let body = resp
            .text()
            .await
            .map_err(|err| self.transport_error(provider, err))?;

        serde_json::from_str::<T>(&body).map_err(|err| {
            tracing::warn!(
                target: TARGET,
                stage = "provider.decode.error",
                provider = %provider,
                body = %preview_body(&body)
            );
            ProviderError::Decode {
                provider,
                message: err.to_string(),
            }
        })
    }

    /// Send, check the status, and return the raw body.
    pub(crate) async fn send_bytes(
        &self,
        provider: Provider,
        req: RequestBuilder,
        extract: ErrorExtractor,
    ) -> Result<bytes::Bytes, ProviderError> {
        let resp = self.send(provider, req).await?;
        let resp = ensure_success(provider, resp, extract).await?;
        resp.bytes()
            .await
            .map_err(|err| self.transport_error(provider, err))
    }

    /// The URL is stripped from the message; it may carry a credential.
    fn transport_error(&self, provider: Provider, err: reqwest::Error) -> ProviderError {
        let err = err.without_url();
        if err.is_timeout() {
            ProviderError::Timeout {
                provider,
                timeout_ms: self.timeout_ms,
            }
        } else if err.is_decode() {
            ProviderError::Decode {
                provider,
                message: err.to_string(),
            }
        } else {
            ProviderError::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }
}

/// Fails fast, before any network traffic, when the provider has no key.
pub(crate) fn require_key(
    provider: Provider,
    credentials: &Credentials,
) -> Result<&str, ProviderError> {
    credentials
        .get(provider)
        .ok_or(ProviderError::MissingCredential(provider))
}

/// Map a non-2xx response to [`ProviderError::Api`].
///
/// An unparseable body is treated as `{}`, which yields the generic
/// "<Provider> API error" message.
async fn ensure_success(
    provider: Provider,
    resp: Response,
    extract: ErrorExtractor,
) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let envelope = serde_json::from_str::<Value>(&body)
        .unwrap_or_else(|_| Value::Object(Default::default()));

    tracing::warn!(
        target: TARGET,
        stage = "provider.status.error",
        provider = %provider,
        status = status.as_u16(),
        body = %preview_body(&body)
    );

    Err(match extract(&envelope) {
        Some(message) => ProviderError::Api {
            provider,
            status: status.as_u16(),
            message,
        },
        None => ProviderError::generic_api(provider, status.as_u16()),
    })
}

/// `{"error": {"message": "..."}}`, the OpenAI-style envelope.
pub(crate) fn nested_error_message(envelope: &Value) -> Option<String> {
    non_empty(envelope.pointer("/error/message"))
}

pub(crate) fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) fn client_for(provider: Provider, base_url: &str) -> ProviderClient {
    let mut cfg = ProvidersConfig {
        http_timeout_ms: 2_000,
        ..ProvidersConfig::default()
    };
    cfg.base_urls
        .insert(provider.service_id().to_string(), base_url.to_string());
    ProviderClient::new(&cfg).expect("client")
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_nested_error_message() {
        assert_eq!(
            nested_error_message(&json!({"error": {"message": "quota"}})).as_deref(),
            Some("quota")
        );
        assert_eq!(nested_error_message(&json!({"error": {"message": "  "}})), None);
        assert_eq!(nested_error_message(&json!({})), None);
    }

    #[test]
    fn test_endpoint_uses_override_without_trailing_slash() {
        let mut cfg = ProvidersConfig::default();
        cfg.base_urls
            .insert("openai".to_string(), "http://127.0.0.1:9999/".to_string());
        let client = ProviderClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint(Provider::OpenAi, "/v1/chat/completions"),
            "http://127.0.0.1:9999/v1/chat/completions"
        );
        assert_eq!(
            client.endpoint(Provider::Anthropic, "/v1/messages"),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn test_require_key_missing() {
        let err = require_key(Provider::Runway, &Credentials::empty()).unwrap_err();
        assert_eq!(err.to_string(), "Runway API key not configured");
    }
}
