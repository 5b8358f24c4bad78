use conductor_core::api::{Credentials, Provider, ProviderError, TaskPayload, TextParams};
use serde::{Deserialize, Serialize};

use super::http::{nested_error_message, require_key, ProviderClient};

const PATH: &str = "/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Chat-completions request body, shared with OpenAI-compatible providers.
#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl<'a> ChatRequest<'a> {
    pub(super) fn from_params(params: &'a TextParams, model: &'a str) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = params.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &params.prompt,
        });
        Self {
            model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }
}

impl ChatResponse {
    /// Content of the first choice; an empty choice list is a decode failure.
    pub(super) fn first_content(&self, provider: Provider) -> Result<String, ProviderError> {
        self.choices
            .first()
            .map(|c| c.message.content.clone().unwrap_or_default())
            .ok_or_else(|| ProviderError::Decode {
                provider,
                message: "response contained no choices".to_string(),
            })
    }
}

pub(super) async fn complete(
    client: &ProviderClient,
    params: &TextParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::OpenAi, credentials)?;
    let model = params.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let mut body = ChatRequest::from_params(params, model);
    body.max_tokens = Some(params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));

    let req = client
        .http()
        .post(client.endpoint(Provider::OpenAi, PATH))
        .bearer_auth(key)
        .json(&body);

    let resp: ChatResponse = client
        .send_json(Provider::OpenAi, req, nested_error_message)
        .await?;

    Ok(TaskPayload::Text {
        content: resp.first_content(Provider::OpenAi)?,
        model: resp.model.unwrap_or_else(|| model.to_string()),
        citations: Vec::new(),
    })
}
