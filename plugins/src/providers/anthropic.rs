use conductor_core::api::{Credentials, Provider, ProviderError, TaskPayload, TextParams};
use serde::{Deserialize, Serialize};

use super::http::{nested_error_message, require_key, ProviderClient};

const PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub(super) async fn complete(
    client: &ProviderClient,
    params: &TextParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::Anthropic, credentials)?;
    let model = params.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let body = MessagesRequest {
        model,
        max_tokens: params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        messages: [Message {
            role: "user",
            content: &params.prompt,
        }],
        system: params.system_prompt.as_deref(),
        temperature: params.temperature,
    };

    let req = client
        .http()
        .post(client.endpoint(Provider::Anthropic, PATH))
        .header("x-api-key", key)
        .header("anthropic-version", API_VERSION)
        .json(&body);

    let resp: MessagesResponse = client
        .send_json(Provider::Anthropic, req, nested_error_message)
        .await?;

    let content = resp
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");

    Ok(TaskPayload::Text {
        content,
        model: resp.model.unwrap_or_else(|| model.to_string()),
        citations: Vec::new(),
    })
}
