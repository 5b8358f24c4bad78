use conductor_core::api::{Credentials, Provider, ProviderError, TaskPayload, TextParams};
use serde::{Deserialize, Serialize};

use super::http::{nested_error_message, require_key, ProviderClient};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "GenerationConfig::is_empty")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.max_output_tokens.is_none() && self.temperature.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: [Part { text }],
        }
    }
}

fn path(model: &str) -> String {
    format!("/v1beta/models/{}:generateContent", model)
}

pub(super) async fn complete(
    client: &ProviderClient,
    params: &TextParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::Google, credentials)?;
    let model = params.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let body = GenerateRequest {
        contents: [Content::text(&params.prompt)],
        system_instruction: params.system_prompt.as_deref().map(Content::text),
        generation_config: GenerationConfig {
            max_output_tokens: params.max_tokens,
            temperature: params.temperature,
        },
    };

    let req = client
        .http()
        .post(client.endpoint(Provider::Google, &path(model)))
        .header("x-goog-api-key", key)
        .json(&body);

    let resp: GenerateResponse = client
        .send_json(Provider::Google, req, nested_error_message)
        .await?;

    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Decode {
            provider: Provider::Google,
            message: "response contained no candidates".to_string(),
        })?;
    let content = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    Ok(TaskPayload::Text {
        content,
        model: model.to_string(),
        citations: Vec::new(),
    })
}
