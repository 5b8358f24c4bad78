use conductor_core::api::{Credentials, ImageParams, Provider, ProviderError, TaskPayload};
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::Value;

use super::http::{non_empty, require_key, ProviderClient};

const PATH: &str = "/v2beta/stable-image/generate/sd3";
const DEFAULT_MODEL: &str = "sd3.5-large";
const DEFAULT_ASPECT_RATIO: &str = "16:9";
const DEFAULT_FORMAT: &str = "png";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    image: String,
    #[serde(default)]
    seed: Option<u64>,
}

pub(super) async fn generate(
    client: &ProviderClient,
    params: &ImageParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::Stability, credentials)?;
    let format = params.output_format.as_deref().unwrap_or(DEFAULT_FORMAT);

    let mut form = Form::new()
        .text("prompt", params.prompt.clone())
        .text("model", params.model.as_deref().unwrap_or(DEFAULT_MODEL).to_string())
        .text(
            "aspect_ratio",
            params
                .aspect_ratio
                .as_deref()
                .unwrap_or(DEFAULT_ASPECT_RATIO)
                .to_string(),
        )
        .text("output_format", format.to_string());
    if let Some(negative) = &params.negative_prompt {
        form = form.text("negative_prompt", negative.clone());
    }
    if let Some(seed) = params.seed {
        form = form.text("seed", seed.to_string());
    }

    let req = client
        .http()
        .post(client.endpoint(Provider::Stability, PATH))
        .bearer_auth(key)
        .header("accept", "application/json")
        .multipart(form);

    let body: GenerateResponse = client
        .send_json(Provider::Stability, req, error_message)
        .await?;

    Ok(TaskPayload::Image {
        data: body.image,
        format: format.to_string(),
        seed: body.seed,
    })
}

/// `{"name": "...", "errors": ["..."]}`, occasionally with a top-level `message`.
fn error_message(envelope: &Value) -> Option<String> {
    let joined = envelope
        .get("errors")
        .and_then(Value::as_array)
        .map(|errs| {
            errs.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|s| !s.is_empty());
    joined
        .or_else(|| non_empty(envelope.get("message")))
        .or_else(|| non_empty(envelope.get("name")))
}
