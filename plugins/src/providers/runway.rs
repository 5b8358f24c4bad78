use conductor_core::api::{Credentials, Provider, ProviderError, RunwayParams, TaskPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::{non_empty, require_key, ProviderClient};

const PATH: &str = "/v1/image_to_video";
const API_VERSION: &str = "2024-11-06";
const DEFAULT_MODEL: &str = "gen4_turbo";
const DEFAULT_RATIO: &str = "1280:720";
const DEFAULT_DURATION: u32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageToVideoRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_image: Option<&'a str>,
    prompt_text: &'a str,
    model: &'a str,
    ratio: &'a str,
    duration: u32,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    id: String,
}

pub(super) async fn generate(
    client: &ProviderClient,
    params: &RunwayParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::Runway, credentials)?;
    let body = ImageToVideoRequest {
        prompt_image: params.prompt_image.as_deref(),
        prompt_text: &params.prompt,
        model: params.model.as_deref().unwrap_or(DEFAULT_MODEL),
        ratio: params.ratio.as_deref().unwrap_or(DEFAULT_RATIO),
        duration: params.duration.unwrap_or(DEFAULT_DURATION),
    };

    let req = client
        .http()
        .post(client.endpoint(Provider::Runway, PATH))
        .bearer_auth(key)
        .header("X-Runway-Version", API_VERSION)
        .json(&body);

    let task: TaskResponse = client.send_json(Provider::Runway, req, error_message).await?;
    Ok(TaskPayload::video_job(task.id))
}

/// `{"error": "..."}`
fn error_message(envelope: &Value) -> Option<String> {
    non_empty(envelope.get("error")).or_else(|| non_empty(envelope.get("message")))
}
