use conductor_core::api::{Credentials, LumaParams, Provider, ProviderError, TaskPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::{non_empty, require_key, ProviderClient};

const PATH: &str = "/dream-machine/v1/generations";
const DEFAULT_MODEL: &str = "ray-2";
const DEFAULT_ASPECT_RATIO: &str = "16:9";

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    aspect_ratio: &'a str,
    #[serde(rename = "loop")]
    loop_video: bool,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    id: String,
}

/// Submit a generation job. Completion is not polled; the job id is returned.
pub(super) async fn generate(
    client: &ProviderClient,
    params: &LumaParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::Luma, credentials)?;
    let body = GenerationRequest {
        prompt: &params.prompt,
        model: params.model.as_deref().unwrap_or(DEFAULT_MODEL),
        aspect_ratio: params.aspect_ratio.as_deref().unwrap_or(DEFAULT_ASPECT_RATIO),
        loop_video: params.loop_video.unwrap_or(false),
    };

    let req = client
        .http()
        .post(client.endpoint(Provider::Luma, PATH))
        .bearer_auth(key)
        .json(&body);

    let job: GenerationResponse = client.send_json(Provider::Luma, req, error_message).await?;
    Ok(TaskPayload::video_job(job.id))
}

/// `{"detail": "..."}`
fn error_message(envelope: &Value) -> Option<String> {
    non_empty(envelope.get("detail")).or_else(|| non_empty(envelope.get("message")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http::client_for;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_generate_returns_job() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", PATH)
            .match_header("authorization", "Bearer luma-key")
            .match_body(Matcher::Json(json!({
                "prompt": "waves",
                "model": "ray-2",
                "aspect_ratio": "16:9",
                "loop": false
            })))
            .with_status(201)
            .with_body(r#"{"id":"gen-123","state":"queued"}"#)
            .create_async()
            .await;

        let client = client_for(Provider::Luma, &server.url());
        let params = LumaParams {
            prompt: "waves".into(),
            ..LumaParams::default()
        };
        let creds = Credentials::empty().with(Provider::Luma, "luma-key");
        let payload = generate(&client, &params, &creds).await.unwrap();
        assert_eq!(payload, TaskPayload::video_job("gen-123"));
    }

    #[tokio::test]
    async fn test_unparseable_error_body_uses_generic_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", PATH)
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let client = client_for(Provider::Luma, &server.url());
        let creds = Credentials::empty().with(Provider::Luma, "luma-key");
        let err = generate(&client, &LumaParams::default(), &creds)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Luma API error");
    }
}
