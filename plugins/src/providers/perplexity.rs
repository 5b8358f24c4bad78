use conductor_core::api::{Credentials, Provider, ProviderError, TaskPayload, TextParams};
use serde_json::Value;

use super::http::{nested_error_message, non_empty, require_key, ProviderClient};
use super::openai::{ChatRequest, ChatResponse};

const PATH: &str = "/chat/completions";
const DEFAULT_MODEL: &str = "sonar-pro";

/// Search-grounded completion. Citations are passed through as returned.
pub(super) async fn research(
    client: &ProviderClient,
    params: &TextParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::Perplexity, credentials)?;
    let model = params.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let body = ChatRequest::from_params(params, model);

    let req = client
        .http()
        .post(client.endpoint(Provider::Perplexity, PATH))
        .bearer_auth(key)
        .json(&body);

    let resp: ChatResponse = client
        .send_json(Provider::Perplexity, req, error_message)
        .await?;

    Ok(TaskPayload::Research {
        content: resp.first_content(Provider::Perplexity)?,
        model: resp.model.unwrap_or_else(|| model.to_string()),
        citations: resp.citations,
    })
}

fn error_message(envelope: &Value) -> Option<String> {
    nested_error_message(envelope).or_else(|| non_empty(envelope.get("detail")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http::client_for;
    use mockito::Server;

    #[tokio::test]
    async fn test_research_returns_citations() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", PATH)
            .match_header("authorization", "Bearer px")
            .with_status(200)
            .with_body(
                r#"{"model":"sonar-pro","choices":[{"message":{"content":"Rust 1.0 shipped in 2015."}}],
                    "citations":["https://blog.rust-lang.org"]}"#,
            )
            .create_async()
            .await;

        let client = client_for(Provider::Perplexity, &server.url());
        let params = TextParams {
            prompt: "When did Rust 1.0 ship?".into(),
            ..TextParams::default()
        };
        let creds = Credentials::empty().with(Provider::Perplexity, "px");
        let payload = research(&client, &params, &creds).await.unwrap();
        assert_eq!(
            payload,
            TaskPayload::Research {
                content: "Rust 1.0 shipped in 2015.".into(),
                model: "sonar-pro".into(),
                citations: vec!["https://blog.rust-lang.org".into()],
            }
        );
    }
}
