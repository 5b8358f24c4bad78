//! Route handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use chrono::Local;
use tokio::task::JoinError;

use crate::http::{models::*, state::AppState};
use crate::service::{
    orchestrator_status, parse_orchestrator_request, parse_subagent_request, run_orchestrator,
    run_subagent, subagent_status, OrchestratorResponse, OrchestratorStatus, SubAgentResponse,
    SubAgentStatus,
};

const ORCHESTRATOR_PATH: &str = "/api/orchestrator";
const SUBAGENT_PATH: &str = "/api/subagent";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            ORCHESTRATOR_PATH,
            post(orchestrator_handler).get(orchestrator_status_handler),
        )
        .route(
            SUBAGENT_PATH,
            post(subagent_handler).get(subagent_status_handler),
        )
        .route("/health", get(health_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(state)
}

/// POST /api/orchestrator
///
/// The body is taken raw so that malformed JSON maps to our 400 envelope.
/// Orchestration runs on its own task; a panic inside it becomes a 500.
async fn orchestrator_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<OrchestratorResponse>, HttpServerError> {
    state.record_request(ORCHESTRATOR_PATH);

    let job = parse_orchestrator_request(&body).map_err(|e| {
        state.record_error();
        HttpServerError::from(e)
    })?;

    let engine = state.engine.clone();
    let credentials = state.credentials();
    tokio::spawn(async move { run_orchestrator(&engine, &credentials, job).await })
        .await
        .map(Json)
        .map_err(|e| {
            state.record_error();
            internal_error(ORCHESTRATOR_PATH, e)
        })
}

/// POST /api/subagent
async fn subagent_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubAgentResponse>, HttpServerError> {
    state.record_request(SUBAGENT_PATH);

    let job = parse_subagent_request(&body).map_err(|e| {
        state.record_error();
        HttpServerError::from(e)
    })?;

    let engine = state.engine.clone();
    let credentials = state.credentials();
    tokio::spawn(async move { run_subagent(&engine, &credentials, job).await })
        .await
        .map(Json)
        .map_err(|e| {
            state.record_error();
            internal_error(SUBAGENT_PATH, e)
        })
}

/// GET /api/orchestrator
async fn orchestrator_status_handler(State(state): State<AppState>) -> Json<OrchestratorStatus> {
    state.record_request(ORCHESTRATOR_PATH);
    Json(orchestrator_status(&state.credentials()))
}

/// GET /api/subagent
async fn subagent_status_handler(State(state): State<AppState>) -> Json<SubAgentStatus> {
    state.record_request(SUBAGENT_PATH);
    Json(subagent_status(&state.credentials()))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (uptime_seconds, requests_handled) = state
        .stats
        .read()
        .map(|s| (s.uptime_seconds(), s.requests_total))
        .unwrap_or_default();

    Json(HealthResponse {
        status: "ok".to_string(),
        session_id: state.session_id.clone(),
        uptime_seconds,
        requests_handled,
        timestamp: Local::now().to_rfc3339(),
    })
}

/// POST /api/shutdown
async fn shutdown_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let _ = state.shutdown_tx.send(());

    Json(serde_json::json!({
        "success": true,
        "message": "Shutdown signal sent"
    }))
}

fn internal_error(endpoint: &str, err: JoinError) -> HttpServerError {
    let message = if err.is_panic() {
        let payload = err.into_panic();
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "orchestration task panicked".to_string())
    } else {
        err.to_string()
    };
    tracing::error!(target: "conductor.http", endpoint, error = %message, "Request failed");
    HttpServerError::Internal(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use conductor_core::api::{
        Credentials, ExecutionEngine, Provider, ProviderDispatcher, ProviderError,
        ProviderRequest, TaskPayload,
    };
    use conductor_plugins::providers::HttpDispatcher;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    /// Echoes the prompt back; "panic" panics, "fail" fails.
    struct EchoDispatcher;

    #[async_trait]
    impl ProviderDispatcher for EchoDispatcher {
        fn name(&self) -> &str {
            "echo"
        }

        async fn dispatch(
            &self,
            request: &ProviderRequest,
            _credentials: &Credentials,
        ) -> Result<TaskPayload, ProviderError> {
            let prompt = match request {
                ProviderRequest::Anthropic(p)
                | ProviderRequest::OpenAi(p)
                | ProviderRequest::Perplexity(p)
                | ProviderRequest::Google(p) => p.prompt.clone(),
                _ => String::new(),
            };
            match prompt.as_str() {
                "panic" => panic!("dispatcher exploded"),
                "fail" => Err(ProviderError::generic_api(request.provider(), 500)),
                _ => Ok(TaskPayload::Text {
                    content: prompt,
                    model: "echo".into(),
                    citations: vec![],
                }),
            }
        }
    }

    fn state_with(dispatcher: Arc<dyn ProviderDispatcher>, creds: Credentials) -> AppState {
        let (shutdown_tx, _) = broadcast::channel(1);
        AppState::new(
            "test-session".into(),
            ExecutionEngine::new(dispatcher),
            Default::default(),
            shutdown_tx,
        )
        .with_credentials(Arc::new(move || creds.clone()))
    }

    fn echo_state() -> AppState {
        state_with(Arc::new(EchoDispatcher), Credentials::empty())
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn error_of(
        result: Result<impl IntoResponse, HttpServerError>,
    ) -> (StatusCode, Value) {
        let resp = result.map(IntoResponse::into_response).unwrap_or_else(IntoResponse::into_response);
        let status = resp.status();
        (status, body_json(resp).await)
    }

    #[tokio::test]
    async fn test_missing_openai_key_is_per_task_failure() {
        let dispatcher = HttpDispatcher::new(&Default::default()).unwrap();
        let state = state_with(Arc::new(dispatcher), Credentials::empty());
        let body = Bytes::from_static(
            br#"{"tasks":[{"id":"t1","type":"text","provider":"openai","params":{"prompt":"hi"}}]}"#,
        );

        let Json(resp) = orchestrator_handler(State(state), body).await.unwrap();
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["results"][0]["taskId"], json!("t1"));
        assert_eq!(value["results"][0]["success"], json!(false));
        assert_eq!(
            value["results"][0]["error"],
            json!("OpenAI API key not configured")
        );
    }

    #[tokio::test]
    async fn test_pipeline_response_shape() {
        let body = Bytes::from_static(
            br#"{"pipeline":{"id":"pipe-1","stages":[
                {"name":"draft","tasks":[{"id":"a","service":"anthropic","params":{"prompt":"fail"}}]},
                {"name":"polish","tasks":[{"id":"b","service":"openai","params":{"prompt":"x"},"dependencies":["a"]}]}
            ]}}"#,
        );

        let Json(resp) = orchestrator_handler(State(echo_state()), body).await.unwrap();
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["pipelineId"], json!("pipe-1"));
        assert_eq!(value["results"]["a"]["success"], json!(false));
        assert!(value["results"].get("b").is_none());
        assert_eq!(value["skipped"][0]["taskId"], json!("b"));
        assert!(value["totalDuration"].is_u64());
    }

    #[tokio::test]
    async fn test_unknown_service_is_per_task_failure() {
        let body = Bytes::from_static(br#"{"tasks":[{"id":"v","service":"sora"}]}"#);
        let Json(resp) = orchestrator_handler(State(echo_state()), body).await.unwrap();
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["results"][0]["error"], json!("Unknown service: sora"));
    }

    #[tokio::test]
    async fn test_orchestrator_rejects_empty_body_shape() {
        let state = echo_state();
        let result = orchestrator_handler(State(state.clone()), Bytes::from_static(b"{}")).await;
        let (status, body) = error_of(result).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            json!("Invalid request: provide either pipeline or tasks array")
        );
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error_code"], json!("INVALID_REQUEST"));
        assert_eq!(state.stats.read().unwrap().errors_total, 1);
    }

    #[tokio::test]
    async fn test_orchestrator_malformed_json() {
        let result =
            orchestrator_handler(State(echo_state()), Bytes::from_static(b"{\"tasks\": [")).await;
        let (status, body) = error_of(result).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request: "));
    }

    #[tokio::test]
    async fn test_panic_in_orchestration_is_500() {
        let body = Bytes::from_static(
            br#"{"tasks":[{"id":"p","service":"openai","params":{"prompt":"panic"}}]}"#,
        );
        let result = orchestrator_handler(State(echo_state()), body).await;
        let (status, body) = error_of(result).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("dispatcher exploded"));
        assert_eq!(body["error_code"], json!("INTERNAL_ERROR"));
    }

    #[tokio::test]
    async fn test_subagent_empty_tasks_is_400() {
        let result =
            subagent_handler(State(echo_state()), Bytes::from_static(br#"{"tasks":[]}"#)).await;
        let (status, body) = error_of(result).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Invalid request: provide tasks array"));
    }

    #[tokio::test]
    async fn test_subagent_consensus() {
        let body = Bytes::from_static(
            br#"{"tasks":[
                {"id":"1","agent":"agent1","prompt":"ignored"},
                {"id":"2","agent":"claude","prompt":"Alpha"},
                {"id":"3","agent":"openai","prompt":"fail"},
                {"id":"4","agent":"google","prompt":"Beta"}
            ],"synthesize":true}"#,
        );

        let Json(resp) = subagent_handler(State(echo_state()), body).await.unwrap();

        assert_eq!(resp.total_tasks, 4);
        assert_eq!(resp.successful_tasks, 2);
        assert_eq!(resp.failed_tasks, 2);
        assert_eq!(resp.results[0].error.as_deref(), Some("Unknown agent: agent1"));
        assert_eq!(resp.results[1].agent.as_deref(), Some("claude"));
        assert_eq!(
            resp.consensus.as_deref(),
            Some("## CLAUDE\n\nAlpha\n\n---\n\n## GOOGLE\n\nBeta")
        );
    }

    #[tokio::test]
    async fn test_subagent_without_synthesize_omits_consensus() {
        let body = Bytes::from_static(br#"{"tasks":[{"id":"1","agent":"claude","prompt":"x"}]}"#);
        let Json(resp) = subagent_handler(State(echo_state()), body).await.unwrap();
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("consensus").is_none());
        assert_eq!(value["successfulTasks"], json!(1));
    }

    #[tokio::test]
    async fn test_status_handlers() {
        let state = state_with(
            Arc::new(EchoDispatcher),
            Credentials::empty().with(Provider::Perplexity, "pk"),
        );

        let Json(services) = orchestrator_status_handler(State(state.clone())).await;
        assert!(services.services["perplexity"]);
        assert!(!services.services["stability"]);
        assert!(services.capabilities.contains(&"pipeline-execution"));

        let Json(agents) = subagent_status_handler(State(state)).await;
        assert!(agents.agents["perplexity"]);
        assert!(!agents.agents["claude"]);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = echo_state();
        state.record_request(ORCHESTRATOR_PATH);
        let Json(health) = health_handler(State(state)).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.session_id, "test-session");
        assert_eq!(health.requests_handled, 1);
    }

    #[tokio::test]
    async fn test_shutdown_handler() {
        let state = echo_state();
        let mut shutdown_rx = state.shutdown_tx.subscribe();

        let response = shutdown_handler(State(state)).await;
        assert_eq!(response.0["success"], true);
        assert!(shutdown_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_router_serves_orchestrator() {
        let app = create_router(echo_state());
        let resp = app
            .oneshot(
                Request::post(ORCHESTRATOR_PATH)
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"tasks":[{"id":"a","service":"openai","params":{"prompt":"hello"}}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let value = body_json(resp).await;
        assert_eq!(value["results"][0]["result"]["content"], json!("hello"));
        assert_eq!(value["results"][0]["result"]["type"], json!("text"));
    }

    #[tokio::test]
    async fn test_router_status_probe() {
        let app = create_router(echo_state());
        let resp = app
            .oneshot(Request::get(SUBAGENT_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let value = body_json(resp).await;
        assert_eq!(value["agents"]["claude"], json!(false));
    }
}
