//! Request shapes accepted by the orchestrator and sub-agent entry points,
//! and the glue that runs them on an [`ExecutionEngine`].
//!
//! Shared by the HTTP handlers and `conductor run`.

use std::collections::BTreeMap;
use std::time::Instant;

use conductor_core::api::{
    build_consensus, Agent, BatchSummary, Credentials, ExecutionEngine, Outcome, Pipeline,
    PipelineSpec, Provider, ResultsMap, SkippedTask, SubAgentTaskSpec, Task, TaskSpec,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ORCHESTRATOR_CAPABILITIES: [&str; 7] = [
    "image-generation",
    "video-generation",
    "audio-generation",
    "text-generation",
    "research",
    "parallel-execution",
    "pipeline-execution",
];

pub const SUBAGENT_CAPABILITIES: [&str; 3] =
    ["parallel-execution", "multi-model", "consensus-synthesis"];

/// Rejections that happen before any task runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Invalid request: {0}")]
    Malformed(String),
    #[error("Invalid request: provide either pipeline or tasks array")]
    MissingWork,
    #[error("Invalid request: provide tasks array")]
    MissingTasks,
}

#[derive(Debug, Deserialize)]
struct OrchestratorBody {
    #[serde(default)]
    pipeline: Option<PipelineSpec>,
    #[serde(default)]
    tasks: Option<Vec<TaskSpec>>,
}

#[derive(Debug, Deserialize)]
struct SubAgentBody {
    #[serde(default)]
    tasks: Option<Vec<SubAgentTaskSpec>>,
    #[serde(default)]
    synthesize: bool,
}

/// A translated orchestrator request. A pipeline wins when both keys are sent.
#[derive(Debug)]
pub enum OrchestratorJob {
    Pipeline(Pipeline),
    Tasks(Vec<Task>),
}

#[derive(Debug)]
pub struct SubAgentJob {
    pub tasks: Vec<Task>,
    pub synthesize: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatResponse {
    pub success: bool,
    pub results: Vec<Outcome>,
    pub total_duration: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    pub success: bool,
    pub pipeline_id: String,
    pub results: ResultsMap,
    pub skipped: Vec<SkippedTask>,
    pub total_duration: u64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OrchestratorResponse {
    Flat(FlatResponse),
    Pipeline(PipelineResponse),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAgentResponse {
    pub success: bool,
    pub total_tasks: usize,
    pub successful_tasks: usize,
    pub failed_tasks: usize,
    pub total_duration: u64,
    pub results: Vec<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrchestratorStatus {
    pub services: BTreeMap<String, bool>,
    pub capabilities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SubAgentStatus {
    pub agents: BTreeMap<String, bool>,
    pub capabilities: Vec<&'static str>,
}

pub fn parse_orchestrator_request(body: &[u8]) -> Result<OrchestratorJob, RequestError> {
    let body: OrchestratorBody =
        serde_json::from_slice(body).map_err(|e| RequestError::Malformed(e.to_string()))?;

    match (body.pipeline, body.tasks) {
        (Some(pipeline), _) => Ok(OrchestratorJob::Pipeline(pipeline.into_pipeline())),
        (None, Some(tasks)) => Ok(OrchestratorJob::Tasks(
            tasks.into_iter().map(TaskSpec::into_task).collect(),
        )),
        (None, None) => Err(RequestError::MissingWork),
    }
}

pub fn parse_subagent_request(body: &[u8]) -> Result<SubAgentJob, RequestError> {
    let body: SubAgentBody =
        serde_json::from_slice(body).map_err(|e| RequestError::Malformed(e.to_string()))?;

    let tasks = body
        .tasks
        .filter(|t| !t.is_empty())
        .ok_or(RequestError::MissingTasks)?;

    Ok(SubAgentJob {
        tasks: tasks.into_iter().map(SubAgentTaskSpec::into_task).collect(),
        synthesize: body.synthesize,
    })
}

pub async fn run_orchestrator(
    engine: &ExecutionEngine,
    credentials: &Credentials,
    job: OrchestratorJob,
) -> OrchestratorResponse {
    let start = Instant::now();
    match job {
        OrchestratorJob::Pipeline(pipeline) => {
            let report = engine.run_pipeline(&pipeline, credentials).await;
            OrchestratorResponse::Pipeline(PipelineResponse {
                success: true,
                pipeline_id: report.pipeline_id,
                results: report.results,
                skipped: report.skipped,
                total_duration: start.elapsed().as_millis() as u64,
            })
        }
        OrchestratorJob::Tasks(tasks) => {
            let results = engine.run_tasks(&tasks, credentials).await;
            OrchestratorResponse::Flat(FlatResponse {
                success: true,
                results,
                total_duration: start.elapsed().as_millis() as u64,
            })
        }
    }
}

pub async fn run_subagent(
    engine: &ExecutionEngine,
    credentials: &Credentials,
    job: SubAgentJob,
) -> SubAgentResponse {
    let start = Instant::now();
    let results = engine.run_tasks(&job.tasks, credentials).await;
    let summary = BatchSummary::from_outcomes(&results);
    let consensus = job.synthesize.then(|| build_consensus(&results));

    SubAgentResponse {
        success: true,
        total_tasks: summary.total,
        successful_tasks: summary.successful,
        failed_tasks: summary.failed,
        total_duration: start.elapsed().as_millis() as u64,
        results,
        consensus,
    }
}

pub fn orchestrator_status(credentials: &Credentials) -> OrchestratorStatus {
    OrchestratorStatus {
        services: credentials.status(Provider::SERVICES.map(|p| (p.service_id(), p))),
        capabilities: ORCHESTRATOR_CAPABILITIES.to_vec(),
    }
}

pub fn subagent_status(credentials: &Credentials) -> SubAgentStatus {
    SubAgentStatus {
        agents: credentials.status(Agent::ALL.map(|a| (a.id(), a.provider()))),
        capabilities: SUBAGENT_CAPABILITIES.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_neither_pipeline_nor_tasks() {
        let err = parse_orchestrator_request(br#"{"foo": 1}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid request: provide either pipeline or tasks array"
        );
    }

    #[test]
    fn test_malformed_json_is_request_error() {
        let err = parse_orchestrator_request(b"{not json").unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
        assert!(err.to_string().starts_with("Invalid request: "));
    }

    #[test]
    fn test_pipeline_wins_over_tasks() {
        let job = parse_orchestrator_request(
            br#"{"tasks":[{"id":"flat","service":"openai"}],
                 "pipeline":{"id":"p","stages":[{"name":"s","tasks":[]}]}}"#,
        )
        .unwrap();
        match job {
            OrchestratorJob::Pipeline(p) => assert_eq!(p.id, "p"),
            OrchestratorJob::Tasks(_) => panic!("expected pipeline"),
        }
    }

    #[test]
    fn test_empty_flat_tasks_are_accepted() {
        let job = parse_orchestrator_request(br#"{"tasks":[]}"#).unwrap();
        assert!(matches!(job, OrchestratorJob::Tasks(t) if t.is_empty()));
    }

    #[test]
    fn test_subagent_requires_tasks() {
        for body in [&br#"{"tasks":[]}"#[..], &br#"{"synthesize":true}"#[..]] {
            let err = parse_subagent_request(body).unwrap_err();
            assert_eq!(err.to_string(), "Invalid request: provide tasks array");
        }
    }

    #[test]
    fn test_subagent_unknown_agent_rides_along() {
        let job = parse_subagent_request(
            br#"{"tasks":[{"id":"a","agent":"grok","prompt":"hi"}],"synthesize":true}"#,
        )
        .unwrap();
        assert!(job.synthesize);
        assert_eq!(
            job.tasks[0].request.as_ref().unwrap_err().to_string(),
            "Unknown agent: grok"
        );
    }

    #[test]
    fn test_status_probe_lists_every_service_and_agent() {
        let creds = Credentials::empty().with(Provider::Anthropic, "k");
        let status = orchestrator_status(&creds);
        assert_eq!(status.services.len(), 7);
        assert!(status.services["anthropic"]);
        assert!(!status.services["openai"]);

        let agents = subagent_status(&creds);
        assert_eq!(agents.agents.len(), 4);
        assert!(agents.agents["claude"]);
        assert!(!agents.agents["google"]);
    }
}
