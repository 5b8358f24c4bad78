//! Caller-facing task shapes and their translation into typed core tasks.
//!
//! The wire format keeps `params` as an open JSON object; translation picks
//! the provider from `service`/`agent` and decodes params into that
//! provider's struct. Translation failures do not reject the request: they
//! ride along on the task and surface as that task's failed outcome.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::executor::types::{Pipeline, PipelineStage, Task};
use crate::provider::{ProviderRequest, TaskKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub id: String,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "service")]
    pub provider: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl TaskSpec {
    pub fn into_task(self) -> Task {
        let request = ProviderRequest::for_service(&self.provider, self.params);
        build_task(self.id, self.kind.as_deref(), self.dependencies, request)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageSpec>,
}

impl PipelineSpec {
    /// Translate every stage; a missing id is replaced with a fresh UUID.
    pub fn into_pipeline(self) -> Pipeline {
        let id = self
            .id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let stages = self
            .stages
            .into_iter()
            .map(|stage| {
                let tasks = stage.tasks.into_iter().map(TaskSpec::into_task).collect();
                PipelineStage::new(stage.name, tasks)
            })
            .collect();
        Pipeline::new(id, stages)
    }
}

/// A sub-agent task: `{id, agent, prompt, model?, systemPrompt?, ...}`.
/// Everything except `id` and `agent` is treated as text-generation params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAgentTaskSpec {
    pub id: String,
    #[serde(default)]
    pub agent: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl SubAgentTaskSpec {
    pub fn into_task(self) -> Task {
        let request = ProviderRequest::for_agent(&self.agent, self.params);
        build_task(self.id, Some("text"), Vec::new(), request).with_agent(self.agent)
    }
}

fn build_task(
    id: String,
    kind: Option<&str>,
    dependencies: Vec<String>,
    request: Result<ProviderRequest, crate::error::ProviderError>,
) -> Task {
    let mut task = match request {
        Ok(request) => Task::new(id, request),
        Err(err) => Task::rejected(id, err),
    };
    task.kind = kind.and_then(TaskKind::parse);
    task.with_dependencies(dependencies)
}
