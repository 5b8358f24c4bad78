use crate::error::ProviderError;
use crate::provider::{Provider, ProviderRequest, TaskKind};

/// One unit of work: a single call against a single provider.
///
/// `request` carries the outcome of boundary translation. A task whose
/// service name or params could not be translated still takes part in
/// scheduling and fails with that error when it is reached.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub kind: Option<TaskKind>,
    pub dependencies: Vec<String>,
    pub request: Result<ProviderRequest, ProviderError>,
    /// Sub-agent name as the caller wrote it, kept for attribution.
    pub agent: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, request: ProviderRequest) -> Self {
        Self {
            id: id.into(),
            kind: None,
            dependencies: Vec::new(),
            request: Ok(request),
            agent: None,
        }
    }

    pub fn rejected(id: impl Into<String>, error: ProviderError) -> Self {
        Self {
            id: id.into(),
            kind: None,
            dependencies: Vec::new(),
            request: Err(error),
            agent: None,
        }
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn provider(&self) -> Option<Provider> {
        self.request.as_ref().ok().map(ProviderRequest::provider)
    }
}

/// A batch of tasks executed together once every earlier stage has settled.
#[derive(Debug, Clone, Default)]
pub struct PipelineStage {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl PipelineStage {
    pub fn new(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            name: name.into(),
            tasks,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub id: String,
    pub stages: Vec<PipelineStage>,
}

impl Pipeline {
    pub fn new(id: impl Into<String>, stages: Vec<PipelineStage>) -> Self {
        Self {
            id: id.into(),
            stages,
        }
    }

    pub fn task_count(&self) -> usize {
        self.stages.iter().map(|s| s.tasks.len()).sum()
    }
}
