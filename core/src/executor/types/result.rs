use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::provider::TaskKind;

/// Status reported for asynchronous video jobs; completion is polled elsewhere.
pub const JOB_PROCESSING: &str = "processing";

/// Normalized provider output, tagged by the kind of media produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskPayload {
    Image {
        /// Base64-encoded image bytes.
        data: String,
        format: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    Audio {
        data: String,
        format: String,
    },
    Video {
        #[serde(rename = "jobId")]
        job_id: String,
        status: String,
    },
    Text {
        content: String,
        model: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        citations: Vec<String>,
    },
    Research {
        content: String,
        model: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        citations: Vec<String>,
    },
}

impl TaskPayload {
    pub fn video_job(job_id: impl Into<String>) -> Self {
        Self::Video {
            job_id: job_id.into(),
            status: JOB_PROCESSING.to_string(),
        }
    }

    /// Research output from a task declared as plain text is reported as text.
    pub fn conform_to(self, kind: Option<TaskKind>) -> Self {
        match (self, kind) {
            (
                Self::Research {
                    content,
                    model,
                    citations,
                },
                Some(TaskKind::Text),
            ) => Self::Text {
                content,
                model,
                citations,
            },
            (payload, _) => payload,
        }
    }

    /// Textual content, for payloads that have one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. } | Self::Research { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Per-task execution record. Exactly one of `result` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub task_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Wall-clock milliseconds spent on this task.
    pub duration: u64,
}

impl Outcome {
    pub fn succeeded(task_id: impl Into<String>, result: TaskPayload, duration: u64) -> Self {
        Self {
            task_id: task_id.into(),
            success: true,
            result: Some(result),
            error: None,
            agent: None,
            duration,
        }
    }

    pub fn failed(task_id: impl Into<String>, error: impl Into<String>, duration: u64) -> Self {
        Self {
            task_id: task_id.into(),
            success: false,
            result: None,
            error: Some(error.into()),
            agent: None,
            duration,
        }
    }

    pub fn with_agent(mut self, agent: Option<String>) -> Self {
        self.agent = agent;
        self
    }
}

/// Task id -> Outcome, ordered by id for stable output.
pub type ResultsMap = BTreeMap<String, Outcome>;

/// A pipeline task that never ran because a dependency was not satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedTask {
    pub task_id: String,
    pub stage: usize,
    pub unmet_dependencies: Vec<String>,
}

/// Result of running a whole pipeline.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub pipeline_id: String,
    pub results: ResultsMap,
    pub skipped: Vec<SkippedTask>,
    pub duration_ms: u64,
}

/// Success/failure counts for a batch of outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a Outcome>,
    {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut acc, outcome| {
                acc.total += 1;
                if outcome.success {
                    acc.successful += 1;
                } else {
                    acc.failed += 1;
                }
                acc
            })
    }
}
