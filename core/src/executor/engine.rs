use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ExecutorConfig;
use crate::provider::Credentials;

use super::output::{emit_batch_end, emit_batch_start};
use super::runner::execute_batch;
use super::scheduler::execute_pipeline;
use super::task_executor::TaskExecutor;
use super::traits::ProviderDispatcher;
use super::types::{Outcome, Pipeline, PipelineReport, Task};

/// Entry point for both execution shapes: a flat batch or a staged pipeline.
#[derive(Clone)]
pub struct ExecutionEngine {
    executor: TaskExecutor,
    max_parallel: Option<usize>,
}

pub struct ExecutionEngineBuilder {
    dispatcher: Arc<dyn ProviderDispatcher>,
    max_parallel: Option<usize>,
    task_timeout: Option<Duration>,
}

impl ExecutionEngine {
    pub fn new(dispatcher: Arc<dyn ProviderDispatcher>) -> Self {
        Self::builder(dispatcher).build()
    }

    pub fn builder(dispatcher: Arc<dyn ProviderDispatcher>) -> ExecutionEngineBuilder {
        ExecutionEngineBuilder::new(dispatcher)
    }

    pub fn from_config(dispatcher: Arc<dyn ProviderDispatcher>, cfg: &ExecutorConfig) -> Self {
        Self::builder(dispatcher)
            .max_parallel(cfg.max_parallel)
            .task_timeout(Some(Duration::from_millis(cfg.task_timeout_ms)))
            .build()
    }

    pub fn executor(&self) -> &TaskExecutor {
        &self.executor
    }

    /// Fan out a flat task list. Dependencies are ignored in this mode.
    pub async fn run_tasks(&self, tasks: &[Task], credentials: &Credentials) -> Vec<Outcome> {
        let start = Instant::now();
        emit_batch_start(tasks.len(), self.max_parallel);

        let outcomes = execute_batch(tasks, &self.executor, credentials, self.max_parallel).await;

        emit_batch_end(&outcomes, start.elapsed().as_millis() as u64);
        outcomes
    }

    /// Run a staged pipeline with dependency gating.
    pub async fn run_pipeline(&self, pipeline: &Pipeline, credentials: &Credentials) -> PipelineReport {
        execute_pipeline(pipeline, &self.executor, credentials, self.max_parallel).await
    }
}

impl ExecutionEngineBuilder {
    pub fn new(dispatcher: Arc<dyn ProviderDispatcher>) -> Self {
        Self {
            dispatcher,
            max_parallel: None,
            task_timeout: None,
        }
    }

    pub fn max_parallel(mut self, max_parallel: Option<usize>) -> Self {
        self.max_parallel = max_parallel.filter(|n| *n > 0);
        self
    }

    pub fn task_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn build(self) -> ExecutionEngine {
        ExecutionEngine {
            executor: TaskExecutor::new(self.dispatcher).with_timeout(self.task_timeout),
            max_parallel: self.max_parallel,
        }
    }
}
