//! Task execution for flat batches and staged pipelines.
//!
//! ```text
//! Vec<Task> ──────────────► execute_batch ──► TaskExecutor ──► ProviderDispatcher
//!                              ▲   (join_all, input order)         (one HTTP call)
//! Pipeline ─► execute_pipeline ┘
//!              stage by stage: partition_ready → execute_batch → merge into ResultsMap
//! ```
//!
//! Nothing below `ExecutionEngine` returns an error: every failure is data
//! on the task's `Outcome`.

mod engine;
mod output;
mod runner;
mod scheduler;
mod task_executor;
pub mod traits;
pub mod types;

pub use engine::{ExecutionEngine, ExecutionEngineBuilder};
pub use runner::execute_batch;
pub use scheduler::{execute_pipeline, partition_ready};
pub use task_executor::TaskExecutor;
pub use traits::ProviderDispatcher;
pub use types::{
    BatchSummary, Outcome, Pipeline, PipelineReport, PipelineStage, ResultsMap, SkippedTask, Task,
    TaskPayload, JOB_PROCESSING,
};
