//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `conductor_core::api` instead of reaching into internal modules.

pub use crate::config::{
    apply_env_overrides, load_default, load_from_path, AppConfig, ExecutorConfig,
    HttpServerConfig, LoggingConfig, ProvidersConfig,
};
pub use crate::consensus::{build_consensus, NO_RESULTS_MESSAGE};
pub use crate::error::{ConfigError, ProviderError};
pub use crate::executor::{
    BatchSummary, ExecutionEngine, ExecutionEngineBuilder, Outcome, Pipeline, PipelineReport,
    PipelineStage, ProviderDispatcher, ResultsMap, SkippedTask, Task, TaskExecutor, TaskPayload,
};
pub use crate::provider::{
    Agent, Credentials, ImageParams, LumaParams, Provider, ProviderRequest, RunwayParams,
    SpeechParams, TaskKind, TextParams,
};
pub use crate::wire::{PipelineSpec, StageSpec, SubAgentTaskSpec, TaskSpec};
