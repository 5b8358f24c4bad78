use std::sync::Arc;

use anyhow::Result;

use conductor_core::api::{AppConfig, ExecutionEngine, ProviderDispatcher};

use crate::providers::HttpDispatcher;

pub fn build_dispatcher(cfg: &AppConfig) -> Result<Arc<dyn ProviderDispatcher>> {
    Ok(Arc::new(HttpDispatcher::new(&cfg.providers)?))
}

/// Engine wired to the live HTTP adapters, with the configured limits.
pub fn build_engine(cfg: &AppConfig) -> Result<ExecutionEngine> {
    let dispatcher = build_dispatcher(cfg)?;
    Ok(ExecutionEngine::from_config(dispatcher, &cfg.executor))
}
