use std::path::Path;

use conductor_core::api::{AppConfig, Credentials, ExecutionEngine};
use serde::Serialize;

use super::cli::RunArgs;
use crate::error::CliError;
use crate::service::{
    parse_orchestrator_request, parse_subagent_request, run_orchestrator, run_subagent,
};

/// `conductor run`: execute one request body and print the JSON response.
pub async fn handle_run(args: RunArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let engine = conductor_plugins::factory::build_engine(cfg)?;
    let output = execute_file(&args, &engine, &Credentials::from_env()).await?;
    println!("{output}");
    Ok(0)
}

pub async fn execute_file(
    args: &RunArgs,
    engine: &ExecutionEngine,
    credentials: &Credentials,
) -> Result<String, CliError> {
    let body = read_body(&args.file)?;

    if args.subagent {
        let mut job = parse_subagent_request(&body)?;
        job.synthesize |= args.synthesize;
        render(&run_subagent(engine, credentials, job).await)
    } else {
        let job = parse_orchestrator_request(&body)?;
        render(&run_orchestrator(engine, credentials, job).await)
    }
}

fn read_body(path: &Path) -> Result<Vec<u8>, CliError> {
    Ok(std::fs::read(path)?)
}

fn render<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Command(e.to_string()))
}
