use conductor_core::api::Credentials;

use crate::error::CliError;
use crate::service::{orchestrator_status, subagent_status};

/// `conductor status`: print the credential probe for both endpoints.
pub fn handle_status() -> Result<i32, CliError> {
    println!("{}", render_status(&Credentials::from_env())?);
    Ok(0)
}

pub fn render_status(credentials: &Credentials) -> Result<String, CliError> {
    let body = serde_json::json!({
        "orchestrator": orchestrator_status(credentials),
        "subagent": subagent_status(credentials),
    });
    serde_json::to_string_pretty(&body).map_err(|e| CliError::Command(e.to_string()))
}
