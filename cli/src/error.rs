use conductor_core::api::ConfigError;
use thiserror::Error;

use crate::service::RequestError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Request(#[from] RequestError),
    #[error("server failed: {0}")]
    Server(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        // 11: config error
        // 20: IO / server start
        // 30: malformed request file
        // 50: internal/uncategorized
        match self {
            Self::Config(_) => 11,
            Self::Io(_) | Self::Server(_) | Self::Command(_) => 20,
            Self::Request(_) => 30,
            Self::Anyhow(_) => 50,
        }
    }
}
