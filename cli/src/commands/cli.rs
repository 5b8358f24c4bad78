use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "conductor", version, about = "Fan-out orchestration of generative provider calls")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Explicit config file; defaults to ~/.conductor/config.toml then ./conductor.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// JSON request body, as it would be POSTed to the server.
    pub file: PathBuf,

    /// Treat the file as a sub-agent request instead of an orchestrator request.
    #[arg(long)]
    pub subagent: bool,

    /// Force consensus synthesis (sub-agent requests only).
    #[arg(long, requires = "subagent")]
    pub synthesize: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Execute one request file and print the response.
    Run(RunArgs),
    /// Show which providers and agents have credentials configured.
    Status,
}
