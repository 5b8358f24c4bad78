//! HTTP boundary: orchestrator and sub-agent endpoints plus server lifecycle.

pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use models::*;
pub use server::*;
pub use state::*;
