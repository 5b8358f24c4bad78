pub mod api;
pub mod config;
pub mod consensus;
pub mod error;
pub mod executor;
pub mod provider;
pub mod wire;
