//! conductor-cli library: exposes modules for the binary and for tests.

pub mod commands;
pub mod error;
pub mod http;
pub mod service;
