pub mod config;
pub mod provider;

pub use config::ConfigError;
pub use provider::ProviderError;
