//! Provider identities, typed request shapes and credentials.

mod credentials;
mod kind;
mod params;
mod request;

pub use credentials::Credentials;
pub use kind::{Agent, Provider, TaskKind};
pub use params::{ImageParams, LumaParams, RunwayParams, SpeechParams, TextParams};
pub use request::ProviderRequest;
