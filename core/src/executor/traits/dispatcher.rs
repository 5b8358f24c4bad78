use async_trait::async_trait;

use crate::error::ProviderError;
use crate::executor::types::TaskPayload;
use crate::provider::{Credentials, ProviderRequest};

/// Performs exactly one provider call for a typed request.
///
/// Implementations match exhaustively on [`ProviderRequest`]. They must not
/// retry or cache, and they report every failure through `ProviderError`.
#[async_trait]
pub trait ProviderDispatcher: Send + Sync {
    fn name(&self) -> &str;

    async fn dispatch(
        &self,
        request: &ProviderRequest,
        credentials: &Credentials,
    ) -> Result<TaskPayload, ProviderError>;
}
