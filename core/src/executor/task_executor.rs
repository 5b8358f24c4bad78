use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::ProviderError;
use crate::provider::{Credentials, ProviderRequest};

use super::output::{emit_task_end, emit_task_start};
use super::traits::ProviderDispatcher;
use super::types::{Outcome, Task, TaskPayload};

/// Routes one task to its provider and folds every failure into an [`Outcome`].
///
/// `execute` is infallible by construction: missing credentials, unknown
/// services, provider errors, transport errors and timeouts all come back
/// as `success: false` records.
#[derive(Clone)]
pub struct TaskExecutor {
    dispatcher: Arc<dyn ProviderDispatcher>,
    task_timeout: Option<Duration>,
}

impl TaskExecutor {
    pub fn new(dispatcher: Arc<dyn ProviderDispatcher>) -> Self {
        Self {
            dispatcher,
            task_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.task_timeout = timeout.filter(|d| !d.is_zero());
        self
    }

    pub fn dispatcher_name(&self) -> &str {
        self.dispatcher.name()
    }

    pub async fn execute(&self, task: &Task, credentials: &Credentials) -> Outcome {
        let start = Instant::now();
        emit_task_start(task);

        let result = match &task.request {
            Ok(request) => self.invoke(request, credentials).await,
            Err(err) => Err(precondition_error(err, credentials)),
        };

        let duration = start.elapsed().as_millis() as u64;
        emit_task_end(task, &result, duration);

        let outcome = match result {
            Ok(payload) => {
                Outcome::succeeded(task.id.clone(), payload.conform_to(task.kind), duration)
            }
            Err(err) => Outcome::failed(task.id.clone(), err.to_string(), duration),
        };
        outcome.with_agent(task.agent.clone())
    }

    async fn invoke(
        &self,
        request: &ProviderRequest,
        credentials: &Credentials,
    ) -> Result<TaskPayload, ProviderError> {
        let call = self.dispatcher.dispatch(request, credentials);
        match self.task_timeout {
            None => call.await,
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| {
                    Err(ProviderError::Timeout {
                        provider: request.provider(),
                        timeout_ms: limit.as_millis() as u64,
                    })
                }),
        }
    }
}

/// A missing key outranks a params decode failure for the same provider.
fn precondition_error(err: &ProviderError, credentials: &Credentials) -> ProviderError {
    match err {
        ProviderError::InvalidParams { provider, .. } if credentials.get(*provider).is_none() => {
            ProviderError::MissingCredential(*provider)
        }
        other => other.clone(),
    }
}
