#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use conductor_core::api::{
    Credentials, ProviderDispatcher, ProviderError, ProviderRequest, Task, TaskPayload, TextParams,
};

#[derive(Debug, Clone, Copy)]
pub struct Behavior {
    pub delay_ms: u64,
    pub succeed: bool,
}

impl Behavior {
    pub fn ok(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            succeed: true,
        }
    }

    pub fn fail(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            succeed: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallRecord {
    pub key: String,
    pub entered: Instant,
    pub exited: Instant,
}

/// Test double keyed by the task's prompt; records entry/exit instants.
#[derive(Default)]
pub struct ScriptedDispatcher {
    behaviors: HashMap<String, Behavior>,
    calls: Mutex<Vec<CallRecord>>,
}

impl ScriptedDispatcher {
    pub fn new<I>(behaviors: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Behavior)>,
    {
        Self {
            behaviors: behaviors
                .into_iter()
                .map(|(k, b)| (k.to_string(), b))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, key: &str) -> bool {
        self.calls().iter().any(|c| c.key == key)
    }

    pub fn call(&self, key: &str) -> CallRecord {
        self.calls()
            .into_iter()
            .find(|c| c.key == key)
            .unwrap_or_else(|| panic!("{key} was never called"))
    }
}

#[async_trait]
impl ProviderDispatcher for ScriptedDispatcher {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn dispatch(
        &self,
        request: &ProviderRequest,
        _credentials: &Credentials,
    ) -> Result<TaskPayload, ProviderError> {
        let entered = Instant::now();
        let ProviderRequest::OpenAi(params) = request else {
            panic!("scripted dispatcher only handles OpenAi requests");
        };
        let behavior = self
            .behaviors
            .get(&params.prompt)
            .copied()
            .unwrap_or(Behavior::ok(0));

        tokio::time::sleep(Duration::from_millis(behavior.delay_ms)).await;

        self.calls.lock().unwrap().push(CallRecord {
            key: params.prompt.clone(),
            entered,
            exited: Instant::now(),
        });

        if behavior.succeed {
            Ok(TaskPayload::Text {
                content: format!("output of {}", params.prompt),
                model: "scripted".into(),
                citations: vec![],
            })
        } else {
            Err(ProviderError::Api {
                provider: request.provider(),
                status: 500,
                message: format!("{} exploded", params.prompt),
            })
        }
    }
}

/// A task whose prompt equals its id, so the scripted dispatcher can key on it.
pub fn task(id: &str) -> Task {
    Task::new(
        id,
        ProviderRequest::OpenAi(TextParams {
            prompt: id.to_string(),
            ..TextParams::default()
        }),
    )
}

pub fn task_after(id: &str, deps: &[&str]) -> Task {
    task(id).with_dependencies(deps.iter().copied())
}
