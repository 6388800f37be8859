// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only fakes shared across this crate's unit tests.

use async_trait::async_trait;
use jh_modelclient::{ChatMessage, ProviderConfig, ProviderError, Transport};
use parking_lot::Mutex;

/// A [`Transport`] that replays a fixed queue of responses, one per call,
/// regardless of which provider is addressed. Panics if the queue runs dry
/// so a test's expectations are explicit.
pub struct QueuedTransport {
    responses: Mutex<Vec<Result<String, ProviderError>>>,
}

impl QueuedTransport {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self { responses: Mutex::new(responses) }
    }
}

#[async_trait]
impl Transport for QueuedTransport {
    async fn send(&self, _provider: &ProviderConfig, _messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            panic!("QueuedTransport queue exhausted");
        }
        responses.remove(0)
    }
}

pub fn single_provider() -> ProviderConfig {
    ProviderConfig { name: "primary".into(), base_url: "https://primary.example".into(), model: "test-model".into(), api_key: None }
}

pub fn ok_completion_body(content: &str) -> String {
    format!(r#"{{"choices":[{{"message":{{"role":"assistant","content":{content:?}}}}}]}}"#)
}
