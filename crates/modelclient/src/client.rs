// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fallback-chain chat-completion client.
//!
//! Providers are tried in configured order. A provider that errors,
//! returns a non-2xx status, or returns an undecodable body is skipped in
//! favor of the next one. A provider whose body decodes but whose content
//! fails JSON-mode validation gets one same-provider retry with a
//! follow-up message demanding strict JSON before it, too, is skipped.

use crate::error::{ModelClientError, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// One endpoint in the fallback chain.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Stable tag stamped on `ScoredJob::provider` and surfaced in metrics.
    pub name: String,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// A completed call, attributed to the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    pub content: String,
    pub provider: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Whether the response content must parse as JSON.
    pub json_mode: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self { json_mode: false }
    }
}

/// Sends one chat-completion request to a single provider and returns its
/// raw response body. Implemented for real HTTP by [`ReqwestTransport`];
/// swappable in tests for a scripted fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        provider: &ProviderConfig,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError>;
}

/// Real transport: POSTs an OpenAI-shaped chat-completion request.
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { http: reqwest::Client::new(), timeout }
    }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        provider: &ProviderConfig,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", provider.base_url.trim_end_matches('/'));
        let body = ChatRequestBody { model: &provider.model, messages };

        let mut req = self.http.post(&url).json(&body);
        if let Some(key) = &provider.api_key {
            req = req.bearer_auth(key);
        }

        let response = tokio::time::timeout(self.timeout, req.send())
            .await
            .map_err(|_| ProviderError::Transport("request timed out".into()))?
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn extract_content(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Undecodable(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(ProviderError::MissingContent)
}

const STRICT_JSON_FOLLOWUP: &str =
    "Your previous reply was not valid JSON. Reply again with only valid JSON, no prose, no code fences.";

/// The fallback-chain client itself.
pub struct ModelClient {
    providers: Vec<ProviderConfig>,
    transport: Box<dyn Transport>,
    max_json_retries: u32,
}

impl ModelClient {
    pub fn new(providers: Vec<ProviderConfig>, transport: Box<dyn Transport>) -> Self {
        Self { providers, transport, max_json_retries: 1 }
    }

    pub fn with_max_json_retries(mut self, retries: u32) -> Self {
        self.max_json_retries = retries;
        self
    }

    /// Run the fallback chain for one completion request.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<CompletionResult, ModelClientError> {
        if self.providers.is_empty() {
            return Err(ModelClientError::NoProviders);
        }

        let mut failures = Vec::new();
        for provider in &self.providers {
            match self.try_provider(provider, messages, options).await {
                Ok(content) => {
                    return Ok(CompletionResult { content, provider: provider.name.clone() })
                }
                Err(e) => {
                    tracing::warn!(provider = %provider.name, error = %e, "model provider failed");
                    failures.push((provider.name.clone(), e));
                }
            }
        }
        Err(ModelClientError::AllProvidersFailed(failures))
    }

    async fn try_provider(
        &self,
        provider: &ProviderConfig,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, ProviderError> {
        let body = self.transport.send(provider, messages).await?;
        let content = extract_content(&body)?;

        if !options.json_mode || serde_json::from_str::<serde_json::Value>(&content).is_ok() {
            return Ok(content);
        }

        let mut retried = messages.to_vec();
        let mut last_content = content;
        for _ in 0..self.max_json_retries {
            retried.push(ChatMessage::user(last_content.clone()));
            retried.push(ChatMessage::user(STRICT_JSON_FOLLOWUP));
            let retry_body = self.transport.send(provider, &retried).await?;
            last_content = extract_content(&retry_body)?;
            if serde_json::from_str::<serde_json::Value>(&last_content).is_ok() {
                return Ok(last_content);
            }
        }
        Err(ProviderError::InvalidJson)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
