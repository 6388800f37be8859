// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the Model Client.

use thiserror::Error;

/// One provider's failure within a call attempt. Carried for diagnostics;
/// the client itself only ever surfaces [`ModelClientError`] to callers.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("response body was not decodable: {0}")]
    Undecodable(String),
    #[error("response body was missing the expected content path")]
    MissingContent,
    #[error("response content was not valid JSON after retry")]
    InvalidJson,
}

#[derive(Debug, Error)]
pub enum ModelClientError {
    #[error("no providers configured")]
    NoProviders,
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<(String, ProviderError)>),
}
