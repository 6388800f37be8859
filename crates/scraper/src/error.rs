// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the Site Scraper Engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("selector extraction failed: {0}")]
    Extraction(String),
    #[error("strategy {0} is not supported")]
    UnsupportedStrategy(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
