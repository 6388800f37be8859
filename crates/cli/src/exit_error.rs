// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<crate::config::ConfigError> for ExitError {
    fn from(e: crate::config::ConfigError) -> Self {
        Self::new(2, e.to_string())
    }
}

impl From<jh_pipeline::PipelineError> for ExitError {
    fn from(e: jh_pipeline::PipelineError) -> Self {
        Self::new(1, e.to_string())
    }
}

impl From<jh_storage::StoreError> for ExitError {
    fn from(e: jh_storage::StoreError) -> Self {
        Self::new(1, e.to_string())
    }
}

impl From<jh_storage::CheckpointError> for ExitError {
    fn from(e: jh_storage::CheckpointError) -> Self {
        Self::new(1, e.to_string())
    }
}

impl From<std::io::Error> for ExitError {
    fn from(e: std::io::Error) -> Self {
        Self::new(1, e.to_string())
    }
}
