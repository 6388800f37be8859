// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the Run Orchestrator and its stages.

use thiserror::Error;

/// Errors that abort the whole run. Everything else —
/// a single site's scrape, a single job's model call — is quarantined into
/// the run's error list instead of propagating here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("master resume file unreadable: {0}")]
    MasterResumeUnreadable(String),
    #[error("configuration file unreadable: {0}")]
    ConfigUnreadable(String),
    #[error("persistent store error: {0}")]
    Store(#[from] jh_storage::StoreError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] jh_storage::CheckpointError),
}
