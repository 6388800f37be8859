// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-invocation run record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for one pipeline invocation.
    pub struct RunId("run-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Crashed,
}

crate::simple_display! {
    RunStatus {
        Running => "running",
        Completed => "completed",
        Crashed => "crashed",
    }
}

/// One site's scrape failure, recorded in [`PipelineRun::sites_failed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteFailure {
    pub site: String,
    pub error: String,
    pub stage: String,
}

/// Summary record for one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub sites_attempted: u32,
    pub sites_succeeded: u32,
    pub sites_failed: Vec<SiteFailure>,
    pub jobs_scraped: u32,
    pub jobs_new: u32,
    pub jobs_filtered_out: u32,
    pub jobs_scored: u32,
    pub jobs_above_threshold: u32,
    pub resumes_generated: u32,
    pub notifications_sent: u32,
    pub errors: Vec<String>,
    pub llm_providers_used: Vec<String>,
}

impl PipelineRun {
    pub fn new(run_id: RunId, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            completed_at: None,
            status: RunStatus::Running,
            sites_attempted: 0,
            sites_succeeded: 0,
            sites_failed: Vec::new(),
            jobs_scraped: 0,
            jobs_new: 0,
            jobs_filtered_out: 0,
            jobs_scored: 0,
            jobs_above_threshold: 0,
            resumes_generated: 0,
            notifications_sent: 0,
            errors: Vec::new(),
            llm_providers_used: Vec::new(),
        }
    }

    /// True when this run has anything worth surfacing in a health alert.
    pub fn needs_health_alert(&self) -> bool {
        !self.sites_failed.is_empty() || !self.errors.is_empty()
    }

    pub fn record_site_failure(&mut self, site: impl Into<String>, error: impl Into<String>, stage: impl Into<String>) {
        self.sites_failed.push(SiteFailure { site: site.into(), error: error.into(), stage: stage.into() });
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn finish(&mut self, status: RunStatus, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = Some(now);
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
