// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Checkpoint Log: a small JSON file recording which pipeline stages
//! have completed for the current run, so a crashed or interrupted run can
//! resume without redoing finished work.

use crate::error::CheckpointError;
use chrono::{DateTime, Utc};
use jh_core::JobId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointStatus {
    Running,
    Completed,
    Crashed,
}

/// Durable run state, rewritten atomically after each stage completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointLog {
    pub run_id: String,
    pub status: CheckpointStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    /// Stage names that ran to completion this run, in the order they
    /// finished (`poll_feedback`, `scrape`, `dedup`, `keyword_filter`,
    /// `score`, `tailor`, `notify`, `finalize`).
    pub completed_stages: Vec<String>,
    /// Sites whose scrape stage finished, so resume can skip re-scraping
    /// sites that already produced jobs this run.
    pub scraped_sites: Vec<String>,
    pub scored_jobs: Vec<JobId>,
    pub tailored_jobs: Vec<JobId>,
    pub notified_jobs: Vec<JobId>,
}

impl CheckpointLog {
    pub fn new(run_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: run_id.into(),
            status: CheckpointStatus::Running,
            started_at,
            completed_at: None,
            updated_at: started_at,
            completed_stages: Vec::new(),
            scraped_sites: Vec::new(),
            scored_jobs: Vec::new(),
            tailored_jobs: Vec::new(),
            notified_jobs: Vec::new(),
        }
    }

    /// Load a checkpoint from `path`, returning `None` if the file doesn't
    /// exist (first run, or a prior run completed and was cleared).
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, CheckpointError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Atomically rewrite the checkpoint: write to a sibling temp file and
    /// rename over the target, so a crash mid-write never leaves a
    /// truncated or partially-written log behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = tmp_path_for(path);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn mark_stage_complete(&mut self, stage: impl Into<String>, now: DateTime<Utc>) {
        let stage = stage.into();
        if !self.completed_stages.contains(&stage) {
            self.completed_stages.push(stage);
        }
        self.updated_at = now;
    }

    pub fn is_stage_complete(&self, stage: &str) -> bool {
        self.completed_stages.iter().any(|s| s == stage)
    }

    pub fn mark_site_scraped(&mut self, site: impl Into<String>, now: DateTime<Utc>) {
        let site = site.into();
        if !self.scraped_sites.contains(&site) {
            self.scraped_sites.push(site);
        }
        self.updated_at = now;
    }

    pub fn is_site_scraped(&self, site: &str) -> bool {
        self.scraped_sites.iter().any(|s| s == site)
    }

    pub fn mark_scored(&mut self, job_id: JobId, now: DateTime<Utc>) {
        if !self.scored_jobs.contains(&job_id) {
            self.scored_jobs.push(job_id);
        }
        self.updated_at = now;
    }

    pub fn is_scored(&self, job_id: JobId) -> bool {
        self.scored_jobs.contains(&job_id)
    }

    pub fn mark_tailored(&mut self, job_id: JobId, now: DateTime<Utc>) {
        if !self.tailored_jobs.contains(&job_id) {
            self.tailored_jobs.push(job_id);
        }
        self.updated_at = now;
    }

    pub fn is_tailored(&self, job_id: JobId) -> bool {
        self.tailored_jobs.contains(&job_id)
    }

    pub fn mark_notified(&mut self, job_id: JobId, now: DateTime<Utc>) {
        if !self.notified_jobs.contains(&job_id) {
            self.notified_jobs.push(job_id);
        }
        self.updated_at = now;
    }

    pub fn is_notified(&self, job_id: JobId) -> bool {
        self.notified_jobs.contains(&job_id)
    }

    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.status = CheckpointStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    pub fn crash(&mut self, now: DateTime<Utc>) {
        self.status = CheckpointStatus::Crashed;
        self.updated_at = now;
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
