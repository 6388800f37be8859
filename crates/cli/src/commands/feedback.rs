// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jobhunter feedback`: record feedback for a job outside of Telegram's
//! inline buttons.

use crate::config::Settings;
use crate::exit_error::ExitError;
use jh_core::{Feedback, FeedbackAction, JobId};
use jh_storage::Store;
use std::path::Path;

pub async fn handle(config_dir: &Path, job_id: &str, action: &str, reason: Option<String>) -> Result<(), ExitError> {
    let settings = Settings::load(config_dir)?;

    let job_id = JobId::from_hex(job_id).ok_or_else(|| ExitError::new(2, format!("not a valid job id: {job_id}")))?;
    let action = FeedbackAction::parse(action)
        .ok_or_else(|| ExitError::new(2, format!("unknown feedback action: {action} (expected applied, skip, or not_relevant)")))?;

    let store = Store::open(settings.data_dir.join("jobhunter.db"))?;
    let score = store.get_score(job_id)?.map(|s| s.score).unwrap_or(0);
    let now = chrono::Utc::now();

    store.insert_feedback(&Feedback { job_id, score, action, reason, timestamp: now })?;
    store.update_application_status(job_id, action.target_status(), now)?;

    println!("recorded {action} for {job_id}");
    Ok(())
}
