// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

#[test]
fn new_run_starts_running_with_zero_counters() {
    let run = PipelineRun::new(RunId::new(), Utc::now());
    assert_eq!(run.status, RunStatus::Running);
    assert_eq!(run.jobs_scraped, 0);
    assert!(!run.needs_health_alert());
}

#[test]
fn needs_health_alert_on_site_failure() {
    let mut run = PipelineRun::new(RunId::new(), Utc::now());
    run.record_site_failure("site1", "HTTP 500", "scrape");
    assert!(run.needs_health_alert());
}

#[test]
fn needs_health_alert_on_error() {
    let mut run = PipelineRun::new(RunId::new(), Utc::now());
    run.record_error("model call failed for job abc");
    assert!(run.needs_health_alert());
}

#[test]
fn finish_sets_status_and_completed_at() {
    let mut run = PipelineRun::new(RunId::new(), Utc::now());
    let now = Utc::now();
    run.finish(RunStatus::Completed, now);
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.completed_at, Some(now));
}
