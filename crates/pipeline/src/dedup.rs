// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dedup Filter: hash-based prior-seen elimination. Runs
//! once scraping has joined across all sites — no state shared between
//! concurrent scrape workers.

use chrono::{DateTime, Utc};
use jh_core::Job;
use jh_storage::{Store, StoreError};

/// Insert each job's JobId into the seen-hash set in order, keeping only
/// jobs seen for the first time. A job already in the store (from this run
/// or a prior one) is dropped, not an error.
pub fn dedup_jobs(store: &Store, jobs: Vec<Job>, now: DateTime<Utc>) -> Result<Vec<Job>, StoreError> {
    let mut fresh = Vec::with_capacity(jobs.len());
    for job in jobs {
        store.insert_job(&job)?;
        if store.mark_seen(job.id, now)? {
            fresh.push(job);
        }
    }
    Ok(fresh)
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
