// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing inline-button callback payloads back into feedback actions.
//! The Notifier itself has no notion of a stored score —
//! callers enrich a [`FeedbackEvent`] with the job's score before
//! persisting a full `jh_core::Feedback` record.

use jh_core::{FeedbackAction, JobId};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEvent {
    pub job_id: JobId,
    pub action: FeedbackAction,
}

/// Parse a callback payload of the form `action:job_id`.
pub fn parse_callback_payload(payload: &str) -> Option<FeedbackEvent> {
    let (action_str, job_id_str) = payload.split_once(':')?;
    let action = FeedbackAction::parse(action_str)?;
    let job_id = JobId::from_hex(job_id_str)?;
    Some(FeedbackEvent { job_id, action })
}

#[cfg(test)]
#[path = "feedback_tests.rs"]
mod tests;
