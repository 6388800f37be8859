// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification routing and message formatting.

use jh_core::{JobId, NotificationChannel};

/// Configurable score bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub instant: u8,
    pub digest: u8,
    pub log: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { instant: 80, digest: 60, log: 40 }
    }
}

pub fn channel_for_score(score: u8, thresholds: &Thresholds) -> NotificationChannel {
    if score >= thresholds.instant {
        NotificationChannel::Instant
    } else if score >= thresholds.digest {
        NotificationChannel::Digest
    } else if score >= thresholds.log {
        NotificationChannel::Log
    } else {
        NotificationChannel::Discarded
    }
}

/// Everything the Notifier needs to route and render one scored job.
#[derive(Debug, Clone)]
pub struct JobNotice {
    pub job_id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub score: u8,
    pub reasoning: String,
    pub resume_pdf_path: Option<String>,
    /// Descriptions of prior Applications at the same company, excluding
    /// the record just created for this job (the pre-notification
    /// cross-check).
    pub prior_applications_at_company: Vec<String>,
}

pub fn format_instant_message(notice: &JobNotice) -> String {
    let mut text = format!(
        "{} — {} ({})\nScore: {}\n{}\n{}",
        notice.title, notice.company, notice.location, notice.score, notice.reasoning, notice.url
    );
    if let Some(path) = &notice.resume_pdf_path {
        text.push_str(&format!("\nTailored résumé: {path}"));
    }
    if !notice.prior_applications_at_company.is_empty() {
        text.push_str("\n\nPrior applications at this company:\n");
        for entry in &notice.prior_applications_at_company {
            text.push_str(&format!("- {entry}\n"));
        }
    }
    text
}

pub fn format_digest_entry(notice: &JobNotice) -> String {
    format!(
        "{} — {} ({})  score {}\n{}\n",
        notice.title, notice.company, notice.location, notice.score, notice.url
    )
}

/// The job id is embedded in each button's callback payload as
/// `action:job_id`; `Skip` and `Not Relevant` map to the
/// feedback action variants parsed back out in [`crate::feedback`].
pub fn instant_message_buttons(job_id: JobId) -> Vec<(String, String)> {
    vec![
        ("Applied".to_string(), format!("applied:{job_id}")),
        ("Skip".to_string(), format!("skip:{job_id}")),
        ("Not Relevant".to_string(), format!("not_relevant:{job_id}")),
    ]
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
