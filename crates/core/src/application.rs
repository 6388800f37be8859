// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scored jobs, tailored résumés, applications, and feedback.

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for an [`Application`] record.
    pub struct ApplicationId("app-");
}

/// A job scored against the candidate profile. At most one per job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    pub job_id: JobId,
    /// Clamped to `[0, 100]`.
    pub score: u8,
    pub reasoning: String,
    /// Origin tag of the model endpoint that produced this score.
    pub provider: String,
    pub scored_at: DateTime<Utc>,
}

impl ScoredJob {
    /// Clamp a raw model score into `[0, 100]`, returning whether clamping
    /// occurred so callers can log a warning.
    pub fn clamp_score(raw: i64) -> (u8, bool) {
        let clamped = raw.clamp(0, 100);
        (clamped as u8, clamped != raw)
    }
}

/// A tailored résumé rendered for one job. At most one per job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub job_id: JobId,
    pub html_path: String,
    pub pdf_path: String,
    pub verified: bool,
    pub verification_issues: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub run_id: String,
}

impl TailoredResume {
    /// `verified` implies `verification_issues` is empty.
    pub fn is_consistent(&self) -> bool {
        !self.verified || self.verification_issues.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Matched,
    Applied,
    PhoneScreen,
    Interview,
    Offer,
    Rejected,
    Withdrawn,
    Expired,
}

crate::simple_display! {
    ApplicationStatus {
        Matched => "matched",
        Applied => "applied",
        PhoneScreen => "phone_screen",
        Interview => "interview",
        Offer => "offer",
        Rejected => "rejected",
        Withdrawn => "withdrawn",
        Expired => "expired",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub company: String,
    pub role: String,
    pub country: String,
    pub applied_date: Option<DateTime<Utc>>,
    pub resume_version: Option<String>,
    pub status: ApplicationStatus,
    pub status_updated: DateTime<Utc>,
    pub notes: Option<String>,
    pub source_site: String,
}

impl Application {
    /// Created in `matched` state by the pipeline.
    pub fn new_matched(
        job_id: JobId,
        company: impl Into<String>,
        role: impl Into<String>,
        country: impl Into<String>,
        source_site: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ApplicationId::new(),
            job_id,
            company: company.into(),
            role: role.into(),
            country: country.into(),
            applied_date: None,
            resume_version: None,
            status: ApplicationStatus::Matched,
            status_updated: now,
            notes: None,
            source_site: source_site.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAction {
    Applied,
    Skipped,
    NotRelevant,
}

crate::simple_display! {
    FeedbackAction {
        Applied => "applied",
        Skipped => "skipped",
        NotRelevant => "not_relevant",
    }
}

impl FeedbackAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "applied" => Some(Self::Applied),
            "skipped" | "skip" => Some(Self::Skipped),
            "not_relevant" => Some(Self::NotRelevant),
            _ => None,
        }
    }

    /// The [`ApplicationStatus`] a feedback action transitions an
    /// application to.
    pub fn target_status(&self) -> ApplicationStatus {
        match self {
            Self::Applied => ApplicationStatus::Applied,
            Self::Skipped | Self::NotRelevant => ApplicationStatus::Rejected,
        }
    }
}

/// Append-only feedback record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub job_id: JobId,
    pub score: u8,
    pub action: FeedbackAction,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
#[path = "application_tests.rs"]
mod tests;
