// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyword Filter: three ordered, case-insensitive
//! substring rules applied per job against its effective keyword config.

use jh_core::{Job, KeywordConfig};

/// Why a job was rejected, for debug logging. Not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NoRequiredKeyword,
    HasExcludedKeyword(String),
    TitleMissingRoleKeyword,
}

impl RejectReason {
    pub fn as_code(&self) -> String {
        match self {
            Self::NoRequiredKeyword => "no_required_keyword".to_string(),
            Self::HasExcludedKeyword(kw) => format!("has_excluded_keyword:{kw}"),
            Self::TitleMissingRoleKeyword => "title_missing_role_keyword".to_string(),
        }
    }
}

fn contains_substring(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Evaluate one job against its effective keyword config.
pub fn evaluate(job: &Job, keywords: &KeywordConfig) -> Result<(), RejectReason> {
    let text = format!(
        "{} {} {}",
        job.title,
        job.description.as_deref().unwrap_or(""),
        job.requirements.as_deref().unwrap_or("")
    )
    .to_lowercase();

    if !keywords.must_have_any.is_empty() && !keywords.must_have_any.iter().any(|kw| contains_substring(&text, kw)) {
        return Err(RejectReason::NoRequiredKeyword);
    }

    if let Some(excluded) = keywords.must_not_have.iter().find(|kw| contains_substring(&text, kw)) {
        return Err(RejectReason::HasExcludedKeyword(excluded.clone()));
    }

    let title_lower = job.title.to_lowercase();
    if !keywords.title_must_have_any.is_empty()
        && !keywords.title_must_have_any.iter().any(|kw| contains_substring(&title_lower, kw))
    {
        return Err(RejectReason::TitleMissingRoleKeyword);
    }

    Ok(())
}

/// Filter a batch of jobs, logging each rejection at debug.
pub fn filter_jobs(jobs: Vec<Job>, keywords: &KeywordConfig) -> Vec<Job> {
    jobs.into_iter()
        .filter(|job| match evaluate(job, keywords) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(job_id = %job.id, reason = %reason.as_code(), "job rejected by keyword filter");
                false
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "keyword_tests.rs"]
mod tests;
