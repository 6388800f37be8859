// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scorer: one Model Client call per job, JSON-mode, with a
//! fixed score/reasoning/concerns response shape.

use chrono::{DateTime, Utc};
use jh_core::{Job, ScoredJob};
use jh_modelclient::{ChatMessage, CompletionOptions, ModelClient};
use serde::Deserialize;

#[derive(Deserialize)]
struct ScoreResponse {
    score: i64,
    reasoning: String,
    #[serde(default)]
    concerns: Option<String>,
}

/// Truncate `text` to at most `budget` characters, logging when it does.
fn truncate(text: &str, budget: usize, field: &str, job_id: &str) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    tracing::debug!(job_id, field, budget, "truncating field for scoring prompt");
    text.chars().take(budget).collect()
}

fn build_prompt(job: &Job, master_resume: &str, weights: &str, char_budget: usize) -> Vec<ChatMessage> {
    let description = job.description.as_deref().unwrap_or("");
    let requirements = job.requirements.as_deref().unwrap_or("");
    let job_id = job.id.to_string();

    let prompt = format!(
        "Master resume:\n{master_resume}\n\nScoring weights:\n{weights}\n\nJob title: {title}\nCompany: {company}\nLocation: {location}\nDescription:\n{description}\nRequirements:\n{requirements}\n\nReply with only JSON: {{\"score\": int, \"reasoning\": string, \"concerns\": string?}}",
        title = job.title,
        company = job.company,
        location = job.location,
        description = truncate(description, char_budget, "description", &job_id),
        requirements = truncate(requirements, char_budget, "requirements", &job_id),
    );
    vec![ChatMessage::system("You are scoring how well a job listing matches a candidate profile."), ChatMessage::user(prompt)]
}

/// Score one job against the master résumé. Returns `None` if every model
/// provider in the chain fails — the caller records the error and
/// continues with the remaining jobs.
pub async fn score_job(
    client: &ModelClient,
    job: &Job,
    master_resume: &str,
    weights: &str,
    char_budget: usize,
    now: DateTime<Utc>,
) -> Option<ScoredJob> {
    let messages = build_prompt(job, master_resume, weights, char_budget);
    let result = match client.complete(&messages, CompletionOptions { json_mode: true }).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(job_id = %job.id, error = %e, "scoring failed for all providers");
            return None;
        }
    };

    let parsed: ScoreResponse = match serde_json::from_str(&result.content) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(job_id = %job.id, error = %e, "scorer response was not the expected shape");
            return None;
        }
    };

    let (score, clamped) = ScoredJob::clamp_score(parsed.score);
    if clamped {
        tracing::warn!(job_id = %job.id, raw_score = parsed.score, "model score out of range, clamped to [0,100]");
    }

    let reasoning = match parsed.concerns {
        Some(concerns) if !concerns.is_empty() => format!("{}\n\nConcerns: {concerns}", parsed.reasoning),
        _ => parsed.reasoning,
    };

    Some(ScoredJob { job_id: job.id, score, reasoning, provider: result.provider, scored_at: now })
}

#[cfg(test)]
#[path = "scoring_tests.rs"]
mod tests;
