// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Résumé Tailor + Verifier: a bounded tailor/verify loop
//! followed by PDF rendering through an external collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jh_core::{Job, TailoredResume};
use jh_modelclient::{ChatMessage, CompletionOptions, ModelClient};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const MAX_TAILOR_ATTEMPTS: u32 = 3;
const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to spawn renderer: {0}")]
    Spawn(String),
    #[error("renderer timed out")]
    Timeout,
    #[error("renderer exited with status {0}")]
    NonZeroExit(i32),
}

/// Renders tailored HTML to a PDF file on disk. Implemented for real use by
/// [`ExternalRenderer`], which shells out to a configured command; swappable
/// in tests for [`FakeResumeRenderer`].
#[async_trait]
pub trait ResumeRenderer: Send + Sync {
    async fn render(&self, html: &str, pdf_path: &Path) -> Result<(), RenderError>;
}

/// Shells out to an external HTML-to-PDF binary (e.g. a headless-Chromium
/// wrapper or `wkhtmltopdf`), invoked as `{command} {html_path} {pdf_path}`.
pub struct ExternalRenderer {
    command: String,
}

impl ExternalRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

#[async_trait]
impl ResumeRenderer for ExternalRenderer {
    async fn render(&self, html: &str, pdf_path: &Path) -> Result<(), RenderError> {
        let html_path = pdf_path.with_extension("html");
        tokio::fs::write(&html_path, html).await.map_err(|e| RenderError::Spawn(e.to_string()))?;

        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.arg(&html_path).arg(pdf_path);

        let output = tokio::time::timeout(RENDER_TIMEOUT, cmd.output())
            .await
            .map_err(|_| RenderError::Timeout)?
            .map_err(|e| RenderError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(RenderError::NonZeroExit(output.status.code().unwrap_or(-1)));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct VerifyResponse {
    pass: bool,
    #[serde(default)]
    issues: Vec<String>,
}

fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.trim_start_matches(|c: char| c.is_alphabetic());
        let rest = rest.strip_suffix("```").unwrap_or(rest);
        return rest.trim().to_string();
    }
    trimmed.to_string()
}

fn tailor_prompt(job: &Job, master_resume: &str) -> Vec<ChatMessage> {
    let system = "You tailor a candidate's master resume into body HTML for one job listing. \
        Emit HTML fragments only, no outer <html>/<body> tags. Never invent experience, skills, \
        or credentials absent from the master resume.";
    let user = format!(
        "Master resume:\n{master_resume}\n\nJob title: {}\nCompany: {}\nDescription:\n{}\nRequirements:\n{}",
        job.title,
        job.company,
        job.description.as_deref().unwrap_or(""),
        job.requirements.as_deref().unwrap_or(""),
    );
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

fn verify_prompt(master_resume: &str, tailored_html: &str) -> Vec<ChatMessage> {
    let system = "You verify a tailored resume against a candidate's master resume. Flag \
        fabricated skills, inflated metrics, mismatched companies/roles/dates, or missing \
        essential contact info. Reply with only JSON: {\"pass\": bool, \"issues\": string[]}.";
    let user = format!("Master resume:\n{master_resume}\n\nTailored resume HTML:\n{tailored_html}");
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Résumé filename: `{company}_{title}_{firstN(job_id)}.pdf`.
fn resume_filename(job: &Job) -> String {
    let sanitize = |s: &str| s.chars().map(|c| if c.is_alphanumeric() { c } else { '_' }).collect::<String>();
    format!("{}_{}_{}.pdf", sanitize(&job.company), sanitize(&job.title), job.id.short(8))
}

/// Tailor and verify a résumé for one job, up to [`MAX_TAILOR_ATTEMPTS`]
/// attempts. Returns `None` if verification never passes — the caller
/// records the error and the job may still be notified without an
/// attachment.
#[allow(clippy::too_many_arguments)]
pub async fn tailor_job(
    client: &ModelClient,
    renderer: &dyn ResumeRenderer,
    job: &Job,
    master_resume: &str,
    output_dir: &Path,
    run_id: &str,
    now: DateTime<Utc>,
) -> Option<TailoredResume> {
    let prompt = tailor_prompt(job, master_resume);

    for attempt in 1..=MAX_TAILOR_ATTEMPTS {
        let tailor_result = match client.complete(&prompt, CompletionOptions { json_mode: false }).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(job_id = %job.id, attempt, error = %e, "resume tailoring call failed");
                continue;
            }
        };
        let html = strip_code_fences(&tailor_result.content);

        let verify_result = match client
            .complete(&verify_prompt(master_resume, &html), CompletionOptions { json_mode: true })
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(job_id = %job.id, attempt, error = %e, "resume verification call failed");
                continue;
            }
        };

        let verdict: VerifyResponse = match serde_json::from_str(&verify_result.content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(job_id = %job.id, attempt, error = %e, "verifier response was not the expected shape");
                continue;
            }
        };

        if !verdict.pass {
            tracing::debug!(job_id = %job.id, attempt, issues = ?verdict.issues, "tailored resume failed verification");
            continue;
        }

        let filename = resume_filename(job);
        let pdf_path: PathBuf = output_dir.join(&filename);
        if let Err(e) = renderer.render(&html, &pdf_path).await {
            tracing::warn!(job_id = %job.id, attempt, error = %e, "resume pdf rendering failed");
            continue;
        }

        return Some(TailoredResume {
            job_id: job.id,
            html_path: pdf_path.with_extension("html").to_string_lossy().into_owned(),
            pdf_path: pdf_path.to_string_lossy().into_owned(),
            verified: true,
            verification_issues: Vec::new(),
            generated_at: now,
            run_id: run_id.to_string(),
        });
    }

    tracing::warn!(job_id = %job.id, "resume tailoring gave up after max attempts");
    None
}

/// Test-only [`ResumeRenderer`] that records calls instead of shelling out.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeResumeRenderer {
    pub fail_next: std::sync::atomic::AtomicBool,
    pub rendered: parking_lot::Mutex<Vec<PathBuf>>,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeResumeRenderer {
    fn default() -> Self {
        Self { fail_next: std::sync::atomic::AtomicBool::new(false), rendered: parking_lot::Mutex::new(Vec::new()) }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl FakeResumeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_render(&self) {
        self.fail_next.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn rendered_paths(&self) -> Vec<PathBuf> {
        self.rendered.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl ResumeRenderer for FakeResumeRenderer {
    async fn render(&self, _html: &str, pdf_path: &Path) -> Result<(), RenderError> {
        if self.fail_next.swap(false, std::sync::atomic::Ordering::SeqCst) {
            return Err(RenderError::NonZeroExit(1));
        }
        self.rendered.lock().push(pdf_path.to_path_buf());
        Ok(())
    }
}

/// Configuration the orchestrator threads through to [`tailor_job`].
pub struct TailorConfig {
    pub master_resume: String,
    pub output_dir: PathBuf,
}

#[cfg(test)]
#[path = "tailor_tests.rs"]
mod tests;
