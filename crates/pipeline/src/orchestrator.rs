// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Run Orchestrator: owns the stage graph
//! `poll-feedback → scrape → dedup → keyword-filter → score → tailor →
//! notify → finalize`, the Checkpoint Log's resume bookkeeping, and the
//! per-item isolation that keeps one site's or job's failure from
//! interrupting its siblings. Grounded on the per-effect dispatch loop in
//! `engine/src/executor.rs`: each item is processed behind its own
//! match/continue so a single failure quarantines into the run record
//! instead of aborting the batch.

use crate::error::PipelineError;
use crate::tailor::ResumeRenderer;
use crate::{dedup, keyword, scoring, tailor};
use chrono::{DateTime, Utc};
use jh_core::{
    Application, Feedback, Job, JobId, KeywordConfig, NotificationChannel, NotificationRecord,
    PipelineRun, RunId, RunStatus, ScoredJob, SiteConfig,
};
use jh_modelclient::ModelClient;
use jh_notifier::{JobNotice, MessageTransport, Notifier};
use jh_storage::{CheckpointLog, CheckpointStatus, Store};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// The minimum score at which résumé tailoring is triggered.
/// Distinct from the Notifier's own
/// instant/digest/log bands.
#[derive(Debug, Clone, Copy)]
pub struct StageThresholds {
    pub tailor_score_threshold: u8,
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self { tailor_score_threshold: 60 }
    }
}

pub struct OrchestratorConfig {
    pub sites: Vec<SiteConfig>,
    pub keywords: KeywordConfig,
    pub master_resume: String,
    pub weights: String,
    pub char_budget: usize,
    pub thresholds: StageThresholds,
    pub archive_root: PathBuf,
    pub output_dir: PathBuf,
    pub checkpoint_path: PathBuf,
    /// Run scrape/dedup/keyword-filter/score only; skip tailor/notify and
    /// leave the checkpoint at the `score` stage so a later non-dry run
    /// resumes and finishes the rest.
    pub dry_run: bool,
}

/// Ties the stage functions to a concrete Store, Model Client, Notifier,
/// and résumé renderer for one pipeline invocation.
pub struct Orchestrator<T: MessageTransport> {
    store: Store,
    http: reqwest::Client,
    model_client: ModelClient,
    notifier: Notifier<T>,
    renderer: Box<dyn ResumeRenderer>,
    config: OrchestratorConfig,
}

impl<T: MessageTransport> Orchestrator<T> {
    pub fn new(
        store: Store,
        http: reqwest::Client,
        model_client: ModelClient,
        notifier: Notifier<T>,
        renderer: Box<dyn ResumeRenderer>,
        config: OrchestratorConfig,
    ) -> Self {
        Self { store, http, model_client, notifier, renderer, config }
    }

    /// Run one full pipeline invocation: resume a running checkpoint if
    /// one exists, otherwise start a fresh run_id.
    pub async fn run(&mut self, now: DateTime<Utc>) -> Result<PipelineRun, PipelineError> {
        let mut checkpoint = match CheckpointLog::load(&self.config.checkpoint_path)? {
            Some(cp) if cp.status == CheckpointStatus::Running => cp,
            _ => CheckpointLog::new(RunId::new().to_string(), now),
        };
        let run_id = checkpoint.run_id.clone();
        let mut run = self
            .store
            .get_run(&run_id)?
            .unwrap_or_else(|| PipelineRun::new(RunId::from_string(&run_id), now));

        match self.run_stages(&run_id, &mut checkpoint, &mut run, now).await {
            Ok(()) => {
                run.finish(RunStatus::Completed, now);
                if !self.config.dry_run {
                    checkpoint.complete(now);
                }
            }
            Err(e) => {
                tracing::error!(run_id = %run_id, error = %e, "run aborted by catastrophic error");
                run.record_error(e.to_string());
                run.finish(RunStatus::Crashed, now);
                checkpoint.crash(now);
                checkpoint.save(&self.config.checkpoint_path)?;
                self.store.upsert_run(&run)?;
                if run.needs_health_alert() {
                    if let Err(alert_err) = self.notifier.send_crash_alert(&e.to_string()).await {
                        tracing::warn!(error = %alert_err, "failed to send crash alert");
                    }
                }
                return Err(e);
            }
        }

        checkpoint.save(&self.config.checkpoint_path)?;
        self.store.upsert_run(&run)?;
        if run.needs_health_alert() {
            if let Err(e) = self.notifier.send_health_alert(run.sites_failed.len(), run.errors.len()).await {
                tracing::warn!(error = %e, "failed to send health alert");
            }
        }
        Ok(run)
    }

    async fn run_stages(
        &mut self,
        run_id: &str,
        checkpoint: &mut CheckpointLog,
        run: &mut PipelineRun,
        now: DateTime<Utc>,
    ) -> Result<(), PipelineError> {
        if !checkpoint.is_stage_complete("poll_feedback") {
            self.stage_poll_feedback(now).await?;
            checkpoint.mark_stage_complete("poll_feedback", now);
            checkpoint.save(&self.config.checkpoint_path)?;
        }

        let candidate_jobs = self.stage_scrape(run_id, checkpoint, run, now).await?;
        checkpoint.mark_stage_complete("scrape", now);
        checkpoint.mark_stage_complete("dedup", now);
        checkpoint.save(&self.config.checkpoint_path)?;

        let jobs_by_id: HashMap<JobId, Job> = candidate_jobs.iter().cloned().map(|j| (j.id, j)).collect();
        let filtered = self.stage_keyword_filter(candidate_jobs, run);
        checkpoint.mark_stage_complete("keyword_filter", now);
        checkpoint.save(&self.config.checkpoint_path)?;

        let scored = self.stage_score(filtered, checkpoint, run, now).await?;
        checkpoint.mark_stage_complete("score", now);
        checkpoint.save(&self.config.checkpoint_path)?;

        if self.config.dry_run {
            return Ok(());
        }

        self.stage_tailor(&scored, &jobs_by_id, checkpoint, run, now).await?;
        checkpoint.mark_stage_complete("tailor", now);
        checkpoint.save(&self.config.checkpoint_path)?;

        self.stage_notify(&scored, &jobs_by_id, checkpoint, run, now).await?;
        checkpoint.mark_stage_complete("notify", now);
        checkpoint.mark_stage_complete("finalize", now);
        checkpoint.save(&self.config.checkpoint_path)?;

        Ok(())
    }

    /// Stage 0: drain pending feedback callbacks.
    async fn stage_poll_feedback(&mut self, now: DateTime<Utc>) -> Result<(), PipelineError> {
        let events = self.notifier.poll_feedback().await;
        for event in events {
            let score = self.store.get_score(event.job_id)?.map(|s| s.score).unwrap_or(0);
            let feedback = Feedback { job_id: event.job_id, score, action: event.action, reason: None, timestamp: now };
            self.store.insert_feedback(&feedback)?;
            self.store.update_application_status(event.job_id, event.action.target_status(), now)?;
        }
        Ok(())
    }

    /// Scrape stage + Dedup Filter, with the
    /// resume skip rule: already-scraped sites are re-read from the store
    /// instead of re-scraped.
    async fn stage_scrape(
        &mut self,
        run_id: &str,
        checkpoint: &mut CheckpointLog,
        run: &mut PipelineRun,
        now: DateTime<Utc>,
    ) -> Result<Vec<Job>, PipelineError> {
        let to_scrape: Vec<SiteConfig> = self
            .config
            .sites
            .iter()
            .filter(|s| s.enabled && !checkpoint.is_site_scraped(&s.site_id))
            .cloned()
            .collect();
        let already_scraped: HashSet<String> = self
            .config
            .sites
            .iter()
            .filter(|s| s.enabled && checkpoint.is_site_scraped(&s.site_id))
            .map(|s| s.site_id.clone())
            .collect();

        let mut candidate_jobs = Vec::new();

        if !to_scrape.is_empty() {
            let outcome = jh_scraper::scrape_all(&self.http, &to_scrape, run_id, now, &self.config.archive_root).await;

            run.sites_attempted += to_scrape.len() as u32;
            let failed_sites: HashSet<&str> = outcome.failures.iter().map(|f| f.site.as_str()).collect();
            run.sites_succeeded += to_scrape.iter().filter(|s| !failed_sites.contains(s.site_id.as_str())).count() as u32;
            for failure in &outcome.failures {
                tracing::warn!(site = %failure.site, stage = %failure.stage, error = %failure.error, "site scrape quarantined");
                run.record_site_failure(failure.site.clone(), failure.error.clone(), failure.stage.clone());
            }
            run.jobs_scraped += outcome.jobs.len() as u32;

            let fresh = dedup::dedup_jobs(&self.store, outcome.jobs, now)?;
            run.jobs_new += fresh.len() as u32;
            candidate_jobs.extend(fresh);

            for site in &to_scrape {
                checkpoint.mark_site_scraped(&site.site_id, now);
            }
        }

        if !already_scraped.is_empty() {
            let prior = self.store.jobs_for_run(run_id)?;
            candidate_jobs.extend(prior.into_iter().filter(|j| already_scraped.contains(&j.site_id)));
        }

        Ok(candidate_jobs)
    }

    /// Keyword Filter stage, using each job's effective
    /// per-site keyword config.
    fn stage_keyword_filter(&self, jobs: Vec<Job>, run: &mut PipelineRun) -> Vec<Job> {
        let site_map: HashMap<&str, &SiteConfig> = self.config.sites.iter().map(|s| (s.site_id.as_str(), s)).collect();
        let before = jobs.len();

        let kept: Vec<Job> = jobs
            .into_iter()
            .filter(|job| {
                let site_override = site_map.get(job.site_id.as_str()).and_then(|s| s.keywords.as_ref());
                let effective = self.config.keywords.effective(site_override);
                match keyword::evaluate(job, &effective) {
                    Ok(()) => true,
                    Err(reason) => {
                        tracing::debug!(job_id = %job.id, reason = %reason.as_code(), "job rejected by keyword filter");
                        false
                    }
                }
            })
            .collect();

        run.jobs_filtered_out += (before - kept.len()) as u32;
        kept
    }

    /// Score stage, skipping jobs already scored this run.
    async fn stage_score(
        &mut self,
        jobs: Vec<Job>,
        checkpoint: &mut CheckpointLog,
        run: &mut PipelineRun,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredJob>, PipelineError> {
        let mut scored = Vec::with_capacity(jobs.len());

        for job in &jobs {
            if checkpoint.is_scored(job.id) {
                if let Some(existing) = self.store.get_score(job.id)? {
                    scored.push(existing);
                }
                continue;
            }

            match scoring::score_job(&self.model_client, job, &self.config.master_resume, &self.config.weights, self.config.char_budget, now).await {
                Some(result) => {
                    self.store.insert_score(&result)?;
                    checkpoint.mark_scored(job.id, now);
                    if !run.llm_providers_used.contains(&result.provider) {
                        run.llm_providers_used.push(result.provider.clone());
                    }
                    run.jobs_scored += 1;
                    scored.push(result);
                }
                None => {
                    run.record_error(format!("scoring failed for job {}", job.id));
                }
            }
        }

        Ok(scored)
    }

    /// Tailor + Verify stage, skipping jobs already
    /// tailored this run. Only jobs at or above the scoring threshold are
    /// considered.
    async fn stage_tailor(
        &mut self,
        scored: &[ScoredJob],
        jobs_by_id: &HashMap<JobId, Job>,
        checkpoint: &mut CheckpointLog,
        run: &mut PipelineRun,
        now: DateTime<Utc>,
    ) -> Result<(), PipelineError> {
        for score in scored {
            if score.score < self.config.thresholds.tailor_score_threshold {
                continue;
            }
            run.jobs_above_threshold += 1;

            if checkpoint.is_tailored(score.job_id) {
                continue;
            }
            let Some(job) = jobs_by_id.get(&score.job_id) else {
                continue;
            };

            match tailor::tailor_job(
                &self.model_client,
                self.renderer.as_ref(),
                job,
                &self.config.master_resume,
                &self.config.output_dir,
                run.run_id.as_str(),
                now,
            )
            .await
            {
                Some(resume) => {
                    self.store.insert_resume(&resume)?;
                    checkpoint.mark_tailored(score.job_id, now);
                    run.resumes_generated += 1;
                }
                None => {
                    run.record_error(format!("resume tailoring gave up for job {}", score.job_id));
                }
            }
        }
        Ok(())
    }

    /// Notify stage: routes every scored job by band,
    /// embedding a prior-applications cross-check, skipping jobs already
    /// notified this run.
    async fn stage_notify(
        &mut self,
        scored: &[ScoredJob],
        jobs_by_id: &HashMap<JobId, Job>,
        checkpoint: &mut CheckpointLog,
        run: &mut PipelineRun,
        now: DateTime<Utc>,
    ) -> Result<(), PipelineError> {
        for score in scored {
            if checkpoint.is_notified(score.job_id) {
                continue;
            }
            let Some(job) = jobs_by_id.get(&score.job_id) else {
                continue;
            };

            let application =
                Application::new_matched(job.id, job.company.clone(), job.title.clone(), job.country.clone(), job.site_id.clone(), now);
            self.store.insert_application(&application)?;

            let prior = self.store.applications_for_company(&job.company, job.id)?;
            let prior_descriptions: Vec<String> = prior
                .iter()
                .map(|a| format!("{} — {} ({})", a.role, a.status, a.status_updated.date_naive()))
                .collect();

            let resume_pdf_path = self.store.get_resume(job.id)?.map(|r| r.pdf_path);

            let notice = JobNotice {
                job_id: job.id,
                title: job.title.clone(),
                company: job.company.clone(),
                location: job.location.clone(),
                url: job.url.clone(),
                score: score.score,
                reasoning: score.reasoning.clone(),
                resume_pdf_path,
                prior_applications_at_company: prior_descriptions,
            };

            let outcome = self.notifier.route(notice).await;
            self.store.insert_notification(&NotificationRecord {
                job_id: job.id,
                channel: outcome.channel,
                telegram_sent: outcome.telegram_sent,
                created_at: now,
            })?;
            checkpoint.mark_notified(job.id, now);
            if outcome.channel != NotificationChannel::Discarded {
                run.notifications_sent += 1;
            }
        }

        self.notifier.flush_digest().await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
