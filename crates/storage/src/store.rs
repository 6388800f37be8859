// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Persistent Store: a single-writer, WAL-mode SQLite database holding
//! jobs, scores, résumés, applications, feedback, runs, and notifications.
//!
//! Concurrency model: one writer (the pipeline
//! process) at a time, readers tolerated via WAL journal mode for
//! external inspection (e.g. `jobhunter status`).

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use jh_core::{
    Application, ApplicationId, ApplicationStatus, Feedback, FeedbackAction, Job, JobId,
    NotificationChannel, NotificationRecord, PipelineRun, RunId, RunStatus, ScoredJob, SeenHash,
    SiteFailure, TailoredResume,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    site_id TEXT NOT NULL,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    location TEXT NOT NULL,
    country TEXT NOT NULL,
    url TEXT NOT NULL,
    salary TEXT,
    description TEXT,
    requirements TEXT,
    posted_date TEXT,
    scraped_at TEXT NOT NULL,
    run_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seen_jobs (
    hash TEXT PRIMARY KEY,
    first_seen_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS scores (
    job_id TEXT PRIMARY KEY REFERENCES jobs(id),
    score INTEGER NOT NULL,
    reasoning TEXT NOT NULL,
    provider TEXT NOT NULL,
    scored_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS resumes (
    job_id TEXT PRIMARY KEY REFERENCES jobs(id),
    html_path TEXT NOT NULL,
    pdf_path TEXT NOT NULL,
    verified INTEGER NOT NULL,
    verification_issues TEXT NOT NULL,
    generated_at TEXT NOT NULL,
    run_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL REFERENCES jobs(id),
    company TEXT NOT NULL,
    role TEXT NOT NULL,
    country TEXT NOT NULL,
    applied_date TEXT,
    resume_version TEXT,
    status TEXT NOT NULL,
    status_updated TEXT NOT NULL,
    notes TEXT,
    source_site TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS feedback (
    job_id TEXT NOT NULL REFERENCES jobs(id),
    score INTEGER NOT NULL,
    action TEXT NOT NULL,
    reason TEXT,
    timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pipeline_runs (
    run_id TEXT PRIMARY KEY,
    started_at TEXT NOT NULL,
    completed_at TEXT,
    status TEXT NOT NULL,
    sites_attempted INTEGER NOT NULL,
    sites_succeeded INTEGER NOT NULL,
    sites_failed TEXT NOT NULL,
    jobs_scraped INTEGER NOT NULL,
    jobs_new INTEGER NOT NULL,
    jobs_filtered_out INTEGER NOT NULL,
    jobs_scored INTEGER NOT NULL,
    jobs_above_threshold INTEGER NOT NULL,
    resumes_generated INTEGER NOT NULL,
    notifications_sent INTEGER NOT NULL,
    errors TEXT NOT NULL,
    llm_providers_used TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    job_id TEXT PRIMARY KEY REFERENCES jobs(id),
    channel TEXT NOT NULL,
    telegram_sent INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Handle to the embedded relational store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if absent) the SQLite database at `path`, enabling
    /// WAL journaling so external readers can inspect the store while the
    /// pipeline writes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // --- jobs ---

    /// Insert a job if its id isn't already present. Jobs are immutable
    /// and may be re-scraped across runs, so this is `INSERT OR IGNORE`
    /// rather than a hard uniqueness error.
    pub fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO jobs
             (id, site_id, title, company, location, country, url, salary, description,
              requirements, posted_date, scraped_at, run_id)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
            params![
                job.id.as_hex(),
                job.site_id,
                job.title,
                job.company,
                job.location,
                job.country,
                job.url,
                job.salary,
                job.description,
                job.requirements,
                job.posted_date,
                job.scraped_at.to_rfc3339(),
                job.run_id,
            ],
        )?;
        Ok(())
    }

    pub fn get_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, site_id, title, company, location, country, url, salary, description,
                        requirements, posted_date, scraped_at, run_id
                 FROM jobs WHERE id = ?1",
                params![id.as_hex()],
                row_to_job,
            )
            .optional()
            .map_err(StoreError::from)
    }

    /// All jobs scraped during `run_id`, used by the orchestrator to
    /// re-read previously-scraped sites on resume.
    pub fn jobs_for_run(&self, run_id: &str) -> Result<Vec<Job>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, site_id, title, company, location, country, url, salary, description,
                    requirements, posted_date, scraped_at, run_id
             FROM jobs WHERE run_id = ?1",
        )?;
        let rows = stmt.query_map(params![run_id], row_to_job)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    // --- seen hashes (dedup) ---

    /// Returns `true` if this is the job's first sighting (and records it);
    /// `false` if already seen, a no-op.
    pub fn mark_seen(&self, hash: JobId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO seen_jobs (hash, first_seen_at) VALUES (?1, ?2)",
            params![hash.as_hex(), now.to_rfc3339()],
        )?;
        Ok(changed == 1)
    }

    pub fn is_seen(&self, hash: JobId) -> Result<bool, StoreError> {
        let seen: Option<String> = self
            .conn
            .query_row("SELECT hash FROM seen_jobs WHERE hash = ?1", params![hash.as_hex()], |r| r.get(0))
            .optional()?;
        Ok(seen.is_some())
    }

    pub fn get_seen(&self, hash: JobId) -> Result<Option<SeenHash>, StoreError> {
        self.conn
            .query_row(
                "SELECT hash, first_seen_at FROM seen_jobs WHERE hash = ?1",
                params![hash.as_hex()],
                |row| {
                    let hash: String = row.get(0)?;
                    let first_seen_at: String = row.get(1)?;
                    Ok(SeenHash {
                        hash: parse_job_id(&hash)?,
                        first_seen_at: parse_dt(&first_seen_at)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
    }

    // --- scores ---

    pub fn insert_score(&self, scored: &ScoredJob) -> Result<(), StoreError> {
        if self.get_job(scored.job_id)?.is_none() {
            return Err(StoreError::MissingJob(scored.job_id.as_hex()));
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO scores (job_id, score, reasoning, provider, scored_at)
             VALUES (?1,?2,?3,?4,?5)",
            params![
                scored.job_id.as_hex(),
                scored.score,
                scored.reasoning,
                scored.provider,
                scored.scored_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_score(&self, job_id: JobId) -> Result<Option<ScoredJob>, StoreError> {
        self.conn
            .query_row(
                "SELECT job_id, score, reasoning, provider, scored_at FROM scores WHERE job_id = ?1",
                params![job_id.as_hex()],
                |row| {
                    let job_id: String = row.get(0)?;
                    let score: i64 = row.get(1)?;
                    let scored_at: String = row.get(4)?;
                    Ok(ScoredJob {
                        job_id: parse_job_id(&job_id)?,
                        score: score as u8,
                        reasoning: row.get(2)?,
                        provider: row.get(3)?,
                        scored_at: parse_dt(&scored_at)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
    }

    // --- résumés ---

    pub fn insert_resume(&self, resume: &TailoredResume) -> Result<(), StoreError> {
        if self.get_job(resume.job_id)?.is_none() {
            return Err(StoreError::MissingJob(resume.job_id.as_hex()));
        }
        let issues = serde_json::to_string(&resume.verification_issues)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO resumes
             (job_id, html_path, pdf_path, verified, verification_issues, generated_at, run_id)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                resume.job_id.as_hex(),
                resume.html_path,
                resume.pdf_path,
                resume.verified as i64,
                issues,
                resume.generated_at.to_rfc3339(),
                resume.run_id,
            ],
        )?;
        Ok(())
    }

    pub fn get_resume(&self, job_id: JobId) -> Result<Option<TailoredResume>, StoreError> {
        self.conn
            .query_row(
                "SELECT job_id, html_path, pdf_path, verified, verification_issues, generated_at, run_id
                 FROM resumes WHERE job_id = ?1",
                params![job_id.as_hex()],
                row_to_resume,
            )
            .optional()
            .map_err(StoreError::from)
    }

    // --- applications ---

    pub fn insert_application(&self, app: &Application) -> Result<(), StoreError> {
        if self.get_job(app.job_id)?.is_none() {
            return Err(StoreError::MissingJob(app.job_id.as_hex()));
        }
        self.conn.execute(
            "INSERT INTO applications
             (id, job_id, company, role, country, applied_date, resume_version, status,
              status_updated, notes, source_site)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
            params![
                app.id.as_str(),
                app.job_id.as_hex(),
                app.company,
                app.role,
                app.country,
                app.applied_date.map(|d| d.to_rfc3339()),
                app.resume_version,
                app.status.to_string(),
                app.status_updated.to_rfc3339(),
                app.notes,
                app.source_site,
            ],
        )?;
        Ok(())
    }

    /// Prior applications at `company` (the pre-notification
    /// cross-check), excluding the application just created for `exclude_job`.
    pub fn applications_for_company(
        &self,
        company: &str,
        exclude_job: JobId,
    ) -> Result<Vec<Application>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, job_id, company, role, country, applied_date, resume_version, status,
                    status_updated, notes, source_site
             FROM applications WHERE company = ?1 AND job_id != ?2",
        )?;
        let rows = stmt.query_map(params![company, exclude_job.as_hex()], row_to_application)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    pub fn update_application_status(
        &self,
        job_id: JobId,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE applications SET status = ?1, status_updated = ?2 WHERE job_id = ?3",
            params![status.to_string(), now.to_rfc3339(), job_id.as_hex()],
        )?;
        Ok(())
    }

    // --- feedback (append-only) ---

    pub fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO feedback (job_id, score, action, reason, timestamp) VALUES (?1,?2,?3,?4,?5)",
            params![
                feedback.job_id.as_hex(),
                feedback.score,
                feedback.action.to_string(),
                feedback.reason,
                feedback.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn feedback_for_job(&self, job_id: JobId) -> Result<Vec<Feedback>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT job_id, score, action, reason, timestamp FROM feedback WHERE job_id = ?1")?;
        let rows = stmt.query_map(params![job_id.as_hex()], |row| {
            let job_id: String = row.get(0)?;
            let score: i64 = row.get(1)?;
            let action: String = row.get(2)?;
            let timestamp: String = row.get(4)?;
            Ok(Feedback {
                job_id: parse_job_id(&job_id)?,
                score: score as u8,
                action: FeedbackAction::parse(&action).unwrap_or(FeedbackAction::Skipped),
                reason: row.get(3)?,
                timestamp: parse_dt(&timestamp)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    // --- notifications ---

    pub fn insert_notification(&self, record: &NotificationRecord) -> Result<(), StoreError> {
        if self.get_job(record.job_id)?.is_none() {
            return Err(StoreError::MissingJob(record.job_id.as_hex()));
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO notifications (job_id, channel, telegram_sent, created_at)
             VALUES (?1,?2,?3,?4)",
            params![
                record.job_id.as_hex(),
                record.channel.to_string(),
                record.telegram_sent as i64,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_notification(&self, job_id: JobId) -> Result<Option<NotificationRecord>, StoreError> {
        self.conn
            .query_row(
                "SELECT job_id, channel, telegram_sent, created_at FROM notifications WHERE job_id = ?1",
                params![job_id.as_hex()],
                |row| {
                    let job_id: String = row.get(0)?;
                    let channel: String = row.get(1)?;
                    let telegram_sent: i64 = row.get(2)?;
                    let created_at: String = row.get(3)?;
                    Ok(NotificationRecord {
                        job_id: parse_job_id(&job_id)?,
                        channel: parse_channel(&channel),
                        telegram_sent: telegram_sent != 0,
                        created_at: parse_dt(&created_at)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
    }

    // --- pipeline runs ---

    pub fn upsert_run(&self, run: &PipelineRun) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO pipeline_runs
             (run_id, started_at, completed_at, status, sites_attempted, sites_succeeded,
              sites_failed, jobs_scraped, jobs_new, jobs_filtered_out, jobs_scored,
              jobs_above_threshold, resumes_generated, notifications_sent, errors,
              llm_providers_used)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)
             ON CONFLICT(run_id) DO UPDATE SET
                completed_at = excluded.completed_at,
                status = excluded.status,
                sites_attempted = excluded.sites_attempted,
                sites_succeeded = excluded.sites_succeeded,
                sites_failed = excluded.sites_failed,
                jobs_scraped = excluded.jobs_scraped,
                jobs_new = excluded.jobs_new,
                jobs_filtered_out = excluded.jobs_filtered_out,
                jobs_scored = excluded.jobs_scored,
                jobs_above_threshold = excluded.jobs_above_threshold,
                resumes_generated = excluded.resumes_generated,
                notifications_sent = excluded.notifications_sent,
                errors = excluded.errors,
                llm_providers_used = excluded.llm_providers_used",
            params![
                run.run_id.as_str(),
                run.started_at.to_rfc3339(),
                run.completed_at.map(|d| d.to_rfc3339()),
                run.status.to_string(),
                run.sites_attempted,
                run.sites_succeeded,
                serde_json::to_string(&run.sites_failed)?,
                run.jobs_scraped,
                run.jobs_new,
                run.jobs_filtered_out,
                run.jobs_scored,
                run.jobs_above_threshold,
                run.resumes_generated,
                run.notifications_sent,
                serde_json::to_string(&run.errors)?,
                serde_json::to_string(&run.llm_providers_used)?,
            ],
        )?;
        Ok(())
    }

    pub fn get_run(&self, run_id: &str) -> Result<Option<PipelineRun>, StoreError> {
        self.conn
            .query_row(
                "SELECT run_id, started_at, completed_at, status, sites_attempted, sites_succeeded,
                        sites_failed, jobs_scraped, jobs_new, jobs_filtered_out, jobs_scored,
                        jobs_above_threshold, resumes_generated, notifications_sent, errors,
                        llm_providers_used
                 FROM pipeline_runs WHERE run_id = ?1",
                params![run_id],
                row_to_run,
            )
            .optional()
            .map_err(StoreError::from)
    }
}

fn parse_job_id(hex: &str) -> rusqlite::Result<JobId> {
    JobId::from_hex(hex).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, format!("corrupt job id in store: {hex}").into())
    })
}

fn parse_dt(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, format!("corrupt timestamp {s:?} in store: {e}").into())
    })
}

fn parse_channel(s: &str) -> NotificationChannel {
    match s {
        "instant" => NotificationChannel::Instant,
        "digest" => NotificationChannel::Digest,
        "log" => NotificationChannel::Log,
        _ => NotificationChannel::Discarded,
    }
}

fn parse_status(s: &str) -> ApplicationStatus {
    match s {
        "applied" => ApplicationStatus::Applied,
        "phone_screen" => ApplicationStatus::PhoneScreen,
        "interview" => ApplicationStatus::Interview,
        "offer" => ApplicationStatus::Offer,
        "rejected" => ApplicationStatus::Rejected,
        "withdrawn" => ApplicationStatus::Withdrawn,
        "expired" => ApplicationStatus::Expired,
        _ => ApplicationStatus::Matched,
    }
}

fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    let id: String = row.get(0)?;
    let scraped_at: String = row.get(11)?;
    Ok(Job {
        id: parse_job_id(&id)?,
        site_id: row.get(1)?,
        title: row.get(2)?,
        company: row.get(3)?,
        location: row.get(4)?,
        country: row.get(5)?,
        url: row.get(6)?,
        salary: row.get(7)?,
        description: row.get(8)?,
        requirements: row.get(9)?,
        posted_date: row.get(10)?,
        scraped_at: parse_dt(&scraped_at)?,
        run_id: row.get(12)?,
    })
}

fn row_to_resume(row: &rusqlite::Row<'_>) -> rusqlite::Result<TailoredResume> {
    let job_id: String = row.get(0)?;
    let verified: i64 = row.get(3)?;
    let issues_json: String = row.get(4)?;
    let generated_at: String = row.get(5)?;
    Ok(TailoredResume {
        job_id: parse_job_id(&job_id)?,
        html_path: row.get(1)?,
        pdf_path: row.get(2)?,
        verified: verified != 0,
        verification_issues: serde_json::from_str(&issues_json).unwrap_or_default(),
        generated_at: parse_dt(&generated_at)?,
        run_id: row.get(6)?,
    })
}

fn row_to_application(row: &rusqlite::Row<'_>) -> rusqlite::Result<Application> {
    let id: String = row.get(0)?;
    let job_id: String = row.get(1)?;
    let applied_date: Option<String> = row.get(5)?;
    let status: String = row.get(7)?;
    let status_updated: String = row.get(8)?;
    Ok(Application {
        id: jh_core::ApplicationId::from_string(id),
        job_id: parse_job_id(&job_id)?,
        company: row.get(2)?,
        role: row.get(3)?,
        country: row.get(4)?,
        applied_date: applied_date.map(|d| parse_dt(&d)).transpose()?,
        resume_version: row.get(6)?,
        status: parse_status(&status),
        status_updated: parse_dt(&status_updated)?,
        notes: row.get(9)?,
        source_site: row.get(10)?,
    })
}

fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<PipelineRun> {
    let run_id: String = row.get(0)?;
    let started_at: String = row.get(1)?;
    let completed_at: Option<String> = row.get(2)?;
    let status: String = row.get(3)?;
    let sites_failed: String = row.get(6)?;
    let errors: String = row.get(14)?;
    let providers: String = row.get(15)?;
    Ok(PipelineRun {
        run_id: RunId::from_string(run_id),
        started_at: parse_dt(&started_at)?,
        completed_at: completed_at.map(|d| parse_dt(&d)).transpose()?,
        status: match status.as_str() {
            "completed" => RunStatus::Completed,
            "crashed" => RunStatus::Crashed,
            _ => RunStatus::Running,
        },
        sites_attempted: row.get(4)?,
        sites_succeeded: row.get(5)?,
        sites_failed: serde_json::from_str::<Vec<SiteFailure>>(&sites_failed).unwrap_or_default(),
        jobs_scraped: row.get(7)?,
        jobs_new: row.get(8)?,
        jobs_filtered_out: row.get(9)?,
        jobs_scored: row.get(10)?,
        jobs_above_threshold: row.get(11)?,
        resumes_generated: row.get(12)?,
        notifications_sent: row.get(13)?,
        errors: serde_json::from_str(&errors).unwrap_or_default(),
        llm_providers_used: serde_json::from_str(&providers).unwrap_or_default(),
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
