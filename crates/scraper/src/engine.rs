// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Site Scraper Engine: per-site page loop with retry/backoff and
//! detail-page enrichment, fanned out across sites with bounded
//! concurrency.

use crate::api_strategy;
use crate::archive;
use crate::error::ScrapeError;
use crate::html_strategy;
use crate::raw_row::RawRow;
use chrono::{DateTime, Utc};
use jh_core::{DetailPageRules, Job, PaginationMode, SiteConfig, SiteFailure, Strategy};
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinSet;

const RETRY_DELAYS: [Duration; 3] = [Duration::from_secs(1), Duration::from_secs(3), Duration::from_secs(10)];

/// What one site's scrape produced: normalized jobs plus any quarantined
/// error.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub jobs: Vec<Job>,
    pub failures: Vec<SiteFailure>,
}

/// Scrape every enabled site concurrently, bounded by `min(5, |sites|)`
/// workers.
pub async fn scrape_all(
    http: &reqwest::Client,
    sites: &[SiteConfig],
    run_id: &str,
    now: DateTime<Utc>,
    archive_root: &Path,
) -> ScrapeOutcome {
    let mut pending = sites.iter().filter(|s| s.enabled);
    let worker_count = sites.iter().filter(|s| s.enabled).count().min(5);

    let mut in_flight: JoinSet<ScrapeOutcome> = JoinSet::new();
    let mut outcome = ScrapeOutcome::default();

    for _ in 0..worker_count {
        if let Some(site) = pending.next() {
            spawn_site(&mut in_flight, http.clone(), site.clone(), run_id.to_string(), now, archive_root.to_path_buf());
        }
    }

    while let Some(result) = in_flight.join_next().await {
        match result {
            Ok(site_outcome) => {
                outcome.jobs.extend(site_outcome.jobs);
                outcome.failures.extend(site_outcome.failures);
            }
            Err(join_err) => outcome.failures.push(SiteFailure {
                site: "unknown".into(),
                error: format!("scrape task panicked: {join_err}"),
                stage: "scrape".into(),
            }),
        }
        if let Some(site) = pending.next() {
            spawn_site(&mut in_flight, http.clone(), site.clone(), run_id.to_string(), now, archive_root.to_path_buf());
        }
    }

    outcome
}

fn spawn_site(
    set: &mut JoinSet<ScrapeOutcome>,
    http: reqwest::Client,
    site: SiteConfig,
    run_id: String,
    now: DateTime<Utc>,
    archive_root: PathBuf,
) {
    set.spawn(async move { scrape_site(&http, &site, &run_id, now, &archive_root).await });
}

pub async fn scrape_site(
    http: &reqwest::Client,
    site: &SiteConfig,
    run_id: &str,
    now: DateTime<Utc>,
    archive_root: &Path,
) -> ScrapeOutcome {
    let mut jobs = Vec::new();
    let mut failures = Vec::new();
    let mut next_url: Option<String> = None;

    for page in 1..=site.max_pages {
        let fetched = fetch_page_with_retry(http, site, page, next_url.as_deref()).await;
        let (body, rows, discovered_next) = match fetched {
            Ok(v) => v,
            Err(e) => {
                failures.push(SiteFailure { site: site.site_id.clone(), error: e.to_string(), stage: "scrape".into() });
                break;
            }
        };

        if let Err(e) = archive::write_raw(archive_root, now, &site.site_id, page, &body) {
            tracing::warn!(site = %site.site_id, error = %e, "failed to archive raw scrape response");
        }

        if rows.is_empty() {
            break;
        }

        for row in rows {
            let row = match &site.detail_page {
                Some(detail) if detail.enabled => fetch_detail(http, row, detail).await,
                _ => row,
            };
            if let Some(job) = to_job(row, site, run_id, now) {
                jobs.push(job);
            }
        }

        next_url = discovered_next;
        if uses_next_button_pagination(site) && next_url.is_none() {
            break;
        }
    }

    ScrapeOutcome { jobs, failures }
}

fn uses_next_button_pagination(site: &SiteConfig) -> bool {
    match &site.strategy {
        Strategy::Html(c) => c.pagination == PaginationMode::NextButton,
        Strategy::Browser(c) => c.pagination == PaginationMode::NextButton,
        Strategy::Api(_) => false,
    }
}

async fn fetch_page_with_retry(
    http: &reqwest::Client,
    site: &SiteConfig,
    page: u32,
    next_url: Option<&str>,
) -> Result<(String, Vec<RawRow>, Option<String>), ScrapeError> {
    let mut last_err = None;
    for attempt in 0..=RETRY_DELAYS.len() {
        match fetch_page_once(http, site, page, next_url).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                tracing::debug!(site = %site.site_id, page, attempt, error = %e, "page fetch failed");
                last_err = Some(e);
                if attempt < RETRY_DELAYS.len() {
                    tokio::time::sleep(RETRY_DELAYS[attempt]).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| ScrapeError::Network("retry loop exhausted without recording an error".into())))
}

async fn fetch_page_once(
    http: &reqwest::Client,
    site: &SiteConfig,
    page: u32,
    next_url: Option<&str>,
) -> Result<(String, Vec<RawRow>, Option<String>), ScrapeError> {
    match &site.strategy {
        Strategy::Api(config) => {
            let (body, rows) = api_strategy::fetch_api_page(http, config, page).await?;
            Ok((body, rows, None))
        }
        Strategy::Html(config) => {
            let url = match (config.pagination, next_url) {
                (PaginationMode::NextButton, Some(u)) => u.to_string(),
                _ => api_strategy::substitute_page(&config.list_page_url_template, page),
            };
            let body = html_strategy::fetch_html_page(http, &url).await?;
            let rows = html_strategy::extract_rows(&body, &config.card_selector, &config.fields)?;
            let discovered_next = match config.pagination {
                PaginationMode::NextButton => config
                    .next_button_selector
                    .as_deref()
                    .and_then(|sel| html_strategy::extract_next_url(&body, sel)),
                PaginationMode::UrlParam => None,
            };
            Ok((body, rows, discovered_next))
        }
        Strategy::Browser(_) => Err(ScrapeError::UnsupportedStrategy("browser".into())),
    }
}

async fn fetch_detail(http: &reqwest::Client, mut row: RawRow, detail: &DetailPageRules) -> RawRow {
    let Some(url) = row.url.clone().filter(|u| !u.is_empty()) else {
        return row;
    };
    match html_strategy::fetch_html_page(http, &url).await {
        Ok(body) => {
            let document = Html::parse_document(&body);
            if let Some(text) = select_text(&document, detail.description_selector.as_deref()) {
                row.description = Some(text);
            }
            if let Some(text) = select_text(&document, detail.requirements_selector.as_deref()) {
                row.requirements = Some(text);
            }
        }
        Err(e) => tracing::warn!(url = %url, error = %e, "detail page fetch failed; keeping row without detail fields"),
    }
    row
}

fn select_text(document: &Html, selector: Option<&str>) -> Option<String> {
    let selector = Selector::parse(selector?).ok()?;
    let text = document.select(&selector).next()?.text().collect::<Vec<_>>().join(" ");
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn to_job(row: RawRow, site: &SiteConfig, run_id: &str, now: DateTime<Utc>) -> Option<Job> {
    Job::normalize(
        site.site_id.clone(),
        row.title.as_deref().unwrap_or(""),
        row.company.as_deref().unwrap_or(""),
        row.location.as_deref().unwrap_or(""),
        site.country.clone(),
        row.url.unwrap_or_default(),
        row.salary,
        row.description,
        row.requirements,
        row.posted_date,
        now,
        run_id,
    )
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
