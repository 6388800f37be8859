// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity and the immutable listing record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Deterministic identifier for a listing: hex digest of the
/// lowercase-normalized `title ∥ company ∥ location` with punctuation
/// stripped and whitespace collapsed.
///
/// Unlike the random IDs produced by [`crate::define_id!`], a `JobId` is a
/// pure function of its inputs — the same listing always hashes to the
/// same id, which is what lets the dedup filter and checkpoint resume
/// logic work across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId([u8; 32]);

impl Serialize for JobId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        JobId::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid JobId hex: {s:?}")))
    }
}

impl JobId {
    /// Compute the id for a listing from its title, company, and location.
    pub fn compute(title: &str, company: &str, location: &str) -> Self {
        let normalized = format!(
            "{}\u{1}{}\u{1}{}",
            normalize(title),
            normalize(company),
            normalize(location)
        );
        let digest = Sha256::digest(normalized.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// First `n` hex characters, used for résumé filenames (spec §4.6).
    pub fn short(&self, n: usize) -> String {
        let hex = self.as_hex();
        hex.chars().take(n).collect()
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let s = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(s, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

/// Lowercase, strip ASCII punctuation, and collapse whitespace runs to a
/// single space, trimming the ends. Keeps keyword and dedup matching
/// case/whitespace-insensitive.
fn normalize(s: &str) -> String {
    let stripped: String = s
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A normalized listing. Immutable after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub site_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub country: String,
    pub url: String,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub posted_date: Option<String>,
    pub scraped_at: DateTime<Utc>,
    pub run_id: String,
}

impl Job {
    /// Build a Job from raw scraped fields, computing its id.
    ///
    /// Returns `None` if any required field (title, company, location) is
    /// missing/empty after trimming — the scraper drops such rows silently.
    #[allow(clippy::too_many_arguments)]
    pub fn normalize(
        site_id: impl Into<String>,
        title: &str,
        company: &str,
        location: &str,
        country: impl Into<String>,
        url: impl Into<String>,
        salary: Option<String>,
        description: Option<String>,
        requirements: Option<String>,
        posted_date: Option<String>,
        scraped_at: DateTime<Utc>,
        run_id: impl Into<String>,
    ) -> Option<Self> {
        let title = title.trim();
        let company = company.trim();
        let location = location.trim();
        if title.is_empty() || company.is_empty() || location.is_empty() {
            return None;
        }
        Some(Self {
            id: JobId::compute(title, company, location),
            site_id: site_id.into(),
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            country: country.into(),
            url: url.into(),
            salary,
            description,
            requirements,
            posted_date,
            scraped_at,
            run_id: run_id.into(),
        })
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
