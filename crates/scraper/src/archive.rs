// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw-response archival: every page body is persisted before parsing, so
//! a parse failure never loses the bytes that caused it.

use crate::error::ScrapeError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub fn archive_path(root: &Path, now: DateTime<Utc>, site_id: &str, page: u32) -> PathBuf {
    root.join("raw")
        .join(now.format("%Y-%m-%d").to_string())
        .join(format!("{site_id}_page{page}.html"))
}

pub fn write_raw(
    root: &Path,
    now: DateTime<Utc>,
    site_id: &str,
    page: u32,
    body: &str,
) -> Result<PathBuf, ScrapeError> {
    let path = archive_path(root, now, site_id, page);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, body)?;
    Ok(path)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
