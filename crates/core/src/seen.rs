// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seen-hash record for the dedup filter.

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Records that a [`JobId`] has been encountered before. Inserted exactly
/// once on first sight; later encounters are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeenHash {
    pub hash: JobId,
    pub first_seen_at: DateTime<Utc>,
}
