// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification routing record — the durable trace of what the Notifier
//! decided to do with a scored job.

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which notification band a scored job landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Instant,
    Digest,
    Log,
    Discarded,
}

crate::simple_display! {
    NotificationChannel {
        Instant => "instant",
        Digest => "digest",
        Log => "log",
        Discarded => "discarded",
    }
}

/// At most one per job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub job_id: JobId,
    pub channel: NotificationChannel,
    pub telegram_sent: bool,
    pub created_at: DateTime<Utc>,
}
