// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level Notifier: routes a scored job to instant/digest/log/
//! discard, polls feedback, and raises health alerts.

use crate::digest::{send_digest, SmtpConfig};
use crate::error::NotifyError;
use crate::feedback::{parse_callback_payload, FeedbackEvent};
use crate::message::{channel_for_score, format_instant_message, instant_message_buttons, JobNotice, Thresholds};
use crate::transport::MessageTransport;
use jh_core::NotificationChannel;

/// Outcome of routing one job: which channel it landed in, whether the
/// instant send (if attempted) actually went out.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    pub channel: NotificationChannel,
    pub telegram_sent: bool,
}

pub struct Notifier<T: MessageTransport> {
    transport: T,
    smtp: Option<SmtpConfig>,
    thresholds: Thresholds,
    update_offset: i64,
    digest_queue: Vec<JobNotice>,
}

impl<T: MessageTransport> Notifier<T> {
    pub fn new(transport: T, smtp: Option<SmtpConfig>, thresholds: Thresholds) -> Self {
        Self { transport, smtp, thresholds, update_offset: 0, digest_queue: Vec::new() }
    }

    /// Route a scored job to its channel. Instant sends that fail are
    /// logged and swallowed — the caller still records the notification
    /// row with `telegram_sent=false`.
    pub async fn route(&mut self, notice: JobNotice) -> RouteOutcome {
        let channel = channel_for_score(notice.score, &self.thresholds);
        match channel {
            NotificationChannel::Instant => {
                let text = format_instant_message(&notice);
                let buttons = instant_message_buttons(notice.job_id);
                let telegram_sent = match self.transport.send_instant(&text, &buttons).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(job_id = %notice.job_id, error = %e, "instant notification send failed");
                        false
                    }
                };
                RouteOutcome { channel, telegram_sent }
            }
            NotificationChannel::Digest => {
                self.digest_queue.push(notice);
                RouteOutcome { channel, telegram_sent: false }
            }
            NotificationChannel::Log => {
                tracing::info!(
                    job_id = %notice.job_id, title = %notice.title, company = %notice.company,
                    score = notice.score, "job logged (below digest threshold)"
                );
                RouteOutcome { channel, telegram_sent: false }
            }
            NotificationChannel::Discarded => RouteOutcome { channel, telegram_sent: false },
        }
    }

    /// Flush the queued digest entries as one email. Best-effort; clears
    /// the queue regardless of send outcome.
    pub async fn flush_digest(&mut self) {
        let Some(smtp) = &self.smtp else {
            if !self.digest_queue.is_empty() {
                tracing::warn!(count = self.digest_queue.len(), "digest entries queued but no smtp configured");
            }
            self.digest_queue.clear();
            return;
        };
        send_digest(smtp, &self.digest_queue).await;
        self.digest_queue.clear();
    }

    /// Pull pending callback events, advancing the shared update cursor.
    /// Poll failures are logged and ignored.
    pub async fn poll_feedback(&mut self) -> Vec<FeedbackEvent> {
        let (updates, next_offset) = match self.transport.poll_callback_updates(self.update_offset).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "feedback poll failed");
                return Vec::new();
            }
        };
        self.update_offset = next_offset;
        updates
            .into_iter()
            .filter_map(|update| match parse_callback_payload(&update.payload) {
                Some(event) => Some(event),
                None => {
                    tracing::warn!(payload = %update.payload, "unparseable callback payload, dropping");
                    None
                }
            })
            .collect()
    }

    /// End-of-run summary alert, sent only when something needs surfacing.
    pub async fn send_health_alert(&self, sites_failed: usize, errors: usize) -> Result<(), NotifyError> {
        if sites_failed == 0 && errors == 0 {
            return Ok(());
        }
        let text = format!("Run finished with {sites_failed} site failure(s) and {errors} error(s).");
        self.transport.send_instant(&text, &[]).await
    }

    /// Immediate alert for a catastrophic, run-aborting error.
    pub async fn send_crash_alert(&self, reason: &str) -> Result<(), NotifyError> {
        self.transport.send_instant(&format!("Run crashed: {reason}"), &[]).await
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
