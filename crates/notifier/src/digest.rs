// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort SMTP digest delivery. A digest failure is
//! logged and swallowed — it never aborts a run.

use crate::message::{format_digest_entry, JobNotice};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

pub fn render_digest_body(entries: &[JobNotice]) -> String {
    if entries.is_empty() {
        return "No jobs landed in the digest band today.".to_string();
    }
    entries.iter().map(format_digest_entry).collect::<Vec<_>>().join("\n")
}

/// Send the day's accumulated digest entries as a single email. Returns
/// `Ok(())` even on nothing-to-send (an empty digest still goes out as a
/// quiet heartbeat).
pub async fn send_digest(config: &SmtpConfig, entries: &[JobNotice]) {
    let body = render_digest_body(entries);
    let message = Message::builder()
        .from(match config.from.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::warn!(error = %e, "digest from-address invalid, skipping send");
                return;
            }
        })
        .to(match config.to.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::warn!(error = %e, "digest to-address invalid, skipping send");
                return;
            }
        })
        .subject(format!("Job digest — {} jobs", entries.len()))
        .header(ContentType::TEXT_PLAIN)
        .body(body);

    let message = match message {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "failed to build digest message");
            return;
        }
    };

    let mailer = match AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host) {
        Ok(builder) => builder
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build(),
        Err(e) => {
            tracing::warn!(error = %e, host = %config.host, "failed to build smtp transport");
            return;
        }
    };

    match mailer.send(message).await {
        Ok(_) => tracing::info!(count = entries.len(), "digest email sent"),
        Err(e) => tracing::warn!(error = %e, "digest email send failed"),
    }
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
