// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jh-notifier: routes scored jobs to Telegram/digest/log, polls feedback
//! callbacks, and raises health alerts.

mod digest;
mod error;
mod feedback;
mod message;
mod notifier;
mod transport;

pub use digest::{render_digest_body, send_digest, SmtpConfig};
pub use error::NotifyError;
pub use feedback::{parse_callback_payload, FeedbackEvent};
pub use message::{
    channel_for_score, format_digest_entry, format_instant_message, instant_message_buttons, JobNotice, Thresholds,
};
pub use notifier::{Notifier, RouteOutcome};
pub use transport::{CallbackUpdate, MessageTransport, NoopTransport, TelegramTransport};

#[cfg(any(test, feature = "test-support"))]
pub use transport::{FakeMessageTransport, SentMessage};
