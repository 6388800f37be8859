// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The messaging transport seam. Real traffic goes over the Telegram Bot
//! API; tests substitute a fake behind the same trait.

use crate::error::NotifyError;
use async_trait::async_trait;
use serde::Deserialize;

/// One pending callback-button press, not yet acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackUpdate {
    pub update_id: i64,
    pub payload: String,
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send an instant message, optionally with inline reaction buttons.
    async fn send_instant(&self, text: &str, buttons: &[(String, String)]) -> Result<(), NotifyError>;

    /// Pull callback updates with `update_id > offset`. Returns the
    /// updates and the next offset to poll from.
    async fn poll_callback_updates(&self, offset: i64) -> Result<(Vec<CallbackUpdate>, i64), NotifyError>;
}

/// Telegram Bot API transport (`sendMessage` / `getUpdates`).
pub struct TelegramTransport {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramTransport {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), bot_token: bot_token.into(), chat_id: chat_id.into() }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.bot_token)
    }
}

#[derive(serde::Serialize)]
struct InlineButton<'a> {
    text: &'a str,
    callback_data: &'a str,
}

#[derive(serde::Serialize)]
struct ReplyMarkup<'a> {
    inline_keyboard: Vec<Vec<InlineButton<'a>>>,
}

#[derive(serde::Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup<'a>>,
}

#[derive(Deserialize)]
struct GetUpdatesResponse {
    result: Vec<TelegramUpdate>,
}

#[derive(Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    #[serde(default)]
    callback_query: Option<TelegramCallbackQuery>,
}

#[derive(Deserialize)]
struct TelegramCallbackQuery {
    data: String,
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send_instant(&self, text: &str, buttons: &[(String, String)]) -> Result<(), NotifyError> {
        let reply_markup = (!buttons.is_empty()).then(|| ReplyMarkup {
            inline_keyboard: vec![buttons
                .iter()
                .map(|(label, data)| InlineButton { text: label, callback_data: data })
                .collect()],
        });
        let body = SendMessageBody { chat_id: &self.chat_id, text, reply_markup };

        let response = self
            .http
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Transport(format!("telegram returned status {}", response.status())));
        }
        Ok(())
    }

    async fn poll_callback_updates(&self, offset: i64) -> Result<(Vec<CallbackUpdate>, i64), NotifyError> {
        let response = self
            .http
            .get(self.api_url("getUpdates"))
            .query(&[("offset", offset.to_string()), ("timeout", "0".to_string())])
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Transport(format!("telegram returned status {}", response.status())));
        }

        let body: GetUpdatesResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Undecodable(e.to_string()))?;

        let mut next_offset = offset;
        let updates = body
            .result
            .into_iter()
            .filter_map(|u| {
                next_offset = next_offset.max(u.update_id + 1);
                u.callback_query.map(|cb| CallbackUpdate { update_id: u.update_id, payload: cb.data })
            })
            .collect();
        Ok((updates, next_offset))
    }
}

/// Used when Telegram credentials are absent: sends are no-ops and
/// feedback polling never yields updates. Missing credentials are
/// documented behavior, not an error.
pub struct NoopTransport;

#[async_trait]
impl MessageTransport for NoopTransport {
    async fn send_instant(&self, _text: &str, _buttons: &[(String, String)]) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn poll_callback_updates(&self, offset: i64) -> Result<(Vec<CallbackUpdate>, i64), NotifyError> {
        Ok((Vec::new(), offset))
    }
}

#[async_trait]
impl MessageTransport for Box<dyn MessageTransport> {
    async fn send_instant(&self, text: &str, buttons: &[(String, String)]) -> Result<(), NotifyError> {
        (**self).send_instant(text, buttons).await
    }

    async fn poll_callback_updates(&self, offset: i64) -> Result<(Vec<CallbackUpdate>, i64), NotifyError> {
        (**self).poll_callback_updates(offset).await
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{CallbackUpdate, MessageTransport, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub struct SentMessage {
        pub text: String,
        pub buttons: Vec<(String, String)>,
    }

    struct FakeState {
        sent: Vec<SentMessage>,
        pending_updates: Vec<CallbackUpdate>,
        fail_next_send: bool,
    }

    /// Scripted transport for tests: records sent messages and serves a
    /// fixed queue of pending callback updates.
    #[derive(Clone)]
    pub struct FakeMessageTransport {
        state: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeMessageTransport {
        fn default() -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeState {
                    sent: Vec::new(),
                    pending_updates: Vec::new(),
                    fail_next_send: false,
                })),
            }
        }
    }

    impl FakeMessageTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent_messages(&self) -> Vec<SentMessage> {
            self.state.lock().sent.clone()
        }

        pub fn queue_update(&self, update: CallbackUpdate) {
            self.state.lock().pending_updates.push(update);
        }

        pub fn fail_next_send(&self) {
            self.state.lock().fail_next_send = true;
        }
    }

    #[async_trait]
    impl MessageTransport for FakeMessageTransport {
        async fn send_instant(&self, text: &str, buttons: &[(String, String)]) -> Result<(), NotifyError> {
            let mut state = self.state.lock();
            if state.fail_next_send {
                state.fail_next_send = false;
                return Err(NotifyError::Transport("simulated send failure".into()));
            }
            state.sent.push(SentMessage { text: text.to_string(), buttons: buttons.to_vec() });
            Ok(())
        }

        async fn poll_callback_updates(&self, offset: i64) -> Result<(Vec<CallbackUpdate>, i64), NotifyError> {
            let mut state = self.state.lock();
            let due: Vec<CallbackUpdate> =
                state.pending_updates.iter().filter(|u| u.update_id >= offset).cloned().collect();
            state.pending_updates.retain(|u| u.update_id < offset);
            let next_offset = due.iter().map(|u| u.update_id + 1).max().unwrap_or(offset);
            Ok((due, next_offset))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMessageTransport, SentMessage};

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
