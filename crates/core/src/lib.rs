// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jh-core: shared domain types for the jobhunter pipeline.

pub mod macros;

pub mod application;
pub mod clock;
pub mod config;
pub mod id;
pub mod job;
pub mod notification;
pub mod run;
pub mod seen;

pub use application::{
    Application, ApplicationId, ApplicationStatus, Feedback, FeedbackAction, ScoredJob,
    TailoredResume,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ApiConfig, BrowserConfig, DetailPageRules, FieldRule, HtmlConfig, KeywordConfig,
    KeywordOverride, PaginationMode, SiteConfig, Strategy,
};
pub use id::short;
pub use job::{Job, JobId};
pub use notification::{NotificationChannel, NotificationRecord};
pub use run::{PipelineRun, RunId, RunStatus, SiteFailure};
pub use seen::SeenHash;
