// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jh-pipeline: the Run Orchestrator and its stages — dedup, keyword
//! filter, scorer, résumé tailor/verifier.

mod dedup;
mod error;
mod keyword;
mod orchestrator;
mod scoring;
mod tailor;

#[cfg(test)]
mod test_support;

pub use dedup::dedup_jobs;
pub use error::PipelineError;
pub use keyword::{evaluate, filter_jobs, RejectReason};
pub use orchestrator::{Orchestrator, OrchestratorConfig, StageThresholds};
pub use scoring::score_job;
pub use tailor::{tailor_job, ExternalRenderer, ResumeRenderer, TailorConfig};

#[cfg(any(test, feature = "test-support"))]
pub use tailor::FakeResumeRenderer;
