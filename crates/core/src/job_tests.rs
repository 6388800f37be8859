// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

#[test]
fn job_id_is_deterministic() {
    let a = JobId::compute("Senior Cloud Engineer", "TestCorp", "Amsterdam");
    let b = JobId::compute("Senior Cloud Engineer", "TestCorp", "Amsterdam");
    assert_eq!(a, b);
}

#[test]
fn job_id_is_case_and_whitespace_insensitive() {
    let a = JobId::compute("Senior Cloud Engineer", "TestCorp", "Amsterdam");
    let b = JobId::compute("senior cloud engineer  ", "TESTCORP", "  amsterdam ");
    assert_eq!(a, b);
}

#[test]
fn job_id_differs_on_any_field_change() {
    let a = JobId::compute("Engineer", "Acme", "Remote");
    let b = JobId::compute("Engineer", "Acme", "Berlin");
    assert_ne!(a, b);
}

#[test]
fn job_id_hex_roundtrips() {
    let id = JobId::compute("Engineer", "Acme", "Remote");
    let hex = id.as_hex();
    assert_eq!(hex.len(), 64);
    assert_eq!(JobId::from_hex(&hex), Some(id));
}

#[test]
fn job_id_short_truncates_hex() {
    let id = JobId::compute("Engineer", "Acme", "Remote");
    assert_eq!(id.short(8).len(), 8);
    assert_eq!(id.short(8), &id.as_hex()[..8]);
}

#[test]
fn job_id_serializes_as_hex_string() {
    let id = JobId::compute("Engineer", "Acme", "Remote");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.as_hex()));
    let back: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn normalize_strips_punctuation_and_collapses_whitespace() {
    assert_eq!(normalize("  Senior, Cloud-Engineer!! "), "senior cloud engineer");
}

#[test]
fn job_normalize_drops_row_missing_required_field() {
    let now = Utc::now();
    assert!(Job::normalize(
        "site1", "", "Acme", "Remote", "NL", "https://x", None, None, None, None, now, "run1"
    )
    .is_none());
    assert!(Job::normalize(
        "site1", "Engineer", "  ", "Remote", "NL", "https://x", None, None, None, None, now, "run1"
    )
    .is_none());
}

#[test]
fn job_normalize_builds_job_with_computed_id() {
    let now = Utc::now();
    let job = Job::normalize(
        "site1",
        " Engineer ",
        "Acme",
        "Remote",
        "NL",
        "https://x",
        Some("100k".to_string()),
        None,
        None,
        None,
        now,
        "run1",
    )
    .unwrap();
    assert_eq!(job.title, "Engineer");
    assert_eq!(job.id, JobId::compute("Engineer", "Acme", "Remote"));
}

#[cfg(feature = "test-support")]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn job_id_deterministic_for_any_input(
            title in "[a-zA-Z ]{1,30}",
            company in "[a-zA-Z ]{1,30}",
            location in "[a-zA-Z ]{1,30}",
        ) {
            let a = JobId::compute(&title, &company, &location);
            let b = JobId::compute(&title, &company, &location);
            prop_assert_eq!(a, b);
        }
    }
}
