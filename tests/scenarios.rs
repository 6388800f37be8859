// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box scenario tests driving the compiled `jobhunter` binary.

use assert_cmd::Command;
use predicates::str::contains;
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A throwaway config/data directory for one scenario, backed by a
/// tempdir so parallel tests never share state.
struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    fn file(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir for fixture");
        }
        std::fs::write(path, contents).expect("write fixture");
    }

    fn jobhunter(&self) -> Command {
        let mut cmd = Command::cargo_bin("jobhunter").expect("locate jobhunter binary");
        cmd.arg("--config-dir").arg(self.dir.path());
        cmd
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn output_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    fn archive_dir(&self) -> PathBuf {
        self.dir.path().join("archive")
    }

    fn write_settings(&self, model_base_url: &str, extra: &str) {
        let settings = format!(
            r#"
[scoring]
weights = "experience:3,skills:2"

[model.primary]
base_url = "{model_base_url}"
model = "test-model"

[paths]
data_dir = "{data_dir}"
output_dir = "{output_dir}"
archive_root = "{archive_dir}"

{extra}
"#,
            data_dir = self.data_dir().display(),
            output_dir = self.output_dir().display(),
            archive_dir = self.archive_dir().display(),
        );
        self.file("settings.toml", &settings);
    }
}

const MASTER_RESUME: &str = "[personal]\nname = \"Ada Lovelace\"\n";

fn job_listing_html() -> String {
    r#"
<html><body>
<div class="card">
  <div class="title">Senior Rust Engineer</div>
  <div class="company">Acme Corp</div>
  <div class="location">Remote</div>
  <a href="/jobs/1">apply</a>
</div>
</body></html>
"#
    .to_string()
}

fn site_config(server_uri: &str) -> String {
    format!(
        r#"
site_id = "acme"
name = "Acme Jobs"
url = "{server_uri}"
country = "NL"
strategy = "html"
list_page_url_template = "{server_uri}/jobs?page={{page}}"
card_selector = ".card"
pagination = "url_param"

[fields.title]
selector = ".title"

[fields.company]
selector = ".company"

[fields.location]
selector = ".location"

[fields.url]
selector = "a"
attribute = "href"
url_prefix = "{server_uri}"
"#
    )
}

fn score_response_body(score: i64) -> String {
    let content = serde_json::json!({
        "score": score,
        "reasoning": "decent match, remote and rust-focused",
    })
    .to_string();
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

#[tokio::test]
async fn missing_settings_file_fails_with_a_readable_error() {
    let project = Project::empty();
    project
        .jobhunter()
        .arg("run")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error:"));
}

#[tokio::test]
async fn status_before_any_run_says_so() {
    let project = Project::empty();
    project.write_settings("https://unused.example/v1", "");

    project
        .jobhunter()
        .arg("status")
        .assert()
        .success()
        .stdout(contains("no run recorded yet"));
}

#[tokio::test]
async fn feedback_rejects_an_invalid_job_id() {
    let project = Project::empty();
    project.write_settings("https://unused.example/v1", "");

    project
        .jobhunter()
        .args(["feedback", "not-a-job-id", "applied"])
        .assert()
        .failure()
        .code(2);
}

#[tokio::test]
async fn feedback_rejects_an_unknown_action() {
    let project = Project::empty();
    project.write_settings("https://unused.example/v1", "");
    let valid_but_unseen_id = "0".repeat(64);

    project
        .jobhunter()
        .args(["feedback", &valid_but_unseen_id, "shrug"])
        .assert()
        .failure()
        .code(2);
}

#[tokio::test]
async fn run_scrapes_scores_and_records_a_job_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(job_listing_html()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(score_response_body(50)))
        .mount(&server)
        .await;

    let project = Project::empty();
    // tailor_score well above the mocked score keeps this scenario from
    // needing an external résumé renderer.
    project.write_settings(&format!("{}/v1", server.uri()), "[thresholds]\ntailor_score = 95\n");
    project.file("master_resume.toml", MASTER_RESUME);
    project.file("site_configs/acme.toml", &site_config(&server.uri()));

    project.jobhunter().arg("run").assert().success();

    let status = project.jobhunter().arg("status").assert().success();
    let stdout = String::from_utf8_lossy(&status.get_output().stdout).into_owned();
    assert!(stdout.contains("jobs scraped:        1"), "stdout was:\n{stdout}");
    assert!(stdout.contains("jobs new:            1"), "stdout was:\n{stdout}");
    assert!(stdout.contains("jobs scored:         1"), "stdout was:\n{stdout}");
    assert!(stdout.contains("jobs above threshold:0"), "stdout was:\n{stdout}");
    assert!(stdout.contains("resumes generated:   0"), "stdout was:\n{stdout}");
    assert!(stdout.contains("notifications sent:  1"), "stdout was:\n{stdout}");
}

#[tokio::test]
async fn second_run_against_the_same_site_does_not_recount_a_seen_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(job_listing_html()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(score_response_body(50)))
        .mount(&server)
        .await;

    let project = Project::empty();
    project.write_settings(&format!("{}/v1", server.uri()), "[thresholds]\ntailor_score = 95\n");
    project.file("master_resume.toml", MASTER_RESUME);
    project.file("site_configs/acme.toml", &site_config(&server.uri()));

    project.jobhunter().arg("run").assert().success();
    project.jobhunter().arg("run").assert().success();

    let status = project.jobhunter().arg("status").assert().success();
    let stdout = String::from_utf8_lossy(&status.get_output().stdout).into_owned();
    // The second run re-scrapes the same listing but the dedup filter
    // drops it before it ever reaches scoring.
    assert!(stdout.contains("jobs scraped:        1"), "stdout was:\n{stdout}");
    assert!(stdout.contains("jobs new:            0"), "stdout was:\n{stdout}");
    assert!(stdout.contains("jobs scored:         0"), "stdout was:\n{stdout}");
}

#[tokio::test]
async fn dry_run_scores_without_notifying_and_a_later_run_finishes_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(job_listing_html()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(score_response_body(80)))
        .mount(&server)
        .await;

    let project = Project::empty();
    project.write_settings(&format!("{}/v1", server.uri()), "[thresholds]\ntailor_score = 200\n");
    project.file("master_resume.toml", MASTER_RESUME);
    project.file("site_configs/acme.toml", &site_config(&server.uri()));

    let dry = project.jobhunter().args(["run", "--dry-run"]).assert().success();
    let stdout = String::from_utf8_lossy(&dry.get_output().stdout).into_owned();
    assert!(stdout.contains("dry run"), "stdout was:\n{stdout}");
    assert!(stdout.contains("jobs scored:         1"), "stdout was:\n{stdout}");
    assert!(stdout.contains("notifications sent:  0"), "stdout was:\n{stdout}");

    // tailor_score is set above any real score so the follow-up run
    // only needs to finish notifying, not tailoring, to prove resume.
    project.jobhunter().arg("run").assert().success();

    let status = project.jobhunter().arg("status").assert().success();
    let stdout = String::from_utf8_lossy(&status.get_output().stdout).into_owned();
    assert!(stdout.contains("status:              completed"), "stdout was:\n{stdout}");
    assert!(stdout.contains("jobs scored:         1"), "stdout was:\n{stdout}");
    assert!(stdout.contains("notifications sent:  1"), "stdout was:\n{stdout}");
}
