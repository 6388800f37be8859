// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads `settings.toml`, `master_resume.toml`, and `site_configs/*.toml`
//! from a config root directory.

use jh_core::{KeywordConfig, SiteConfig};
use jh_notifier::Thresholds;
use jh_pipeline::StageThresholds;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Deserialize)]
struct ScoringSection {
    weights: String,
    #[serde(default = "default_char_budget")]
    char_budget: usize,
}

fn default_char_budget() -> usize {
    8000
}

#[derive(Debug, Deserialize)]
struct ModelEndpoint {
    base_url: String,
    model: String,
    /// Name of the environment variable holding this endpoint's API key,
    /// if it needs one.
    #[serde(default)]
    api_key_env: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelSection {
    primary: ModelEndpoint,
    fallback: Option<ModelEndpoint>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_max_json_retries")]
    max_json_retries: u32,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_json_retries() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct ThresholdsSection {
    #[serde(default = "default_instant")]
    instant: u8,
    #[serde(default = "default_digest")]
    digest: u8,
    #[serde(default = "default_log")]
    log: u8,
    #[serde(default = "default_tailor_score")]
    tailor_score: u8,
}

fn default_instant() -> u8 {
    80
}
fn default_digest() -> u8 {
    60
}
fn default_log() -> u8 {
    40
}
fn default_tailor_score() -> u8 {
    60
}

#[derive(Debug, Deserialize)]
struct PathsSection {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    #[serde(default = "default_archive_root")]
    archive_root: PathBuf,
    #[serde(default = "default_render_command")]
    render_command: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_archive_root() -> PathBuf {
    PathBuf::from("archive")
}

fn default_render_command() -> String {
    "resume-render".to_string()
}

#[derive(Debug, Deserialize)]
struct SmtpSection {
    host: String,
    username: String,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    scoring: ScoringSection,
    model: ModelSection,
    #[serde(default)]
    thresholds: Option<ThresholdsSection>,
    #[serde(default)]
    keywords: KeywordConfig,
    #[serde(default)]
    paths: Option<PathsSection>,
    #[serde(default)]
    smtp: Option<SmtpSection>,
}

/// Fully-resolved settings, secrets read from the environment at load time
/// Fully-resolved settings, secrets read from the environment at load time.
pub struct Settings {
    pub weights: String,
    pub char_budget: usize,
    pub model_timeout_secs: u64,
    pub max_json_retries: u32,
    pub primary_provider: jh_modelclient::ProviderConfig,
    pub fallback_provider: Option<jh_modelclient::ProviderConfig>,
    pub notifier_thresholds: Thresholds,
    pub stage_thresholds: StageThresholds,
    pub keywords: KeywordConfig,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive_root: PathBuf,
    pub render_command: String,
    pub smtp: Option<jh_notifier::SmtpConfig>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn resolve_api_key(endpoint: &ModelEndpoint) -> Option<String> {
    endpoint.api_key_env.as_deref().and_then(env_var)
}

impl Settings {
    /// Load `settings.toml` from `config_root`, resolving secrets from
    /// the environment. Primary endpoint base URL can be overridden by
    /// `JOBHUNTER_PRIMARY_BASE_URL`.
    pub fn load(config_root: &Path) -> Result<Self, ConfigError> {
        let path = config_root.join("settings.toml");
        let raw = read_to_string(&path)?;
        let parsed: SettingsFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

        let primary_base_url = env_var("JOBHUNTER_PRIMARY_BASE_URL").unwrap_or(parsed.model.primary.base_url.clone());
        let primary_provider = jh_modelclient::ProviderConfig {
            name: "primary".to_string(),
            base_url: primary_base_url,
            model: parsed.model.primary.model.clone(),
            api_key: resolve_api_key(&parsed.model.primary),
        };

        let fallback_provider = parsed.model.fallback.as_ref().map(|endpoint| jh_modelclient::ProviderConfig {
            name: "fallback".to_string(),
            base_url: endpoint.base_url.clone(),
            model: endpoint.model.clone(),
            api_key: env_var("JOBHUNTER_FALLBACK_API_KEY").or_else(|| resolve_api_key(endpoint)),
        });

        let thresholds = parsed.thresholds.unwrap_or(ThresholdsSection {
            instant: default_instant(),
            digest: default_digest(),
            log: default_log(),
            tailor_score: default_tailor_score(),
        });

        let paths = parsed.paths.unwrap_or(PathsSection {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            archive_root: default_archive_root(),
            render_command: default_render_command(),
        });

        let smtp = match (parsed.smtp, env_var("JOBHUNTER_SMTP_PASSWORD")) {
            (Some(section), Some(password)) => Some(jh_notifier::SmtpConfig {
                host: section.host,
                username: section.username,
                password,
                from: section.from,
                to: section.to,
            }),
            (Some(_), None) => {
                tracing::warn!("smtp configured but JOBHUNTER_SMTP_PASSWORD is unset, digest email disabled");
                None
            }
            (None, _) => None,
        };

        Ok(Self {
            weights: parsed.scoring.weights,
            char_budget: parsed.scoring.char_budget,
            model_timeout_secs: parsed.model.timeout_secs,
            max_json_retries: parsed.model.max_json_retries,
            primary_provider,
            fallback_provider,
            notifier_thresholds: Thresholds { instant: thresholds.instant, digest: thresholds.digest, log: thresholds.log },
            stage_thresholds: StageThresholds { tailor_score_threshold: thresholds.tailor_score },
            keywords: parsed.keywords,
            data_dir: paths.data_dir,
            output_dir: paths.output_dir,
            archive_root: paths.archive_root,
            render_command: paths.render_command,
            smtp,
            telegram_bot_token: env_var("JOBHUNTER_TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: env_var("JOBHUNTER_TELEGRAM_CHAT_ID"),
        })
    }
}

/// Load the master résumé document as opaque text, passed verbatim into
/// scoring and tailoring prompts.
pub fn load_master_resume(config_root: &Path) -> Result<String, ConfigError> {
    read_to_string(&config_root.join("master_resume.toml"))
}

/// Load every enabled site config under `site_configs/`, skipping
/// template files (leading `_`) and any that fail to parse: unreadable or
/// unparseable files are skipped with a warning rather than aborting the
/// whole load.
pub fn load_site_configs(config_root: &Path) -> Result<Vec<SiteConfig>, ConfigError> {
    let dir = config_root.join("site_configs");
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut sites = Vec::new();
    let entries = std::fs::read_dir(&dir).map_err(|source| ConfigError::Read { path: dir.clone(), source })?;
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        let stem_starts_with_underscore =
            path.file_stem().and_then(|s| s.to_str()).map(|s| s.starts_with('_')).unwrap_or(false);
        if stem_starts_with_underscore {
            continue;
        }

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable site config");
                continue;
            }
        };
        match toml::from_str::<SiteConfig>(&raw) {
            Ok(site) if site.enabled => sites.push(site),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping invalid site config");
                continue;
            }
        }
    }

    Ok(sites)
}

fn read_to_string(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
