// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jobhunter run`: the single pipeline entry point.

use crate::config::{load_master_resume, load_site_configs, Settings};
use crate::exit_error::ExitError;
use jh_modelclient::{ModelClient, ProviderConfig, ReqwestTransport};
use jh_notifier::{MessageTransport, NoopTransport, Notifier, TelegramTransport};
use jh_pipeline::{ExternalRenderer, Orchestrator, OrchestratorConfig, ResumeRenderer};
use jh_storage::Store;
use std::path::Path;
use std::time::Duration;

fn build_transport(settings: &Settings) -> Box<dyn MessageTransport> {
    match (&settings.telegram_bot_token, &settings.telegram_chat_id) {
        (Some(token), Some(chat_id)) => Box::new(TelegramTransport::new(token.clone(), chat_id.clone())),
        _ => {
            tracing::warn!("telegram credentials not set, notifications will be logged only");
            Box::new(NoopTransport)
        }
    }
}

fn build_model_client(settings: &Settings) -> ModelClient {
    let mut providers: Vec<ProviderConfig> = vec![settings.primary_provider.clone()];
    if let Some(fallback) = &settings.fallback_provider {
        providers.push(fallback.clone());
    }
    let transport = ReqwestTransport::new(Duration::from_secs(settings.model_timeout_secs));
    ModelClient::new(providers, Box::new(transport)).with_max_json_retries(settings.max_json_retries)
}

pub async fn handle(config_dir: &Path, dry_run: bool) -> Result<(), ExitError> {
    let settings = Settings::load(config_dir)?;
    let master_resume = load_master_resume(config_dir)?;
    let sites = load_site_configs(config_dir)?;

    std::fs::create_dir_all(&settings.data_dir)?;
    std::fs::create_dir_all(&settings.output_dir)?;
    std::fs::create_dir_all(&settings.archive_root)?;

    let store = Store::open(settings.data_dir.join("jobhunter.db"))?;
    let http = reqwest::Client::new();
    let model_client = build_model_client(&settings);
    let notifier = Notifier::new(build_transport(&settings), settings.smtp.clone(), settings.notifier_thresholds);
    let renderer: Box<dyn ResumeRenderer> = Box::new(ExternalRenderer::new(settings.render_command));

    let config = OrchestratorConfig {
        sites,
        keywords: settings.keywords,
        master_resume,
        weights: settings.weights,
        char_budget: settings.char_budget,
        thresholds: settings.stage_thresholds,
        archive_root: settings.archive_root,
        output_dir: settings.output_dir,
        checkpoint_path: settings.data_dir.join("checkpoint.json"),
        dry_run,
    };

    let mut orchestrator = Orchestrator::new(store, http, model_client, notifier, renderer, config);
    let run = orchestrator.run(chrono::Utc::now()).await?;

    tracing::info!(
        run_id = %run.run_id,
        status = %run.status,
        jobs_scraped = run.jobs_scraped,
        jobs_new = run.jobs_new,
        jobs_scored = run.jobs_scored,
        resumes_generated = run.resumes_generated,
        notifications_sent = run.notifications_sent,
        "run finished"
    );

    if dry_run {
        println!("dry run (tailor/notify skipped, checkpoint left at the score stage)");
    }
    println!("run_id:              {}", run.run_id);
    println!("status:              {}", run.status);
    println!("sites attempted:     {}", run.sites_attempted);
    println!("sites succeeded:     {}", run.sites_succeeded);
    println!("sites failed:        {}", run.sites_failed.len());
    println!("jobs scraped:        {}", run.jobs_scraped);
    println!("jobs new:            {}", run.jobs_new);
    println!("jobs filtered out:   {}", run.jobs_filtered_out);
    println!("jobs scored:         {}", run.jobs_scored);
    println!("jobs above threshold:{}", run.jobs_above_threshold);
    println!("resumes generated:   {}", run.resumes_generated);
    println!("notifications sent:  {}", run.notifications_sent);

    Ok(())
}
