// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jobhunter status`: print the summary of the most recent run.

use crate::config::Settings;
use crate::exit_error::ExitError;
use jh_storage::{CheckpointLog, Store};
use std::path::Path;

pub async fn handle(config_dir: &Path) -> Result<(), ExitError> {
    let settings = Settings::load(config_dir)?;
    let checkpoint_path = settings.data_dir.join("checkpoint.json");

    let Some(checkpoint) = CheckpointLog::load(&checkpoint_path)? else {
        println!("no run recorded yet");
        return Ok(());
    };

    let store = Store::open(settings.data_dir.join("jobhunter.db"))?;
    let Some(run) = store.get_run(&checkpoint.run_id)? else {
        println!("run {} checkpointed but no summary recorded", checkpoint.run_id);
        return Ok(());
    };

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
    if !run.errors.is_empty() {
        println!("errors:");
        for error in &run.errors {
            println!("  - {error}");
        }
    }

    Ok(())
}
