// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `api` strategy: templated URL + JSON listings path + per-field dot-path
//! mapping.

use crate::error::ScrapeError;
use crate::raw_row::RawRow;
use jh_core::ApiConfig;
use serde_json::Value;

pub fn substitute_page(template: &str, page: u32) -> String {
    template.replace("{page}", &page.to_string())
}

pub async fn fetch_api_page(
    http: &reqwest::Client,
    config: &ApiConfig,
    page: u32,
) -> Result<(String, Vec<RawRow>), ScrapeError> {
    let url = substitute_page(&config.url_template, page);
    let mut request = if config.method.eq_ignore_ascii_case("POST") {
        http.post(&url)
    } else {
        http.get(&url)
    };

    let params: Vec<(String, String)> = config
        .params
        .iter()
        .map(|(k, v)| (k.clone(), substitute_page(v, page)))
        .collect();
    request = request.query(&params);

    for (name, value) in &config.headers {
        request = request.header(name, value);
    }

    let response = request.send().await.map_err(|e| ScrapeError::Network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ScrapeError::Status(response.status().as_u16()));
    }
    let body = response.text().await.map_err(|e| ScrapeError::Network(e.to_string()))?;

    let rows = parse_listings(&body, config)?;
    Ok((body, rows))
}

fn parse_listings(body: &str, config: &ApiConfig) -> Result<Vec<RawRow>, ScrapeError> {
    let value: Value = serde_json::from_str(body)?;
    let listings = navigate(&value, &config.listings_path)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(listings
        .iter()
        .map(|item| {
            let mut row = RawRow::default();
            for (field, path) in &config.field_map {
                if let Some(value) = navigate(item, path) {
                    row.set(field, scalar_to_string(value));
                }
            }
            row
        })
        .collect())
}

fn navigate<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |cur, part| cur.get(part))
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "api_strategy_tests.rs"]
mod tests;
