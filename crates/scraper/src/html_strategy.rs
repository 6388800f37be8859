// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `html`/`browser` strategy: CSS-selector card extraction over a fetched
//! list page.

use crate::error::ScrapeError;
use crate::raw_row::RawRow;
use jh_core::FieldRule;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

pub async fn fetch_html_page(http: &reqwest::Client, url: &str) -> Result<String, ScrapeError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| ScrapeError::Network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ScrapeError::Status(response.status().as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| ScrapeError::Network(e.to_string()))
}

/// Extract one [`RawRow`] per matched card. An empty result means the
/// card selector matched zero elements — the caller treats that as "zero
/// rows" (pagination stop), not an error.
pub fn extract_rows(
    body: &str,
    card_selector: &str,
    fields: &HashMap<String, FieldRule>,
) -> Result<Vec<RawRow>, ScrapeError> {
    let document = Html::parse_document(body);
    let card_sel = Selector::parse(card_selector)
        .map_err(|e| ScrapeError::Extraction(format!("invalid card selector {card_selector:?}: {e:?}")))?;

    let mut rows = Vec::new();
    for card in document.select(&card_sel) {
        let mut row = RawRow::default();
        for (field, rule) in fields {
            let Ok(field_sel) = Selector::parse(&rule.selector) else {
                tracing::warn!(field, selector = %rule.selector, "invalid field selector, skipping");
                continue;
            };
            if let Some(element) = card.select(&field_sel).next() {
                if let Some(value) = extract_field(&element, rule) {
                    row.set(field, value);
                }
            } else if !rule.optional {
                tracing::debug!(field, "required field selector matched nothing in card");
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn extract_field(element: &ElementRef<'_>, rule: &FieldRule) -> Option<String> {
    let raw = if rule.attribute == "text" {
        let text = element.text().collect::<Vec<_>>().join(" ");
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    } else {
        element
            .value()
            .attr(&rule.attribute)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let mut value = raw?;
    if let Some(prefix) = &rule.url_prefix {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            value = format!("{prefix}{value}");
        }
    }
    Some(value)
}

/// Follow `next_button_selector` to the next list page URL, for
/// [`jh_core::PaginationMode::NextButton`] sites.
pub fn extract_next_url(body: &str, next_button_selector: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let sel = Selector::parse(next_button_selector).ok()?;
    document.select(&sel).next()?.value().attr("href").map(str::to_string)
}

#[cfg(test)]
#[path = "html_strategy_tests.rs"]
mod tests;
