// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Site and keyword configuration — the declarative, opaque-to-the-core
//! documents the scraper and keyword filter consume.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A field extraction rule for the `html`/`browser` strategies: a CSS
/// selector, what to pull from the matched element, and optional
/// post-processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub selector: String,
    /// `"text"`, `"href"`, or any other element attribute name.
    #[serde(default = "default_attribute")]
    pub attribute: String,
    #[serde(default)]
    pub url_prefix: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

fn default_attribute() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    UrlParam,
    NextButton,
}

/// Recipe for the `api` strategy: templated URL + JSON path + per-field
/// dot-path mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub url_template: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// JSON pointer-ish dot path to the array of listings in the response.
    pub listings_path: String,
    /// field name -> dot path into each listing object.
    pub field_map: HashMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Recipe for the `html` strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlConfig {
    pub list_page_url_template: String,
    pub card_selector: String,
    pub fields: HashMap<String, FieldRule>,
    pub pagination: PaginationMode,
    #[serde(default)]
    pub next_button_selector: Option<String>,
}

/// Recipe for the `browser` strategy: same field schema as `html`, plus a
/// navigation/wait step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub list_page_url_template: String,
    pub card_selector: String,
    pub fields: HashMap<String, FieldRule>,
    pub pagination: PaginationMode,
    #[serde(default)]
    pub next_button_selector: Option<String>,
    pub wait_for_selector: String,
    #[serde(default)]
    pub scroll_for_lazy_content: bool,
}

/// Optional detail-page extraction rules, shared across strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailPageRules {
    pub enabled: bool,
    #[serde(default)]
    pub description_selector: Option<String>,
    #[serde(default)]
    pub requirements_selector: Option<String>,
}

/// Tagged-union strategy payload, selected by the `strategy` field of the
/// site config file. Parse failure on an unknown tag is a clear error
/// rather than silent fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    Api(ApiConfig),
    Html(HtmlConfig),
    Browser(BrowserConfig),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Api(_) => "api",
            Self::Html(_) => "html",
            Self::Browser(_) => "browser",
        }
    }
}

/// Per-site keyword overrides: either a replacement (`override = true`) or
/// additional terms unioned into the global lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordOverride {
    #[serde(default)]
    pub r#override: bool,
    #[serde(default)]
    pub must_have_any: Vec<String>,
    #[serde(default)]
    pub must_not_have: Vec<String>,
    #[serde(default)]
    pub title_must_have_any: Vec<String>,
}

/// One site's declarative scrape configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site_id: String,
    pub name: String,
    pub url: String,
    pub country: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub strategy: Strategy,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub detail_page: Option<DetailPageRules>,
    #[serde(default)]
    pub keywords: Option<KeywordOverride>,
}

fn default_true() -> bool {
    true
}

fn default_max_pages() -> u32 {
    1
}

/// Three ordered keyword rule sequences, case-insensitive substring
/// matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub must_have_any: Vec<String>,
    pub must_not_have: Vec<String>,
    pub title_must_have_any: Vec<String>,
}

impl KeywordConfig {
    /// Merge a per-site override into the global config, following the
    /// `override` flag semantics: replace when `true`,
    /// union (duplicates collapsed, case-insensitive) otherwise.
    pub fn effective(&self, site_override: Option<&KeywordOverride>) -> KeywordConfig {
        let Some(over) = site_override else {
            return self.clone();
        };
        if over.r#override {
            return KeywordConfig {
                must_have_any: over.must_have_any.clone(),
                must_not_have: over.must_not_have.clone(),
                title_must_have_any: over.title_must_have_any.clone(),
            };
        }
        KeywordConfig {
            must_have_any: union_case_insensitive(&self.must_have_any, &over.must_have_any),
            must_not_have: union_case_insensitive(&self.must_not_have, &over.must_not_have),
            title_must_have_any: union_case_insensitive(
                &self.title_must_have_any,
                &over.title_must_have_any,
            ),
        }
    }
}

fn union_case_insensitive(base: &[String], extra: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for kw in base.iter().chain(extra.iter()) {
        if seen.insert(kw.to_lowercase()) {
            out.push(kw.clone());
        }
    }
    out
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
