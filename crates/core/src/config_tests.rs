// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn global() -> KeywordConfig {
    KeywordConfig {
        must_have_any: vec!["rust".into(), "systems".into()],
        must_not_have: vec!["unpaid".into()],
        title_must_have_any: vec!["engineer".into()],
    }
}

#[test]
fn effective_with_no_override_returns_global() {
    let eff = global().effective(None);
    assert_eq!(eff, global());
}

#[test]
fn effective_override_true_replaces_lists() {
    let over = KeywordOverride {
        r#override: true,
        must_have_any: vec!["golang".into()],
        must_not_have: vec![],
        title_must_have_any: vec![],
    };
    let eff = global().effective(Some(&over));
    assert_eq!(eff.must_have_any, vec!["golang".to_string()]);
    assert!(eff.title_must_have_any.is_empty());
}

#[test]
fn effective_override_false_unions_and_dedupes_case_insensitively() {
    let over = KeywordOverride {
        r#override: false,
        must_have_any: vec!["RUST".into(), "golang".into()],
        must_not_have: vec![],
        title_must_have_any: vec![],
    };
    let eff = global().effective(Some(&over));
    assert_eq!(eff.must_have_any, vec!["rust".to_string(), "systems".to_string(), "golang".to_string()]);
}

#[test]
fn strategy_deserializes_by_tag() {
    let json = serde_json::json!({
        "strategy": "api",
        "url_template": "https://example.com/{page}",
        "listings_path": "data.jobs",
        "field_map": {},
    });
    let strategy: Strategy = serde_json::from_value(json).unwrap();
    assert_eq!(strategy.name(), "api");
    assert!(matches!(strategy, Strategy::Api(_)));
}

#[test]
fn site_config_defaults_enabled_and_max_pages() {
    let json = serde_json::json!({
        "site_id": "site1",
        "name": "Site One",
        "url": "https://example.com",
        "country": "NL",
        "strategy": "html",
        "list_page_url_template": "https://example.com?page={page}",
        "card_selector": ".card",
        "fields": {},
        "pagination": "url_param",
    });
    let cfg: SiteConfig = serde_json::from_value(json).unwrap();
    assert!(cfg.enabled);
    assert_eq!(cfg.max_pages, 1);
}
