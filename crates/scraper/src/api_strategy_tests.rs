use super::*;

#[test]
fn substitute_page_replaces_placeholder() {
    assert_eq!(substitute_page("https://api.example/jobs?page={page}", 3), "https://api.example/jobs?page=3");
}

#[test]
fn substitute_page_is_noop_without_placeholder() {
    assert_eq!(substitute_page("https://api.example/jobs", 3), "https://api.example/jobs");
}

fn sample_config() -> ApiConfig {
    let mut field_map = std::collections::HashMap::new();
    field_map.insert("title".to_string(), "position.title".to_string());
    field_map.insert("company".to_string(), "company_name".to_string());
    field_map.insert("location".to_string(), "position.location".to_string());
    field_map.insert("url".to_string(), "apply_url".to_string());

    ApiConfig {
        url_template: "https://api.example/jobs?page={page}".to_string(),
        method: "GET".to_string(),
        params: std::collections::HashMap::new(),
        headers: std::collections::HashMap::new(),
        listings_path: "data.listings".to_string(),
        field_map,
    }
}

#[test]
fn parse_listings_navigates_dot_path_and_maps_fields() {
    let body = serde_json::json!({
        "data": {
            "listings": [
                {
                    "position": {"title": "Senior Rust Engineer", "location": "Remote"},
                    "company_name": "Acme Corp",
                    "apply_url": "https://acme.example/jobs/1",
                }
            ]
        }
    })
    .to_string();

    let rows = parse_listings(&body, &sample_config()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title.as_deref(), Some("Senior Rust Engineer"));
    assert_eq!(rows[0].company.as_deref(), Some("Acme Corp"));
    assert_eq!(rows[0].location.as_deref(), Some("Remote"));
    assert_eq!(rows[0].url.as_deref(), Some("https://acme.example/jobs/1"));
}

#[test]
fn parse_listings_missing_path_yields_empty_vec() {
    let body = serde_json::json!({"data": {}}).to_string();
    let rows = parse_listings(&body, &sample_config()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn parse_listings_rejects_malformed_json() {
    let err = parse_listings("not json", &sample_config()).unwrap_err();
    assert!(matches!(err, ScrapeError::Json(_)));
}
