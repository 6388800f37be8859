use super::*;
use std::sync::Mutex;

/// Scripted transport: each provider name maps to a queue of canned
/// responses, popped in order. `Err` entries simulate a transport-level
/// failure for that call.
struct ScriptedTransport {
    scripts: Mutex<std::collections::HashMap<String, Vec<Result<String, ProviderError>>>>,
}

impl ScriptedTransport {
    fn new(scripts: Vec<(&str, Vec<Result<String, ProviderError>>)>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        provider: &ProviderConfig,
        _messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts
            .get_mut(&provider.name)
            .expect("unscripted provider call");
        assert!(!queue.is_empty(), "script exhausted for provider {}", provider.name);
        queue.remove(0)
    }
}

fn provider(name: &str) -> ProviderConfig {
    ProviderConfig {
        name: name.into(),
        base_url: "https://example.invalid".into(),
        model: "test-model".into(),
        api_key: None,
    }
}

fn ok_body(content: &str) -> String {
    serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}

#[tokio::test]
async fn first_provider_success_short_circuits() {
    let transport = ScriptedTransport::new(vec![("primary", vec![Ok(ok_body("hello"))])]);
    let client = ModelClient::new(vec![provider("primary")], Box::new(transport));
    let result = client.complete(&[ChatMessage::user("hi")], CompletionOptions::default()).await.unwrap();
    assert_eq!(result.content, "hello");
    assert_eq!(result.provider, "primary");
}

#[tokio::test]
async fn falls_through_to_next_provider_on_transport_error() {
    let transport = ScriptedTransport::new(vec![
        ("primary", vec![Err(ProviderError::Transport("boom".into()))]),
        ("fallback", vec![Ok(ok_body("from fallback"))]),
    ]);
    let client = ModelClient::new(vec![provider("primary"), provider("fallback")], Box::new(transport));
    let result = client.complete(&[ChatMessage::user("hi")], CompletionOptions::default()).await.unwrap();
    assert_eq!(result.provider, "fallback");
}

#[tokio::test]
async fn falls_through_on_non_2xx_status() {
    let transport = ScriptedTransport::new(vec![
        ("primary", vec![Err(ProviderError::Status(500))]),
        ("fallback", vec![Ok(ok_body("from fallback"))]),
    ]);
    let client = ModelClient::new(vec![provider("primary"), provider("fallback")], Box::new(transport));
    let result = client.complete(&[ChatMessage::user("hi")], CompletionOptions::default()).await.unwrap();
    assert_eq!(result.provider, "fallback");
}

#[tokio::test]
async fn json_mode_retries_same_provider_once_then_succeeds() {
    let transport = ScriptedTransport::new(vec![(
        "primary",
        vec![Ok(ok_body("not json")), Ok(ok_body(r#"{"score": 80}"#))],
    )]);
    let client = ModelClient::new(vec![provider("primary")], Box::new(transport));
    let result = client
        .complete(&[ChatMessage::user("hi")], CompletionOptions { json_mode: true })
        .await
        .unwrap();
    assert_eq!(result.content, r#"{"score": 80}"#);
    assert_eq!(result.provider, "primary");
}

#[tokio::test]
async fn json_mode_falls_through_after_retry_still_invalid() {
    let transport = ScriptedTransport::new(vec![
        ("primary", vec![Ok(ok_body("not json")), Ok(ok_body("still not json"))]),
        ("fallback", vec![Ok(ok_body(r#"{"score": 50}"#))]),
    ]);
    let client = ModelClient::new(vec![provider("primary"), provider("fallback")], Box::new(transport));
    let result = client
        .complete(&[ChatMessage::user("hi")], CompletionOptions { json_mode: true })
        .await
        .unwrap();
    assert_eq!(result.provider, "fallback");
}

#[tokio::test]
async fn all_providers_failing_raises_distinguished_error() {
    let transport = ScriptedTransport::new(vec![
        ("primary", vec![Err(ProviderError::Status(500))]),
        ("fallback", vec![Err(ProviderError::Transport("down".into()))]),
    ]);
    let client = ModelClient::new(vec![provider("primary"), provider("fallback")], Box::new(transport));
    let err = client.complete(&[ChatMessage::user("hi")], CompletionOptions::default()).await.unwrap_err();
    match err {
        ModelClientError::AllProvidersFailed(failures) => assert_eq!(failures.len(), 2),
        other => panic!("expected AllProvidersFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn no_providers_configured_is_a_distinct_error() {
    let transport = ScriptedTransport::new(vec![]);
    let client = ModelClient::new(vec![], Box::new(transport));
    let err = client.complete(&[ChatMessage::user("hi")], CompletionOptions::default()).await.unwrap_err();
    assert!(matches!(err, ModelClientError::NoProviders));
}

#[tokio::test]
async fn missing_content_path_falls_through() {
    let missing = serde_json::json!({"choices": []}).to_string();
    let transport = ScriptedTransport::new(vec![
        ("primary", vec![Ok(missing)]),
        ("fallback", vec![Ok(ok_body("from fallback"))]),
    ]);
    let client = ModelClient::new(vec![provider("primary"), provider("fallback")], Box::new(transport));
    let result = client.complete(&[ChatMessage::user("hi")], CompletionOptions::default()).await.unwrap();
    assert_eq!(result.provider, "fallback");
}
