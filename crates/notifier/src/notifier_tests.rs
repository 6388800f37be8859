use super::*;
use crate::transport::{CallbackUpdate, FakeMessageTransport};
use jh_core::JobId;

fn sample_notice(score: u8) -> JobNotice {
    JobNotice {
        job_id: JobId::compute("Engineer", "Acme", "Remote"),
        title: "Engineer".into(),
        company: "Acme".into(),
        location: "Remote".into(),
        url: "https://acme.example/jobs/1".into(),
        score,
        reasoning: "ok".into(),
        resume_pdf_path: None,
        prior_applications_at_company: Vec::new(),
    }
}

#[tokio::test]
async fn route_sends_instant_message_above_threshold() {
    let transport = FakeMessageTransport::new();
    let mut notifier = Notifier::new(transport.clone(), None, Thresholds::default());
    let outcome = notifier.route(sample_notice(92)).await;
    assert_eq!(outcome.channel, NotificationChannel::Instant);
    assert!(outcome.telegram_sent);
    assert_eq!(transport.sent_messages().len(), 1);
}

#[tokio::test]
async fn route_queues_digest_band_without_sending() {
    let transport = FakeMessageTransport::new();
    let mut notifier = Notifier::new(transport.clone(), None, Thresholds::default());
    let outcome = notifier.route(sample_notice(71)).await;
    assert_eq!(outcome.channel, NotificationChannel::Digest);
    assert!(!outcome.telegram_sent);
    assert!(transport.sent_messages().is_empty());
}

#[tokio::test]
async fn route_discards_below_log_threshold() {
    let transport = FakeMessageTransport::new();
    let mut notifier = Notifier::new(transport, None, Thresholds::default());
    let outcome = notifier.route(sample_notice(10)).await;
    assert_eq!(outcome.channel, NotificationChannel::Discarded);
}

#[tokio::test]
async fn route_records_telegram_sent_false_on_transport_failure() {
    let transport = FakeMessageTransport::new();
    transport.fail_next_send();
    let mut notifier = Notifier::new(transport, None, Thresholds::default());
    let outcome = notifier.route(sample_notice(92)).await;
    assert_eq!(outcome.channel, NotificationChannel::Instant);
    assert!(!outcome.telegram_sent);
}

#[tokio::test]
async fn flush_digest_clears_queue_without_smtp_configured() {
    let transport = FakeMessageTransport::new();
    let mut notifier = Notifier::new(transport, None, Thresholds::default());
    notifier.route(sample_notice(71)).await;
    notifier.flush_digest().await;
    assert!(notifier.digest_queue.is_empty());
}

#[tokio::test]
async fn poll_feedback_parses_valid_and_drops_invalid_payloads() {
    let transport = FakeMessageTransport::new();
    transport.queue_update(CallbackUpdate { update_id: 1, payload: "applied:not-a-hex-id".into() });
    let job_id = JobId::compute("Engineer", "Acme", "Remote");
    transport.queue_update(CallbackUpdate { update_id: 2, payload: format!("applied:{job_id}") });

    let mut notifier = Notifier::new(transport, None, Thresholds::default());
    let events = notifier.poll_feedback().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].job_id, job_id);
}

#[tokio::test]
async fn poll_feedback_advances_offset_across_calls() {
    let transport = FakeMessageTransport::new();
    let job_id = JobId::compute("Engineer", "Acme", "Remote");
    transport.queue_update(CallbackUpdate { update_id: 1, payload: format!("applied:{job_id}") });

    let mut notifier = Notifier::new(transport.clone(), None, Thresholds::default());
    let first = notifier.poll_feedback().await;
    assert_eq!(first.len(), 1);

    transport.queue_update(CallbackUpdate { update_id: 1, payload: format!("skipped:{job_id}") });
    let second = notifier.poll_feedback().await;
    assert!(second.is_empty(), "stale update below the advanced offset must not be re-delivered");
}

#[tokio::test]
async fn send_health_alert_is_noop_when_nothing_failed() {
    let transport = FakeMessageTransport::new();
    let notifier = Notifier::new(transport.clone(), None, Thresholds::default());
    notifier.send_health_alert(0, 0).await.unwrap();
    assert!(transport.sent_messages().is_empty());
}

#[tokio::test]
async fn send_health_alert_fires_when_errors_present() {
    let transport = FakeMessageTransport::new();
    let notifier = Notifier::new(transport.clone(), None, Thresholds::default());
    notifier.send_health_alert(1, 0).await.unwrap();
    assert_eq!(transport.sent_messages().len(), 1);
}

#[tokio::test]
async fn send_crash_alert_always_fires() {
    let transport = FakeMessageTransport::new();
    let notifier = Notifier::new(transport.clone(), None, Thresholds::default());
    notifier.send_crash_alert("config unreadable").await.unwrap();
    assert!(transport.sent_messages()[0].text.contains("config unreadable"));
}
