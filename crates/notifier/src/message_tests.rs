use super::*;
use jh_core::JobId;

fn sample_notice() -> JobNotice {
    JobNotice {
        job_id: JobId::compute("Senior Rust Engineer", "Acme Corp", "Remote"),
        title: "Senior Rust Engineer".into(),
        company: "Acme Corp".into(),
        location: "Remote".into(),
        url: "https://acme.example/jobs/1".into(),
        score: 85,
        reasoning: "Strong match on Rust and distributed systems experience.".into(),
        resume_pdf_path: None,
        prior_applications_at_company: Vec::new(),
    }
}

#[test]
fn channel_for_score_routes_instant_at_or_above_threshold() {
    let t = Thresholds::default();
    assert_eq!(channel_for_score(80, &t), NotificationChannel::Instant);
    assert_eq!(channel_for_score(100, &t), NotificationChannel::Instant);
}

#[test]
fn channel_for_score_routes_digest_band() {
    let t = Thresholds::default();
    assert_eq!(channel_for_score(60, &t), NotificationChannel::Digest);
    assert_eq!(channel_for_score(79, &t), NotificationChannel::Digest);
}

#[test]
fn channel_for_score_routes_log_band() {
    let t = Thresholds::default();
    assert_eq!(channel_for_score(40, &t), NotificationChannel::Log);
    assert_eq!(channel_for_score(59, &t), NotificationChannel::Log);
}

#[test]
fn channel_for_score_below_log_is_discarded() {
    let t = Thresholds::default();
    assert_eq!(channel_for_score(0, &t), NotificationChannel::Discarded);
    assert_eq!(channel_for_score(39, &t), NotificationChannel::Discarded);
}

#[test]
fn format_instant_message_includes_resume_path_when_present() {
    let mut notice = sample_notice();
    notice.resume_pdf_path = Some("output/resumes/acme_1.pdf".into());
    let text = format_instant_message(&notice);
    assert!(text.contains("Tailored résumé: output/resumes/acme_1.pdf"));
}

#[test]
fn format_instant_message_omits_resume_section_when_absent() {
    let text = format_instant_message(&sample_notice());
    assert!(!text.contains("Tailored résumé"));
}

#[test]
fn format_instant_message_embeds_prior_applications_block() {
    let mut notice = sample_notice();
    notice.prior_applications_at_company = vec!["Applied 2026-05-01, rejected".to_string()];
    let text = format_instant_message(&notice);
    assert!(text.contains("Prior applications at this company"));
    assert!(text.contains("Applied 2026-05-01, rejected"));
}

#[test]
fn instant_message_buttons_embed_action_and_job_id() {
    let notice = sample_notice();
    let buttons = instant_message_buttons(notice.job_id);
    assert_eq!(buttons.len(), 3);
    assert_eq!(buttons[0].1, format!("applied:{}", notice.job_id));
    assert_eq!(buttons[1].1, format!("skip:{}", notice.job_id));
    assert_eq!(buttons[2].1, format!("not_relevant:{}", notice.job_id));
}
