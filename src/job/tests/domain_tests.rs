//! Unit tests for job domain values and the record aggregate.

use std::collections::HashSet;

use rstest::rstest;

use super::support::FixedClock;
use crate::job::domain::{
    EmailAddress, JobDomainError, JobId, JobRecord, QrReference, StatusStage,
};

#[test]
fn generated_job_ids_are_short_uppercase_hex() {
    let id = JobId::generate();
    assert_eq!(id.as_str().len(), 8);
    assert!(
        id.as_str()
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_ascii_uppercase())
    );
}

#[test]
fn generated_job_ids_do_not_collide() {
    let ids: HashSet<String> = (0..100).map(|_| JobId::generate().to_string()).collect();
    assert_eq!(ids.len(), 100);
}

#[rstest]
#[case("A3F0C2D1")]
#[case("MCADD_001")]
#[case("  padded  ")]
fn parse_accepts_reasonable_tokens(#[case] raw: &str) {
    let id = JobId::parse(raw).expect("token should parse");
    assert_eq!(id.as_str(), raw.trim());
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("two words")]
fn parse_rejects_empty_and_spaced_tokens(#[case] raw: &str) {
    assert!(matches!(
        JobId::parse(raw),
        Err(JobDomainError::InvalidJobId(_))
    ));
}

#[test]
fn email_addresses_normalize_to_lowercase() {
    let email = EmailAddress::parse(" Ana.Cruz@Example.COM ").expect("valid address");
    assert_eq!(email.as_str(), "ana.cruz@example.com");
}

#[rstest]
#[case("not-an-email")]
#[case("@example.com")]
#[case("ana@")]
#[case("ana@nodot")]
#[case("ana@localhost")]
#[case("a@b@c.com")]
fn malformed_email_addresses_are_rejected(#[case] raw: &str) {
    assert!(matches!(
        EmailAddress::parse(raw),
        Err(JobDomainError::InvalidEmailAddress(_))
    ));
}

#[test]
fn qr_reference_parses_all_three_cell_forms() {
    assert_eq!(
        QrReference::parse_cell("=IMAGE(\"https://i.example/qr.png\")"),
        Some(QrReference::SheetFormula("https://i.example/qr.png".to_owned()))
    );
    assert_eq!(
        QrReference::parse_cell("https://i.example/qr.png"),
        Some(QrReference::ImageUrl("https://i.example/qr.png".to_owned()))
    );
    assert_eq!(
        QrReference::parse_cell("qrcodes/A3F0C2D1.png"),
        Some(QrReference::LocalPath("qrcodes/A3F0C2D1.png".to_owned()))
    );
    assert_eq!(QrReference::parse_cell("   "), None);
}

#[test]
fn qr_reference_cells_round_trip() {
    let formula = QrReference::SheetFormula("https://i.example/qr.png".to_owned());
    assert_eq!(formula.as_cell(), "=IMAGE(\"https://i.example/qr.png\")");
    assert_eq!(QrReference::parse_cell(&formula.as_cell()), Some(formula));
}

#[test]
fn image_url_is_absent_for_local_paths() {
    let local = QrReference::LocalPath("qrcodes/x.png".to_owned());
    assert_eq!(local.image_url(), None);
    let hosted = QrReference::ImageUrl("https://i.example/qr.png".to_owned());
    assert_eq!(hosted.image_url(), Some("https://i.example/qr.png"));
}

#[test]
fn new_records_start_pending_at_the_clock_instant() {
    let clock = FixedClock::may_morning();
    let record =
        JobRecord::new("  Ana Cruz  ", " invoice.pdf ", None, &clock).expect("valid record");
    assert_eq!(record.client_name(), "Ana Cruz");
    assert_eq!(record.file_name(), "invoice.pdf");
    assert_eq!(record.status(), StatusStage::Pending);
    assert_eq!(record.created_at(), clock.0);
    assert!(record.qr_reference().is_none());
    assert!(record.client_email().is_none());
}

#[test]
fn empty_required_fields_are_rejected() {
    let clock = FixedClock::may_morning();
    assert_eq!(
        JobRecord::new("  ", "invoice.pdf", None, &clock),
        Err(JobDomainError::EmptyClientName)
    );
    assert_eq!(
        JobRecord::new("Ana Cruz", "  ", None, &clock),
        Err(JobDomainError::EmptyFileName)
    );
}

#[test]
fn only_status_and_qr_reference_are_mutable() {
    let clock = FixedClock::may_morning();
    let mut record = JobRecord::new("Ana Cruz", "invoice.pdf", None, &clock).expect("valid record");
    let created_at = record.created_at();

    record.set_status(StatusStage::Printing);
    record.set_qr_reference(QrReference::ImageUrl("https://i.example/qr.png".to_owned()));

    assert_eq!(record.status(), StatusStage::Printing);
    assert_eq!(record.created_at(), created_at);
    assert!(record.qr_reference().is_some());
}
