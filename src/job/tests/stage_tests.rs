//! Tests for the status stage sequence, parsing, and progress mapping.

use rstest::rstest;

use crate::job::domain::{StageProgress, StatusStage};

#[rstest]
#[case(StatusStage::Pending, "Pending")]
#[case(StatusStage::CheckingDocument, "Checking Document")]
#[case(StatusStage::Printing, "Printing")]
#[case(StatusStage::ReadyForPickup, "Ready for Pickup")]
#[case(StatusStage::Completed, "Completed")]
fn canonical_labels_round_trip(#[case] stage: StatusStage, #[case] label: &str) {
    assert_eq!(stage.as_str(), label);
    assert_eq!(StatusStage::try_from(label), Ok(stage));
}

#[rstest]
#[case("pending", StatusStage::Pending)]
#[case("PRINTING", StatusStage::Printing)]
#[case("  Completed  ", StatusStage::Completed)]
#[case("Ready for Pick Up", StatusStage::ReadyForPickup)]
#[case("ready for pick up", StatusStage::ReadyForPickup)]
fn parsing_tolerates_case_padding_and_legacy_spelling(
    #[case] raw: &str,
    #[case] expected: StatusStage,
) {
    assert_eq!(StatusStage::try_from(raw), Ok(expected));
}

#[test]
fn unknown_stage_names_are_rejected_verbatim() {
    let err = StatusStage::try_from("Shipped").expect_err("unknown stage");
    assert_eq!(err.0, "Shipped");
}

#[test]
fn display_order_is_stable() {
    assert_eq!(StatusStage::INITIAL, StatusStage::Pending);
    let positions: Vec<usize> = StatusStage::ALL.iter().map(|s| s.position()).collect();
    assert_eq!(positions, vec![0, 1, 2, 3, 4]);
}

#[rstest]
#[case(StatusStage::Printing, StatusStage::Pending, StageProgress::Done)]
#[case(StatusStage::Printing, StatusStage::CheckingDocument, StageProgress::Done)]
#[case(StatusStage::Printing, StatusStage::Printing, StageProgress::Active)]
#[case(StatusStage::Printing, StatusStage::ReadyForPickup, StageProgress::Upcoming)]
#[case(StatusStage::Pending, StatusStage::Pending, StageProgress::Active)]
#[case(StatusStage::Completed, StatusStage::Pending, StageProgress::Done)]
fn progress_classification_follows_display_order(
    #[case] current: StatusStage,
    #[case] stage: StatusStage,
    #[case] expected: StageProgress,
) {
    assert_eq!(current.progress_of(stage), expected);
}

#[test]
fn every_stage_carries_a_client_message() {
    for stage in StatusStage::ALL {
        assert!(!stage.client_message().is_empty());
    }
    assert_eq!(
        StatusStage::ReadyForPickup.client_message(),
        "Your job is ready for pick up."
    );
}
