//! The fixed, ordered status-stage sequence for print jobs.

use super::ParseStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage in the fixed print-job status sequence.
///
/// Ordering defines both display order and progress coloring. Transitions
/// are deliberately unrestricted: staff may move a job to any stage,
/// including backwards from [`StatusStage::Completed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusStage {
    /// Job received, waiting to be checked.
    Pending,
    /// The submitted document is being reviewed.
    CheckingDocument,
    /// The job is printing.
    Printing,
    /// The finished job is waiting for the client.
    ReadyForPickup,
    /// The job has been handed over.
    Completed,
}

impl StatusStage {
    /// All stages in display order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::CheckingDocument,
        Self::Printing,
        Self::ReadyForPickup,
        Self::Completed,
    ];

    /// The stage every new job starts in.
    pub const INITIAL: Self = Self::Pending;

    /// Returns the canonical storage and display representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::CheckingDocument => "Checking Document",
            Self::Printing => "Printing",
            Self::ReadyForPickup => "Ready for Pickup",
            Self::Completed => "Completed",
        }
    }

    /// Returns this stage's position in the display order, starting at 0.
    #[must_use]
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|stage| *stage == self).unwrap_or(0)
    }

    /// Classifies `stage` relative to this (current) stage for progress
    /// rendering.
    #[must_use]
    pub fn progress_of(self, stage: Self) -> StageProgress {
        match stage.position().cmp(&self.position()) {
            std::cmp::Ordering::Less => StageProgress::Done,
            std::cmp::Ordering::Equal => StageProgress::Active,
            std::cmp::Ordering::Greater => StageProgress::Upcoming,
        }
    }

    /// Returns the client-facing message shown for this stage.
    #[must_use]
    pub const fn client_message(self) -> &'static str {
        match self {
            Self::Pending => "Your job is received and waiting to be checked.",
            Self::CheckingDocument => "We are reviewing your file.",
            Self::Printing => "Your job is printing now.",
            Self::ReadyForPickup => "Your job is ready for pick up.",
            Self::Completed => "Your job is completed. Thank you!",
        }
    }
}

impl TryFrom<&str> for StatusStage {
    type Error = ParseStageError;

    /// Parses a stage name from store or user input.
    ///
    /// Matching is case-insensitive and accepts the legacy "Ready for Pick
    /// Up" spelling that older store revisions wrote; only the canonical
    /// spelling is ever emitted.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "checking document" => Ok(Self::CheckingDocument),
            "printing" => Ok(Self::Printing),
            "ready for pickup" | "ready for pick up" => Ok(Self::ReadyForPickup),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

impl fmt::Display for StatusStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one stage sits relative to a job's current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageProgress {
    /// The job has already passed this stage.
    Done,
    /// This is the job's current stage.
    Active,
    /// The job has not reached this stage yet.
    Upcoming,
}
