//! Domain model for print-job tracking.
//!
//! The job domain models record creation, the fixed status-stage sequence,
//! QR reference forms, and lookup keys while keeping all infrastructure
//! concerns outside of the domain boundary.

mod error;
mod ids;
mod record;
mod stage;

pub use error::{JobDomainError, ParseStageError};
pub use ids::{EmailAddress, JobId};
pub use record::{JobRecord, PersistedJobData, QrReference};
pub use stage::{StageProgress, StatusStage};
