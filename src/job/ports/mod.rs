//! Port contracts for job tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by job services.

pub mod notifier;
pub mod publisher;
pub mod store;

pub use notifier::{JobNotifier, NotifyError, NotifyResult};
pub use publisher::{ImagePublishError, ImagePublisher, PublishResult, PublishedImage};
pub use store::{JobStore, JobStoreError, JobStoreResult};
