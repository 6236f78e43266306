//! Application services for job tracking orchestration.

mod status_page;
mod tracking;

pub use status_page::{StatusPageError, StatusPageRenderer};
pub use tracking::{
    CreateJobRequest, CreateJobWarning, CreatedJob, JobStatusView, LookupKey, StageView,
    StatusView, TrackingError, TrackingResult, TrackingService,
};
