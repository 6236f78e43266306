//! Error types for job domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain job values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The job identifier is empty, too long, or contains whitespace.
    #[error("invalid job id: {0:?}")]
    InvalidJobId(String),

    /// The email address does not have a `local@domain` shape.
    #[error("invalid email address: {0:?}")]
    InvalidEmailAddress(String),

    /// The client name is empty after trimming.
    #[error("client name must not be empty")]
    EmptyClientName,

    /// The file name / description is empty after trimming.
    #[error("file name must not be empty")]
    EmptyFileName,
}

/// Error returned while parsing status stages from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status stage: {0}")]
pub struct ParseStageError(pub String);
