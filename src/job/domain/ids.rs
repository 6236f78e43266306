//! Identifier and validated scalar types for the job domain.

use super::JobDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Longest accepted job token. Legacy stores used hand-assigned prefixes
/// such as `MCADD_001`, so parsing is deliberately permissive.
const MAX_JOB_ID_LEN: usize = 64;

/// How many characters of UUID hex a generated token keeps.
const GENERATED_TOKEN_LEN: usize = 8;

/// Unique, human-readable token identifying one print job.
///
/// Generated tokens are collision-resistant random values, never derived
/// from the current row count, so concurrent creations cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generates a new random job token (8 uppercase hex characters).
    #[must_use]
    pub fn generate() -> Self {
        let token: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(GENERATED_TOKEN_LEN)
            .collect();
        Self(token.to_ascii_uppercase())
    }

    /// Parses a job token from user or store input.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidJobId`] when the trimmed value is
    /// empty, longer than 64 characters, or contains whitespace.
    pub fn parse(value: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let is_valid = !trimmed.is_empty()
            && trimmed.len() <= MAX_JOB_ID_LEN
            && !trimmed.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(JobDomainError::InvalidJobId(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the token as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase-normalized client email address.
///
/// Normalization makes the case-insensitive lookup required by the store an
/// ordinary equality comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalizes an email address.
    ///
    /// Only the `local@domain` shape is checked: a non-empty local part and
    /// a domain containing at least one dot, with no whitespace anywhere.
    /// Bare hostnames (`ana@localhost`) are rejected. Full RFC 5321
    /// validation is left to the mail transport.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidEmailAddress`] when the value lacks
    /// a non-empty local part or domain, or contains whitespace.
    pub fn parse(value: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let mut segments = normalized.split('@');
        let local = segments.next().unwrap_or_default();
        let domain = segments.next().unwrap_or_default();
        let has_more_segments = segments.next().is_some();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && domain.contains('.')
            && !has_more_segments
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(JobDomainError::InvalidEmailAddress(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
