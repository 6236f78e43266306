//! Session-scoped admin authentication.
//!
//! Staff-only service operations take an [`AdminSession`] value as proof of
//! authentication. The session is an ordinary value owned by the caller's
//! browser-session context: it disappears when that context does, is never
//! persisted, and there is no process-wide logged-in flag.

use thiserror::Error;

/// Error returned when authentication fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("wrong admin password")]
pub struct AuthError;

/// The configured admin password, held by the application context.
#[derive(Clone)]
pub struct AdminCredentials {
    password: String,
}

impl AdminCredentials {
    /// Creates credentials from the configured password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Checks `attempt` and issues a session on success.
    ///
    /// The comparison runs in constant time over the attempt so response
    /// timing does not leak how much of the password matched.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the attempt does not match.
    pub fn authenticate(&self, attempt: &str) -> Result<AdminSession, AuthError> {
        if constant_time_eq(self.password.as_bytes(), attempt.as_bytes()) {
            Ok(AdminSession { _private: () })
        } else {
            Err(AuthError)
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials").finish_non_exhaustive()
    }
}

/// Proof that the holder authenticated as admin within this session.
///
/// Not `Clone` and not constructible outside [`AdminCredentials`]: every
/// session comes from a password check and cannot outlive the context that
/// holds it.
#[derive(Debug)]
pub struct AdminSession {
    _private: (),
}

/// Byte comparison without early exit on mismatch.
fn constant_time_eq(expected: &[u8], attempt: &[u8]) -> bool {
    let mut difference = u8::from(expected.len() != attempt.len());
    for (index, byte) in attempt.iter().enumerate() {
        let position = index.checked_rem(expected.len()).unwrap_or(0);
        let reference = expected.get(position).copied().unwrap_or(0);
        difference |= byte ^ reference;
    }
    difference == 0
}
