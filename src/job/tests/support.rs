//! Shared fixtures for job tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::auth::{AdminCredentials, AdminSession};

/// Clock pinned to a known instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// 2024-05-01 10:00:00 UTC, used across the suites.
    pub fn may_morning() -> Self {
        Self(
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
                .single()
                .expect("valid fixture timestamp"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Issues a real session the way the application layer would.
pub fn admin_session() -> AdminSession {
    AdminCredentials::new("test-password")
        .authenticate("test-password")
        .expect("fixture password matches")
}
