use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Clock
///
/// Time source capability for all lifecycle timestamps (created_at,
/// updated_at, deleted_at, last_login_at, token issued-at). Injecting the
/// clock keeps every timestamp deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub type ClockState = Arc<dyn Clock>;
