use chrono::{DateTime, Utc};

/// Source of the current time for scheduled-publication checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
