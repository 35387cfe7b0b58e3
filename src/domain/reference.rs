use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const TXN_PREFIX: &str = "UPI";
pub const MANDATE_PREFIX: &str = "MND";

/// Generates `<prefix><nanoseconds>` references.
///
/// Values are strictly increasing within a generator even when the clock
/// stalls or steps back. Uniqueness across processes is not guaranteed here;
/// the stores reject a colliding reference with `AlreadyExists`.
#[derive(Debug)]
pub struct ReferenceGenerator {
    prefix: &'static str,
    last: AtomicU64,
}

impl ReferenceGenerator {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            last: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn next_reference(&self) -> String {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .map(|n| n.max(0) as u64)
            .unwrap_or_default();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        format!("{}{}", self.prefix, now.max(previous + 1))
    }
}
