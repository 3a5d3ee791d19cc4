use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Nanosecond timestamp attached to observer events to measure end-to-end latency.
///
/// A default-constructed tag captures the current wall clock; transports construct tags from
/// the network receive timestamp so downstream consumers see true wire latency.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Deserialize, Serialize)]
pub struct ProfilingTag(pub u64);

impl ProfilingTag {
    /// Capture the current wall clock.
    pub fn now() -> Self {
        Self(unix_time_ns())
    }

    /// Tag an event with a previously captured nanosecond timestamp.
    pub fn from_ns(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn as_ns(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> u64 {
        self.0 / 1_000_000
    }
}

impl Default for ProfilingTag {
    fn default() -> Self {
        Self::now()
    }
}

/// Nanoseconds since the unix epoch.
pub fn unix_time_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
