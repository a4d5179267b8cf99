//! Upcoming departures from a stop.

use chrono::{DateTime, FixedOffset};

use super::mode::ModeTag;

/// One departure on a stop's board. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureRecord {
    /// Public line code, e.g. "31" or "L1".
    pub line_name: String,
    pub mode: ModeTag,
    /// Front text shown on the vehicle.
    pub destination: String,
    /// Timetabled departure.
    pub scheduled_time: DateTime<FixedOffset>,
    /// Live estimate, present only when the call is tracked in real time.
    pub realtime_time: Option<DateTime<FixedOffset>>,
}

impl DepartureRecord {
    /// The best known departure time: live if available, else timetabled.
    pub fn effective_time(&self) -> DateTime<FixedOffset> {
        self.realtime_time.unwrap_or(self.scheduled_time)
    }

    /// Minutes the live estimate is behind the timetable, if tracked.
    pub fn delay_minutes(&self) -> Option<i64> {
        self.realtime_time
            .map(|rt| (rt - self.scheduled_time).num_minutes())
    }
}
