//! Departure filtering.
//!
//! Reduces a stop's raw departures to the modes the user asked for and puts
//! them in time order.

use crate::domain::{DepartureRecord, ModeSet, StopId};
use crate::entur::EnturError;

/// Source of upcoming departures for a stop.
pub trait DepartureSource {
    /// Fetch near-term departures from `stop_id`, in any order.
    fn departures(&self, stop_id: &StopId) -> Result<Vec<DepartureRecord>, EnturError>;
}

/// Keep departures whose mode is in `requested` and sort them.
///
/// An empty set keeps everything. Departures with an unrecognised mode are
/// only kept by the empty set. The result is ordered by effective time
/// (live estimate if known, else timetable), then line name; records that
/// compare equal keep their input order. This applies to the unrestricted
/// case too, so output order never depends on upstream order.
///
/// Pure: the input is not modified and the same input always gives the same
/// output.
pub fn filter(departures: &[DepartureRecord], requested: &ModeSet) -> Vec<DepartureRecord> {
    let mut kept: Vec<DepartureRecord> = departures
        .iter()
        .filter(|d| requested.admits(&d.mode))
        .cloned()
        .collect();

    kept.sort_by(|a, b| {
        a.effective_time()
            .cmp(&b.effective_time())
            .then_with(|| a.line_name.cmp(&b.line_name))
    });

    kept
}
