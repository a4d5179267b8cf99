//! Domain types for stop lookup and departures.
//!
//! These types are what the rest of the crate passes around once upstream
//! JSON has been converted. Identifiers enforce their invariants at
//! construction time.

mod departure;
mod mode;
mod normalize;
mod stop;

pub use departure::DepartureRecord;
pub use mode::{ModeSet, ModeTag};
pub use normalize::{collapse_whitespace, normalize};
pub use stop::{InvalidStopId, Place, StopId, StopRecord};

/// A stop lookup as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Free text as entered, e.g. "oslo s".
    pub free_text: String,
    /// Modes to keep when showing departures. Empty means all.
    pub requested_modes: ModeSet,
    /// Ignore the local cache and always ask the directory.
    pub bypass_cache: bool,
}

impl Query {
    /// Create a query for all modes that consults the cache.
    pub fn new(free_text: impl Into<String>) -> Self {
        Self {
            free_text: free_text.into(),
            requested_modes: ModeSet::all(),
            bypass_cache: false,
        }
    }

    /// Restrict departures to the given modes.
    pub fn with_modes(mut self, modes: ModeSet) -> Self {
        self.requested_modes = modes;
        self
    }

    /// Skip the cache for this lookup.
    pub fn bypassing_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }
}
