//! Stop resolution.
//!
//! Turns free text into exactly one cached stop. The local cache is asked
//! first; on a miss the remote directory is searched and, when more than one
//! stop comes back, the user picks one. The pick is written through to the
//! cache so the next lookup with the same text needs no network.

mod alias;
mod resolver;


pub use alias::derive_alias;
pub use resolver::{Resolution, ResolutionSource, Resolver};

use crate::domain::Place;
use crate::entur::EnturError;
use crate::store::StoreError;

/// How many non-stop places to suggest when no stop matched.
pub const MAX_SUGGESTIONS: usize = 5;

/// What a directory search found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates {
    /// Stops the text may refer to, in directory order.
    pub stops: Vec<Place>,
    /// Labels of other matching places (addresses, POIs). Only used as
    /// suggestions when no stop matched.
    pub others: Vec<String>,
}

impl Candidates {
    /// Candidates that are all stops.
    pub fn stops(stops: Vec<Place>) -> Self {
        Self {
            stops,
            others: Vec::new(),
        }
    }
}

/// Source of candidate stops for free text.
pub trait StopDirectory {
    /// Search for stops matching `text`.
    ///
    /// Every returned stop is offered as is; deciding what counts as a stop
    /// is up to the directory. Results keep the directory's order. An empty
    /// result is not an error.
    fn search(&self, text: &str) -> Result<Candidates, EnturError>;
}

/// Errors that can occur during resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The directory returned no stop places
    #[error("no stop places found for '{query}'")]
    NoMatch {
        query: String,
        /// Labels of other places the directory did find
        suggestions: Vec<String>,
    },

    /// The user declined to pick a candidate
    #[error("no stop selected")]
    UserAborted,

    /// The directory could not be queried
    #[error("transit directory unavailable: {0}")]
    DirectoryUnavailable(#[from] EnturError),

    /// Writing the chosen stop to the cache failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
