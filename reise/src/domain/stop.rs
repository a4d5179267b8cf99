//! Stop identifiers and records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::mode::ModeTag;

/// Prefix Entur uses for stop place ids in the national stop register.
const STOP_PLACE_PREFIX: &str = "NSR:StopPlace:";

/// Error returned when parsing an invalid stop id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// Opaque identifier of a place in the remote directory.
///
/// The only guarantee is that the id is non-empty and has no surrounding
/// whitespace. Ids are compared verbatim.
///
/// # Examples
///
/// ```
/// use reise::domain::StopId;
///
/// let id = StopId::parse("NSR:StopPlace:58366").unwrap();
/// assert!(id.is_stop_place());
///
/// assert!(StopId::parse("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }
        Ok(StopId(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for stop places (as opposed to addresses, POIs and so on).
    pub fn is_stop_place(&self) -> bool {
        self.0.starts_with(STOP_PLACE_PREFIX)
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StopId::parse(&s)
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stop saved in the local cache under a user-facing alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    /// Key in the cache. Unique, also after normalization.
    pub alias: String,
    /// Name as the directory reports it, e.g. "Jernbanetorget".
    pub canonical_name: String,
    /// Never changes once the record is cached.
    pub stop_id: StopId,
    /// Full display label, e.g. "Jernbanetorget, Oslo".
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub county: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Modes serving the stop, in upstream order, without duplicates.
    #[serde(default)]
    pub modes_available: Vec<ModeTag>,
}

impl StopRecord {
    /// Copy of this record under another alias.
    pub fn with_alias(&self, alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..self.clone()
        }
    }
}

/// A candidate place returned by the remote directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub stop_id: StopId,
    pub name: String,
    pub label: String,
    pub county: String,
    /// Directory layer, e.g. "venue" for stop places or "address".
    pub layer: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub modes: Vec<ModeTag>,
}

impl Place {
    /// Whether the place is a stop with departures.
    pub fn is_stop(&self) -> bool {
        self.stop_id.is_stop_place()
    }

    /// Turn the candidate into a cache record under `alias`.
    pub fn into_record(self, alias: impl Into<String>) -> StopRecord {
        StopRecord {
            alias: alias.into(),
            canonical_name: self.name,
            stop_id: self.stop_id,
            label: self.label,
            county: self.county,
            latitude: self.latitude,
            longitude: self.longitude,
            modes_available: self.modes,
        }
    }

    /// One-line description used when asking the user to choose.
    pub fn choice_label(&self) -> String {
        if self.county.is_empty() || self.label.contains(&self.county) {
            self.label.clone()
        } else {
            format!("{} ({})", self.label, self.county)
        }
    }
}
