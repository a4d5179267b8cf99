//! Transport mode vocabulary.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of transport serving a stop or running a departure.
///
/// The named variants are the modes a user can filter by. Anything else
/// upstream sends is kept verbatim in [`ModeTag::Other`] so it can still be
/// displayed, but it never matches a non-empty filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModeTag {
    Bus,
    Metro,
    Tram,
    Rail,
    Ferry,
    Air,
    Other(String),
}

impl ModeTag {
    /// Map a Journey Planner `transportMode` value.
    ///
    /// Regional, long-distance, airport express and coach services are all
    /// folded into [`ModeTag::Rail`]; water transport becomes
    /// [`ModeTag::Ferry`].
    pub fn from_transport_mode(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "bus" => ModeTag::Bus,
            "metro" => ModeTag::Metro,
            "tram" => ModeTag::Tram,
            "rail" | "train" | "regionaltrain" | "longdistancetrain" | "airportexpress"
            | "coach" => ModeTag::Rail,
            "water" | "watertransport" | "ferry" => ModeTag::Ferry,
            "air" => ModeTag::Air,
            _ => ModeTag::Other(raw.to_string()),
        }
    }

    /// Map a Geocoder stop place `category` value.
    pub fn from_stop_category(raw: &str) -> Self {
        match raw {
            "onstreetBus" | "busStation" => ModeTag::Bus,
            "metroStation" => ModeTag::Metro,
            "onstreetTram" | "tramStation" => ModeTag::Tram,
            "railStation" => ModeTag::Rail,
            "ferryStop" | "ferryPort" | "harbourPort" => ModeTag::Ferry,
            "airport" => ModeTag::Air,
            other => ModeTag::Other(other.to_string()),
        }
    }

    /// True for modes a filter can select.
    pub fn is_known(&self) -> bool {
        !matches!(self, ModeTag::Other(_))
    }

    /// Lower-case name, or the raw upstream text for unknown modes.
    pub fn as_str(&self) -> &str {
        match self {
            ModeTag::Bus => "bus",
            ModeTag::Metro => "metro",
            ModeTag::Tram => "tram",
            ModeTag::Rail => "rail",
            ModeTag::Ferry => "ferry",
            ModeTag::Air => "air",
            ModeTag::Other(raw) => raw,
        }
    }
}

impl From<String> for ModeTag {
    fn from(raw: String) -> Self {
        ModeTag::from_transport_mode(&raw)
    }
}

impl From<ModeTag> for String {
    fn from(mode: ModeTag) -> Self {
        match mode {
            ModeTag::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ModeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of modes a user asked for. Empty means every mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSet(BTreeSet<ModeTag>);

impl ModeSet {
    /// The unrestricted set.
    pub fn all() -> Self {
        Self::default()
    }

    /// True when no restriction applies.
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    /// Add a mode to the set.
    pub fn insert(&mut self, mode: ModeTag) {
        self.0.insert(mode);
    }

    /// Membership of this exact mode.
    pub fn contains(&self, mode: &ModeTag) -> bool {
        self.0.contains(mode)
    }

    /// Whether a departure of `mode` passes this set.
    ///
    /// Unknown modes only pass the unrestricted set.
    pub fn admits(&self, mode: &ModeTag) -> bool {
        self.is_all() || (mode.is_known() && self.0.contains(mode))
    }

    /// Modes in the set, in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &ModeTag> {
        self.0.iter()
    }
}

impl FromIterator<ModeTag> for ModeSet {
    fn from_iter<I: IntoIterator<Item = ModeTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("all");
        }
        let names: Vec<&str> = self.0.iter().map(ModeTag::as_str).collect();
        f.write_str(&names.join(", "))
    }
}
