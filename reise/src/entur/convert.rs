//! Conversion from Entur DTOs to domain types.

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use crate::domain::{DepartureRecord, ModeTag, Place, StopId};
use crate::resolve::Candidates;

use super::types::{EstimatedCall, Feature, StopPlaceBoard};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to parse a timestamp
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Failed to parse a place id
    #[error("invalid place id: {0}")]
    InvalidId(String),
}

/// Convert Geocoder features to places, keeping upstream order.
///
/// Features without a usable id are skipped.
pub fn convert_features(features: &[Feature]) -> Vec<Place> {
    features
        .iter()
        .filter_map(|feature| match convert_feature(feature) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!(error = %e, "skipping geocoder feature");
                None
            }
        })
        .collect()
}

/// Split Geocoder places into stop places and the labels of everything
/// else, both in upstream order.
///
/// Only `NSR:StopPlace:` ids have departure boards; addresses and POIs are
/// kept as suggestions.
pub fn split_candidates(places: Vec<Place>) -> Candidates {
    let (stops, others): (Vec<Place>, Vec<Place>) =
        places.into_iter().partition(Place::is_stop);
    Candidates {
        stops,
        others: others.into_iter().map(|p| p.label).collect(),
    }
}

/// Convert a single Geocoder feature.
pub fn convert_feature(feature: &Feature) -> Result<Place, ConversionError> {
    let props = &feature.properties;

    let raw_id = props.id.as_deref().ok_or(ConversionError::MissingField("id"))?;
    let stop_id =
        StopId::parse(raw_id).map_err(|_| ConversionError::InvalidId(raw_id.to_string()))?;

    let name = props.name.clone().unwrap_or_default();
    let label = props.label.clone().unwrap_or_else(|| name.clone());

    // GeoJSON order is [lon, lat]
    let (longitude, latitude) = match feature.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
        Some([lon, lat, ..]) => (Some(*lon), Some(*lat)),
        _ => (None, None),
    };

    let mut modes: Vec<ModeTag> = Vec::new();
    for mode in props.category.iter().map(|c| ModeTag::from_stop_category(c)) {
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }

    Ok(Place {
        stop_id,
        name,
        label,
        county: props.county.clone().unwrap_or_default(),
        layer: props.layer.clone().unwrap_or_default(),
        latitude,
        longitude,
        modes,
    })
}

/// Convert a stop place board to departures, keeping upstream order.
///
/// Calls that cannot be converted are logged and skipped rather than
/// failing the whole board.
pub fn convert_board(board: &StopPlaceBoard) -> Vec<DepartureRecord> {
    board
        .estimated_calls
        .iter()
        .filter_map(|call| match convert_call(call) {
            Ok(dep) => Some(dep),
            Err(e) => {
                warn!(
                    stop = board.id.as_deref().unwrap_or("?"),
                    error = %e,
                    "skipping estimated call"
                );
                None
            }
        })
        .collect()
}

/// Convert a single estimated call.
pub fn convert_call(call: &EstimatedCall) -> Result<DepartureRecord, ConversionError> {
    let aimed = call.aimed_departure_time.as_deref().map(parse_time).transpose()?;
    let expected = call
        .expected_departure_time
        .as_deref()
        .map(parse_time)
        .transpose()?;

    let scheduled_time = aimed
        .or(expected)
        .ok_or(ConversionError::MissingField("aimedDepartureTime"))?;

    // Expected time only counts as live when the call is tracked
    let realtime_time = if call.realtime == Some(true) { expected } else { None };

    let line = call.service_journey.as_ref().and_then(|sj| sj.line.as_ref());
    let line_name = line
        .and_then(|l| l.public_code.clone().filter(|c| !c.is_empty()))
        .or_else(|| line.and_then(|l| l.name.clone()))
        .unwrap_or_else(|| "?".to_string());
    let mode = line
        .and_then(|l| l.transport_mode.as_deref())
        .map(ModeTag::from_transport_mode)
        .unwrap_or_else(|| ModeTag::Other("unknown".to_string()));

    let destination = call
        .destination_display
        .as_ref()
        .and_then(|d| d.front_text.clone())
        .unwrap_or_default();

    Ok(DepartureRecord {
        line_name,
        mode,
        destination,
        scheduled_time,
        realtime_time,
    })
}

fn parse_time(s: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    DateTime::parse_from_rfc3339(s).map_err(|_| ConversionError::InvalidTime(s.to_string()))
}
