//! Entur API client.
//!
//! Entur runs the national Norwegian journey data platform. Two endpoints
//! are used:
//! - Geocoder autocomplete, to turn free text into candidate places
//! - Journey Planner (GraphQL), to list upcoming departures from a stop
//!
//! Stop place ids look like `NSR:StopPlace:58366`; other Geocoder results
//! (addresses, POIs) have other prefixes and no departures.

mod client;
mod convert;
mod error;
mod types;

pub use client::{
    DEFAULT_CLIENT_NAME, DEFAULT_GEOCODER_URL, DEFAULT_JOURNEY_PLANNER_URL, EnturClient,
    EnturConfig,
};
pub use convert::ConversionError;
pub use error::EnturError;
