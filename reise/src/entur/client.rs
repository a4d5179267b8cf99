//! Entur HTTP client.
//!
//! Blocking client for the Geocoder autocomplete endpoint (stop lookup) and
//! the Journey Planner GraphQL endpoint (departures). Failures are returned
//! as-is; there are no automatic retries.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::{DepartureRecord, Place, StopId};
use crate::filter::DepartureSource;
use crate::resolve::{Candidates, StopDirectory};

use super::convert::{convert_board, convert_features, split_candidates};
use super::error::EnturError;
use super::types::{DeparturesData, FeatureCollection, GraphQlResponse};

/// Default Geocoder autocomplete endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://api.entur.io/geocoder/v1/autocomplete";

/// Default Journey Planner GraphQL endpoint.
pub const DEFAULT_JOURNEY_PLANNER_URL: &str = "https://api.entur.io/journey-planner/v3/graphql";

/// Default value of the `ET-Client-Name` header.
pub const DEFAULT_CLIENT_NAME: &str = "reise-cli";

/// Entur asks every client to identify itself with this header.
const CLIENT_NAME_HEADER: &str = "et-client-name";

/// Characters of an unparsable body to keep in errors.
const BODY_EXCERPT_LEN: usize = 500;

const DEPARTURES_QUERY: &str = r#"
query($id: String!, $timeRange: Int!, $numberOfDepartures: Int!) {
  stopPlace(id: $id) {
    id
    name
    estimatedCalls(timeRange: $timeRange, numberOfDepartures: $numberOfDepartures) {
      realtime
      aimedDepartureTime
      expectedDepartureTime
      destinationDisplay { frontText }
      serviceJourney {
        line { publicCode name transportMode }
      }
    }
  }
}"#;

/// Configuration for the Entur client.
#[derive(Debug, Clone)]
pub struct EnturConfig {
    /// Sent as `ET-Client-Name`
    pub client_name: String,
    /// Geocoder autocomplete URL
    pub geocoder_url: String,
    /// Journey Planner GraphQL URL
    pub journey_planner_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// How far ahead to fetch departures, in seconds
    pub time_range_secs: u32,
    /// Maximum departures per board
    pub num_departures: u32,
    /// Maximum places per directory search
    pub candidate_limit: u32,
}

impl EnturConfig {
    /// Create a config identifying as `client_name`, with default endpoints.
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            journey_planner_url: DEFAULT_JOURNEY_PLANNER_URL.to_string(),
            timeout_secs: 30,
            time_range_secs: 3600,
            num_departures: 20,
            candidate_limit: 20,
        }
    }

    /// Set a custom Geocoder URL.
    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = url.into();
        self
    }

    /// Set a custom Journey Planner URL.
    pub fn with_journey_planner_url(mut self, url: impl Into<String>) -> Self {
        self.journey_planner_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the departure window and count.
    pub fn with_departure_window(mut self, time_range_secs: u32, num_departures: u32) -> Self {
        self.time_range_secs = time_range_secs;
        self.num_departures = num_departures;
        self
    }
}

impl Default for EnturConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_NAME)
    }
}

/// Client for the Entur Geocoder and Journey Planner APIs.
#[derive(Debug, Clone)]
pub struct EnturClient {
    http: Client,
    config: EnturConfig,
}

impl EnturClient {
    /// Create a new Entur client.
    pub fn new(config: EnturConfig) -> Result<Self, EnturError> {
        let mut headers = HeaderMap::new();

        let client_name = HeaderValue::from_str(&config.client_name).map_err(|_| {
            EnturError::InvalidConfig("client name is not a valid header value".into())
        })?;
        headers.insert(HeaderName::from_static(CLIENT_NAME_HEADER), client_name);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &EnturConfig {
        &self.config
    }

    /// Search the Geocoder for places matching `text`, in upstream order.
    pub fn search_places(&self, text: &str) -> Result<Vec<Place>, EnturError> {
        let response = self
            .http
            .get(&self.config.geocoder_url)
            .query(&[
                ("text", text.to_string()),
                ("size", self.config.candidate_limit.to_string()),
                ("lang", "no".to_string()),
            ])
            .send()?;

        let collection: FeatureCollection = read_json(response)?;
        let places = convert_features(&collection.features);

        debug!(text, count = places.len(), "geocoder search");
        Ok(places)
    }

    /// Fetch upcoming departures for a stop place, in upstream order.
    pub fn fetch_departures(&self, stop_id: &StopId) -> Result<Vec<DepartureRecord>, EnturError> {
        let body = json!({
            "query": DEPARTURES_QUERY,
            "variables": {
                "id": stop_id.as_str(),
                "timeRange": self.config.time_range_secs,
                "numberOfDepartures": self.config.num_departures,
            }
        });

        let response = self
            .http
            .post(&self.config.journey_planner_url)
            .json(&body)
            .send()?;

        let response: GraphQlResponse<DeparturesData> = read_json(response)?;

        if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(EnturError::GraphQl(messages.join("; ")));
        }

        let board = response
            .data
            .and_then(|d| d.stop_place)
            .ok_or_else(|| EnturError::UnknownStop(stop_id.to_string()))?;

        let departures = convert_board(&board);
        debug!(stop = %stop_id, count = departures.len(), "fetched departures");
        Ok(departures)
    }
}

/// Check the status and decode a JSON body.
fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, EnturError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(EnturError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(EnturError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text()?;

    serde_json::from_str(&body).map_err(|e| EnturError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_EXCERPT_LEN).collect()),
    })
}

impl StopDirectory for EnturClient {
    fn search(&self, text: &str) -> Result<Candidates, EnturError> {
        Ok(split_candidates(self.search_places(text)?))
    }
}

impl DepartureSource for EnturClient {
    fn departures(&self, stop_id: &StopId) -> Result<Vec<DepartureRecord>, EnturError> {
        self.fetch_departures(stop_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = EnturConfig::new("test-client")
            .with_geocoder_url("http://localhost:8080/geocoder")
            .with_journey_planner_url("http://localhost:8080/graphql")
            .with_timeout(5)
            .with_departure_window(1800, 10);

        assert_eq!(config.client_name, "test-client");
        assert_eq!(config.geocoder_url, "http://localhost:8080/geocoder");
        assert_eq!(config.journey_planner_url, "http://localhost:8080/graphql");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.time_range_secs, 1800);
        assert_eq!(config.num_departures, 10);
    }

    #[test]
    fn config_defaults() {
        let config = EnturConfig::default();

        assert_eq!(config.client_name, DEFAULT_CLIENT_NAME);
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
        assert_eq!(config.journey_planner_url, DEFAULT_JOURNEY_PLANNER_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.time_range_secs, 3600);
        assert_eq!(config.num_departures, 20);
    }

    #[test]
    fn client_creation() {
        assert!(EnturClient::new(EnturConfig::default()).is_ok());
    }

    #[test]
    fn bad_client_name_is_rejected() {
        let result = EnturClient::new(EnturConfig::new("bad\nname"));
        assert!(matches!(result, Err(EnturError::InvalidConfig(_))));
    }

    #[test]
    fn query_asks_for_realtime_fields() {
        for field in ["realtime", "aimedDepartureTime", "expectedDepartureTime", "transportMode"] {
            assert!(DEPARTURES_QUERY.contains(field), "{field}");
        }
    }

    // Talking to the live API needs network access; not exercised here.
}
