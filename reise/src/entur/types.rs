//! Entur API response DTOs.
//!
//! These types map directly to the Geocoder and Journey Planner JSON.
//! Almost everything is optional because Entur omits fields freely.

use serde::Deserialize;

/// Geocoder autocomplete response (a GeoJSON feature collection).
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One place suggested by the Geocoder.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: FeatureProperties,
}

/// GeoJSON point geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude]`.
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Properties of a Geocoder feature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    /// Place id, e.g. "NSR:StopPlace:58366".
    pub id: Option<String>,
    pub name: Option<String>,
    /// Display label, e.g. "Jernbanetorget, Oslo".
    pub label: Option<String>,
    pub county: Option<String>,
    /// "venue", "address", "street", ...
    pub layer: Option<String>,
    /// Stop place categories, e.g. "onstreetBus", "metroStation".
    #[serde(default)]
    pub category: Vec<String>,
}

/// Generic GraphQL envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlErrorDto>>,
}

/// One entry in a GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorDto {
    pub message: String,
}

/// `data` of the departures query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturesData {
    pub stop_place: Option<StopPlaceBoard>,
}

/// A stop place with its upcoming calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPlaceBoard {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub estimated_calls: Vec<EstimatedCall>,
}

/// A vehicle's upcoming call at the stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedCall {
    /// Whether `expected_departure_time` comes from live tracking.
    pub realtime: Option<bool>,
    /// Timetabled departure (RFC 3339).
    pub aimed_departure_time: Option<String>,
    /// Expected departure (RFC 3339). Equals aimed when not tracked.
    pub expected_departure_time: Option<String>,
    pub destination_display: Option<DestinationDisplay>,
    pub service_journey: Option<ServiceJourney>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDisplay {
    pub front_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceJourney {
    pub line: Option<Line>,
}

/// The line a call belongs to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Short public code, e.g. "31", "L1".
    pub public_code: Option<String>,
    pub name: Option<String>,
    /// e.g. "bus", "metro", "rail", "water".
    pub transport_mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_geocoder_feature() {
        let json = r#"{
          "type": "FeatureCollection",
          "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [10.75038, 59.911898]},
            "properties": {
              "id": "NSR:StopPlace:4000",
              "name": "Jernbanetorget",
              "label": "Jernbanetorget, Oslo",
              "county": "Oslo",
              "layer": "venue",
              "category": ["onstreetBus", "metroStation", "onstreetTram"]
            }
          }]
        }"#;

        let fc: FeatureCollection = serde_json::from_str(json).unwrap();
        assert_eq!(fc.features.len(), 1);
        let props = &fc.features[0].properties;
        assert_eq!(props.id.as_deref(), Some("NSR:StopPlace:4000"));
        assert_eq!(props.category.len(), 3);
        assert_eq!(
            fc.features[0].geometry.as_ref().unwrap().coordinates,
            vec![10.75038, 59.911898]
        );
    }

    #[test]
    fn parse_empty_collection() {
        let fc: FeatureCollection =
            serde_json::from_str(r#"{"type": "FeatureCollection"}"#).unwrap();
        assert!(fc.features.is_empty());
    }

    #[test]
    fn parse_departure_board() {
        let json = r#"{
          "data": {
            "stopPlace": {
              "id": "NSR:StopPlace:4000",
              "name": "Jernbanetorget",
              "estimatedCalls": [{
                "realtime": true,
                "aimedDepartureTime": "2024-03-15T08:00:00+01:00",
                "expectedDepartureTime": "2024-03-15T08:02:00+01:00",
                "destinationDisplay": {"frontText": "Vestli"},
                "serviceJourney": {
                  "line": {
                    "publicCode": "5",
                    "name": "Vestli - Sognsvann",
                    "transportMode": "metro"
                  }
                }
              }]
            }
          }
        }"#;

        let resp: GraphQlResponse<DeparturesData> = serde_json::from_str(json).unwrap();
        let board = resp.data.unwrap().stop_place.unwrap();
        assert_eq!(board.estimated_calls.len(), 1);
        let call = &board.estimated_calls[0];
        assert_eq!(call.realtime, Some(true));
        let line = call.service_journey.as_ref().unwrap().line.as_ref().unwrap();
        assert_eq!(line.transport_mode.as_deref(), Some("metro"));
    }

    #[test]
    fn parse_graphql_errors() {
        let json = r#"{"errors": [{"message": "Variable 'id' has an invalid value"}]}"#;
        let resp: GraphQlResponse<DeparturesData> = serde_json::from_str(json).unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.errors.unwrap()[0].message, "Variable 'id' has an invalid value");
    }
}
