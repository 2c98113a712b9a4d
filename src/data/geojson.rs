//! Lenient GeoJSON decoding for the permit feed
//!
//! The document as a whole must be a `FeatureCollection`; individual features
//! are decoded one by one so that a broken record only loses its location.

use crate::{
    core::geo::LatLng,
    data::feature::{Feature, FeatureCollection, FeatureIssue},
    GeometryError, LoadError,
};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: Option<String>,
    features: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<Value>,
    #[serde(default)]
    properties: Option<Value>,
}

/// Parses a GeoJSON `FeatureCollection`.
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection, LoadError> {
    let raw: RawCollection = serde_json::from_str(text)?;

    let features = match (raw.kind.as_deref(), raw.features) {
        (Some("FeatureCollection"), Some(features)) => features,
        (Some("FeatureCollection"), None) => Vec::new(),
        (kind, _) => {
            return Err(LoadError::NotAFeatureCollection(
                kind.unwrap_or("an untyped document").to_string(),
            ))
        }
    };

    let mut parsed = Vec::with_capacity(features.len());
    let mut issues = Vec::new();
    for (index, value) in features.into_iter().enumerate() {
        let (feature, error) = decode_feature(value);
        if let Some(error) = error {
            log::warn!("permit #{index} has no usable location: {error}");
            issues.push(FeatureIssue { index, error });
        }
        parsed.push(feature);
    }

    log::debug!(
        "parsed {} permits ({} without location)",
        parsed.len(),
        issues.len()
    );
    Ok(FeatureCollection::new(parsed, issues))
}

fn decode_feature(value: Value) -> (Feature, Option<GeometryError>) {
    let raw: RawFeature = serde_json::from_value(value).unwrap_or_default();

    let empty = Map::new();
    let props = match &raw.properties {
        Some(Value::Object(map)) => map,
        _ => &empty,
    };

    let (coordinates, error) = match extract_coordinates(raw.geometry.as_ref()) {
        Ok(point) => (Some(point), None),
        Err(error) => (None, Some(error)),
    };

    let feature = Feature {
        coordinates,
        address: text_property(props, "address"),
        permit_number: text_property(props, "permit_num"),
        permit_type: text_property(props, "type"),
        status: text_property(props, "status"),
        issued_date: text_property(props, "issued_date"),
        description: text_property(props, "description"),
    };
    (feature, error)
}

/// Reads `[lng, lat]` positionally from a geometry's `coordinates`.
pub fn extract_coordinates(geometry: Option<&Value>) -> Result<LatLng, GeometryError> {
    let geometry = match geometry {
        None | Some(Value::Null) => return Err(GeometryError::MissingGeometry),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(GeometryError::Malformed(format!(
                "geometry is not an object: {other}"
            )))
        }
    };

    let coordinates = match geometry.get("coordinates") {
        None | Some(Value::Null) => return Err(GeometryError::MissingCoordinates),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(GeometryError::Malformed(format!(
                "coordinates are not an array: {other}"
            )))
        }
    };

    let lng = coordinates.first().and_then(Value::as_f64);
    let lat = coordinates.get(1).and_then(Value::as_f64);
    let (Some(lng), Some(lat)) = (lng, lat) else {
        return Err(GeometryError::Malformed(format!(
            "expected [lng, lat], found {}",
            Value::Array(coordinates.clone())
        )));
    };

    let point = LatLng::from_lng_lat(lng, lat);
    if point.is_valid() {
        Ok(point)
    } else {
        Err(GeometryError::OutOfRange { lat, lng })
    }
}

fn text_property(props: &Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_geojson_parsing() {
        let geojson_str = r#"
        {
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "address": "150 LoDo St, Denver, CO",
                        "permit_num": "2025-DEM-1002",
                        "type": "Demolition",
                        "status": "UNDER_REVIEW",
                        "issued_date": "2025-06-01",
                        "description": "Demolition of residential structure in LoDo"
                    },
                    "geometry": {
                        "type": "Point",
                        "coordinates": [-104.9956, 39.7567]
                    }
                }
            ]
        }
        "#;

        let collection = parse_feature_collection(geojson_str).unwrap();
        assert_eq!(collection.len(), 1);

        let feature = &collection.features()[0];
        assert_eq!(feature.coordinates, Some(LatLng::new(39.7567, -104.9956)));
        assert_eq!(feature.permit_number.as_deref(), Some("2025-DEM-1002"));
        assert_eq!(feature.permit_type.as_deref(), Some("Demolition"));
        assert_eq!(feature.issued_date.as_deref(), Some("2025-06-01"));
        assert!(collection.geometry_errors().is_empty());
    }

    #[test]
    fn test_malformed_feature_is_isolated() {
        let text = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-104.99, 39.7] }, "properties": {} },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": ["x"] }, "properties": { "permit_num": "BAD" } },
                { "type": "Feature", "geometry": null, "properties": null },
                "not a feature"
            ]
        })
        .to_string();

        let collection = parse_feature_collection(&text).unwrap();
        assert_eq!(collection.len(), 4);
        assert_eq!(collection.located().count(), 1);

        let issues = collection.geometry_errors();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].index, 1);
        assert!(matches!(issues[0].error, GeometryError::Malformed(_)));
        assert_eq!(issues[1].error, GeometryError::MissingGeometry);
        assert_eq!(collection.features()[1].permit_number.as_deref(), Some("BAD"));
    }

    #[test]
    fn test_coordinate_errors() {
        assert_eq!(extract_coordinates(None), Err(GeometryError::MissingGeometry));
        assert_eq!(
            extract_coordinates(Some(&json!({ "type": "Point" }))),
            Err(GeometryError::MissingCoordinates)
        );
        assert_eq!(
            extract_coordinates(Some(&json!({ "coordinates": [200.0, 39.7] }))),
            Err(GeometryError::OutOfRange { lat: 39.7, lng: 200.0 })
        );
        assert!(matches!(
            extract_coordinates(Some(&json!({ "coordinates": "-104.99,39.7" }))),
            Err(GeometryError::Malformed(_))
        ));
    }

    #[test]
    fn test_absent_properties_are_not_errors() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[-104.99,39.7]},
             "properties":{"address":"","permit_num":12345,"status":null}}
        ]}"#;

        let collection = parse_feature_collection(text).unwrap();
        let feature = &collection.features()[0];
        assert_eq!(feature.address, None);
        assert_eq!(feature.permit_number.as_deref(), Some("12345"));
        assert_eq!(feature.status, None);
        assert!(collection.geometry_errors().is_empty());
    }

    #[test]
    fn test_rejects_non_collections() {
        assert!(matches!(
            parse_feature_collection(r#"{"type":"Feature","geometry":null}"#),
            Err(LoadError::NotAFeatureCollection(kind)) if kind == "Feature"
        ));
        assert!(matches!(
            parse_feature_collection("<html>not found</html>"),
            Err(LoadError::Parse(_))
        ));
    }
}
