use crate::{
    core::geo::{LatLng, LatLngBounds},
    GeometryError,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// One permit record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Feature {
    /// `None` when the source geometry was missing or unusable.
    pub coordinates: Option<LatLng>,
    pub address: Option<String>,
    pub permit_number: Option<String>,
    pub permit_type: Option<String>,
    pub status: Option<String>,
    pub issued_date: Option<String>,
    pub description: Option<String>,
}

impl Feature {
    pub fn at(coordinates: LatLng) -> Self {
        Self {
            coordinates: Some(coordinates),
            ..Self::default()
        }
    }

    pub fn lat(&self) -> Option<f64> {
        self.coordinates.map(|c| c.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.coordinates.map(|c| c.lng)
    }

    /// Serializes the record as a GeoJSON `Feature` using the feed's property keys.
    pub fn to_geojson(&self) -> Value {
        let geometry = match self.coordinates {
            Some(c) => json!({ "type": "Point", "coordinates": [c.lng, c.lat] }),
            None => Value::Null,
        };

        let mut properties = Map::new();
        let fields = [
            ("address", &self.address),
            ("permit_num", &self.permit_number),
            ("type", &self.permit_type),
            ("status", &self.status),
            ("issued_date", &self.issued_date),
            ("description", &self.description),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                properties.insert(key.to_string(), Value::String(value.clone()));
            }
        }

        json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": properties,
        })
    }
}

/// A feature whose location was dropped during loading.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureIssue {
    pub index: usize,
    pub error: GeometryError,
}

/// The loaded permits plus the region covering every located one.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    features: Vec<Arc<Feature>>,
    bounds: Option<LatLngBounds>,
    issues: Vec<FeatureIssue>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>, issues: Vec<FeatureIssue>) -> Self {
        let bounds = LatLngBounds::from_points(features.iter().filter_map(|f| f.coordinates));
        Self {
            features: features.into_iter().map(Arc::new).collect(),
            bounds,
            issues,
        }
    }

    pub fn from_features(features: Vec<Feature>) -> Self {
        Self::new(features, Vec::new())
    }

    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Feature>> {
        self.features.get(index)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features that can be placed on the map, with their collection index.
    pub fn located(&self) -> impl Iterator<Item = (usize, &Arc<Feature>)> {
        self.features
            .iter()
            .enumerate()
            .filter(|(_, f)| f.coordinates.is_some())
    }

    /// Bounds of all located features; `None` when nothing is located.
    pub fn bounds(&self) -> Option<&LatLngBounds> {
        self.bounds.as_ref()
    }

    pub fn geometry_errors(&self) -> &[FeatureIssue] {
        &self.issues
    }

    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.iter().map(|f| f.to_geojson()).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permit(lat: f64, lng: f64, number: &str) -> Feature {
        Feature {
            permit_number: Some(number.to_string()),
            ..Feature::at(LatLng::new(lat, lng))
        }
    }

    #[test]
    fn test_bounds_skip_unlocated_features() {
        let collection = FeatureCollection::from_features(vec![
            permit(39.7567, -104.9956, "A"),
            Feature {
                permit_number: Some("B".into()),
                ..Feature::default()
            },
            permit(39.7199, -104.9844, "C"),
        ]);

        let bounds = collection.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(39.7199, -104.9956));
        assert_eq!(bounds.north_east, LatLng::new(39.7567, -104.9844));
        assert_eq!(collection.located().count(), 2);
        assert_eq!(
            collection.located().map(|(i, _)| i).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn test_no_located_features_has_no_bounds() {
        let collection = FeatureCollection::from_features(vec![Feature::default()]);
        assert!(collection.bounds().is_none());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_to_geojson_uses_feed_keys() {
        let feature = Feature {
            address: Some("100 Downtown Denver St".into()),
            permit_type: Some("Demolition".into()),
            ..permit(39.7392, -104.9903, "2025-DEM-1001")
        };

        let value = feature.to_geojson();
        assert_eq!(value["geometry"]["coordinates"][0], -104.9903);
        assert_eq!(value["geometry"]["coordinates"][1], 39.7392);
        assert_eq!(value["properties"]["permit_num"], "2025-DEM-1001");
        assert_eq!(value["properties"]["type"], "Demolition");
        assert!(value["properties"].get("status").is_none());
    }
}
