use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from a GeoJSON position, which is ordered `[lng, lat]`.
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Degenerate bounds covering a single point
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    /// Smallest bounds containing every point, `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for point in points {
            bounds.extend(&point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Both corners are valid coordinates and correctly ordered
    pub fn is_valid(&self) -> bool {
        self.south_west.is_valid()
            && self.north_east.is_valid()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(39.7392, -104.9903);
        assert_eq!(coord.lat, 39.7392);
        assert_eq!(coord.lng, -104.9903);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_geojson_axis_order() {
        let coord = LatLng::from_lng_lat(-104.9903, 39.7392);
        assert_eq!(coord, LatLng::new(39.7392, -104.9903));
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = LatLngBounds::from_points([
            LatLng::new(39.7567, -104.9956),
            LatLng::new(39.6989, -104.9774),
            LatLng::new(39.7589, -104.8191),
        ])
        .unwrap();

        assert_eq!(bounds.south_west, LatLng::new(39.6989, -104.9956));
        assert_eq!(bounds.north_east, LatLng::new(39.7589, -104.8191));
        assert!(bounds.is_valid());
        assert!(bounds.contains(&bounds.center()));
        assert!(LatLngBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::new(LatLng::new(39.0, -105.5), LatLng::new(40.0, -104.5));
        assert!(bounds.contains(&LatLng::new(39.7, -104.99)));
        assert!(!bounds.contains(&LatLng::new(41.0, -104.99)));
    }
}
