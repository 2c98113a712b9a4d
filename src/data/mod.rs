pub mod feature;
pub mod geojson;
pub mod socrata;
pub mod store;

pub use feature::{Feature, FeatureCollection, FeatureIssue};
pub use geojson::parse_feature_collection;
pub use store::{FeatureSource, FeatureStore};
