//! # permitmap
//!
//! The feature-rendering and selection core of an interactive permit map.
//!
//! This library turns a GeoJSON feature collection of demolition permits into
//! map elements, keeps a single selection synchronized between the map, the
//! popup and the detail panel, and derives street-level imagery links for a
//! permit's location. The tile widget, the panel view and the browser are
//! reached only through the traits in [`traits`], so the whole core runs
//! headless in tests.

pub mod core;
pub mod data;
pub mod imagery;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::ViewerConfig,
    geo::{LatLng, LatLngBounds},
    viewer::{LoadSummary, PermitViewer},
};

pub use crate::data::{
    feature::{Feature, FeatureCollection},
    store::{FeatureSource, FeatureStore},
};

pub use crate::imagery::{build_viewer_link, build_viewer_url, ImageryProvider};

pub use crate::input::events::{InputEvent, KeyCode};

pub use crate::layers::{
    factory::{MarkerFactory, MarkerVariant},
    marker::{ElementId, MapElement},
};

pub use crate::traits::{LinkOpener, MapSurface, PanelView};

pub use crate::ui::{
    panel::{PanelViewModel, ViewBindings},
    popup::PopupBuilder,
    selection::{SelectionController, SelectionState},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to obtain or parse the feature collection as a whole.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Expected a FeatureCollection, found {0}")]
    NotAFeatureCollection(String),

    #[error("Invalid data source {0:?}")]
    InvalidSource(String),
}

/// A single feature whose geometry could not be turned into a location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("geometry has no coordinates")]
    MissingCoordinates,

    #[error("malformed coordinates: {0}")]
    Malformed(String),

    #[error("coordinates out of range: lat {lat}, lng {lng}")]
    OutOfRange { lat: f64, lng: f64 },
}

/// Failure while producing a custom marker icon.
#[derive(Debug, thiserror::Error)]
pub enum IconRenderError {
    #[error("Icon encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Task(#[from] crate::runtime::TaskFailed),

    #[error("Invalid icon size {0}px")]
    InvalidSize(u32),

    #[error("Invalid icon color {0:?}")]
    InvalidColor(String),
}

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    IconRender(#[from] IconRenderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initializes `env_logger` once; later calls are no-ops.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
