pub mod config;
pub mod constants;
pub mod geo;
pub mod viewer;

pub use config::{ViewerConfig, ViewerProfile};
pub use geo::{LatLng, LatLngBounds};
pub use viewer::{Lifecycle, LoadSummary, PermitViewer};
