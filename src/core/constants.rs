//! Core constants taken from the permit map page and common web-map conventions.
//! Keeping them in a single place makes it easier to tweak viewer-wide magic numbers.

/// Where the page serves the permit collection from.
pub const DEFAULT_DATA_PATH: &str = "./data/demolition_permits_last_month.geojson";

/// Initial map center (downtown Denver) before the data bounds are known.
pub const DEFAULT_CENTER: (f64, f64) = (39.7392, -104.9903);

pub const DEFAULT_ZOOM: f64 = 12.0;

pub const DEFAULT_MIN_ZOOM: f64 = 9.0;

pub const DEFAULT_MAX_ZOOM: f64 = 19.0;

pub const OSM_TILE_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Padding in pixels applied on every side when fitting the map to the data.
pub const FIT_BOUNDS_PADDING: u32 = 40;

/// Duration of the pan animation that follows a selection.
pub const PAN_DURATION_MS: u64 = 300;

/// Street view thumbnail size requested from keyed providers.
pub const STREET_VIEW_SIZE: (u32, u32) = (320, 160);

/// Zoom level requested from the Mapillary web viewer.
pub const MAPILLARY_ZOOM: u8 = 17;

/// Popup width limit in pixels.
pub const POPUP_MAX_WIDTH: u32 = 300;

pub const POPUP_CLASS_NAME: &str = "permit-popup";

/// Edge length of the rendered rich marker icon.
pub const MARKER_ICON_SIZE: u32 = 32;

/// Timeout applied to feature collection fetches.
pub const LOAD_TIMEOUT_SECS: u64 = 10;

pub const USER_AGENT: &str = "permitmap/0.1";
