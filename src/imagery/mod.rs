//! Street-level imagery links
//!
//! Pure URL builders for the two supported providers, in the same spirit as a
//! tile source turning a coordinate into a tile URL.

use crate::constants;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const MAPILLARY_APP_URL: &str = "https://www.mapillary.com/app/";
const STREET_VIEW_STATIC_URL: &str = "https://maps.googleapis.com/maps/api/streetview";
const GOOGLE_MAPS_URL: &str = "https://www.google.com/maps/@";

/// Pixel size of a requested street view image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSize {
    fn default() -> Self {
        let (width, height) = constants::STREET_VIEW_SIZE;
        Self { width, height }
    }
}

/// Imagery provider strategy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ImageryProvider {
    /// Mapillary web viewer, no credential needed.
    #[default]
    NoKey,
    /// Street View static images, authenticated with an API key.
    Keyed {
        api_key: String,
        #[serde(default)]
        size: ImageSize,
    },
}

impl ImageryProvider {
    pub fn keyed(api_key: impl Into<String>) -> Self {
        Self::Keyed {
            api_key: api_key.into(),
            size: ImageSize::default(),
        }
    }

    /// Label shown on the panel's imagery control.
    pub fn link_label(&self) -> &'static str {
        match self {
            Self::NoKey => "Tap to open Mapillary Street View",
            Self::Keyed { .. } => "Tap to open Street View",
        }
    }
}

fn located(lat: Option<f64>, lng: Option<f64>) -> Option<(f64, f64)> {
    match (lat, lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
        _ => None,
    }
}

fn mapillary_url(lat: f64, lng: f64) -> String {
    format!(
        "{MAPILLARY_APP_URL}?lat={lat}&lng={lng}&z={}&focus=photo",
        constants::MAPILLARY_ZOOM
    )
}

/// Builds the imagery URL for a location.
///
/// `NoKey` yields the Mapillary viewer deep link; `Keyed` yields a static
/// image request carrying `size`, `location` and `key`. Returns `None` when
/// either coordinate is missing, meaning the viewer is unavailable.
pub fn build_viewer_url(
    lat: Option<f64>,
    lng: Option<f64>,
    provider: &ImageryProvider,
) -> Option<String> {
    let (lat, lng) = located(lat, lng)?;

    Some(match provider {
        ImageryProvider::NoKey => mapillary_url(lat, lng),
        ImageryProvider::Keyed { api_key, size } => {
            let key: String = form_urlencoded::byte_serialize(api_key.as_bytes()).collect();
            format!(
                "{STREET_VIEW_STATIC_URL}?size={}x{}&location={lat},{lng}&key={key}",
                size.width, size.height
            )
        }
    })
}

/// Builds the interactive viewer link opened when the user asks for imagery.
pub fn build_viewer_link(
    lat: Option<f64>,
    lng: Option<f64>,
    provider: &ImageryProvider,
) -> Option<String> {
    let (lat, lng) = located(lat, lng)?;

    Some(match provider {
        ImageryProvider::NoKey => mapillary_url(lat, lng),
        ImageryProvider::Keyed { .. } => {
            format!("{GOOGLE_MAPS_URL}?api=1&map_action=pano&viewpoint={lat},{lng}")
        }
    })
}
