//! Configuration for the permit viewer
//!
//! Every section has a `Default` that matches the public permit map, and the
//! whole tree deserializes from JSON so hosts can override individual fields.
//! [`ViewerProfile`] offers a few ready-made combinations.

use crate::{
    constants,
    core::geo::LatLng,
    imagery::ImageryProvider,
    layers::factory::MarkerVariant,
    traits::{PanOptions, Padding},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound for the selection pan animation.
const MAX_PAN_DURATION_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerProfile {
    /// Circle markers, animated panning.
    #[default]
    Balanced,
    /// Circle markers, no animation.
    Lightweight,
    /// Rendered icons, animated panning.
    Rich,
    Custom(Box<ViewerConfig>),
}

impl ViewerProfile {
    pub fn resolve(&self) -> ViewerConfig {
        match self {
            Self::Balanced => ViewerConfig::default(),
            Self::Lightweight => ViewerConfig {
                animation: InteractionAnimationConfig {
                    enable_transitions: false,
                    pan_duration_ms: 0,
                },
                ..ViewerConfig::default()
            },
            Self::Rich => ViewerConfig {
                markers: MarkerVariant::RichIcon(Default::default()),
                ..ViewerConfig::default()
            },
            Self::Custom(config) => config.as_ref().clone(),
        }
    }

    /// Looks a profile up by name, as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "balanced" => Some(Self::Balanced),
            "lightweight" => Some(Self::Lightweight),
            "rich" => Some(Self::Rich),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// URL or path of the GeoJSON feature collection.
    pub data_source: String,
    pub view: MapViewConfig,
    pub tiles: TileLayerSpec,
    pub animation: InteractionAnimationConfig,
    pub markers: MarkerVariant,
    pub imagery: ImageryProvider,
    pub loader: LoaderConfig,
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_source.trim().is_empty() {
            return Err(Error::Config("data_source must not be empty".into()));
        }
        self.view.validate()?;
        self.tiles.validate()?;
        if self.animation.pan_duration_ms > MAX_PAN_DURATION_MS {
            return Err(Error::Config(format!(
                "pan_duration_ms must be at most {MAX_PAN_DURATION_MS}, got {}",
                self.animation.pan_duration_ms
            )));
        }
        self.markers.validate()?;
        if let ImageryProvider::Keyed { api_key, .. } = &self.imagery {
            if api_key.trim().is_empty() {
                return Err(Error::Config("keyed imagery provider needs an api_key".into()));
            }
        }
        if self.loader.timeout_secs == 0 {
            return Err(Error::Config("loader timeout must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_source: constants::DEFAULT_DATA_PATH.to_string(),
            view: MapViewConfig::default(),
            tiles: TileLayerSpec::default(),
            animation: InteractionAnimationConfig::default(),
            markers: MarkerVariant::default(),
            imagery: ImageryProvider::default(),
            loader: LoaderConfig::default(),
        }
    }
}

/// Initial viewport and fit behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_control: bool,
    /// Pixels of padding kept around the data when fitting bounds.
    pub fit_padding: u32,
}

impl MapViewConfig {
    pub fn padding(&self) -> Padding {
        Padding::uniform(self.fit_padding)
    }

    fn validate(&self) -> Result<()> {
        if !self.center.is_valid() {
            return Err(Error::Config(format!("invalid map center {:?}", self.center)));
        }
        if self.min_zoom > self.max_zoom {
            return Err(Error::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom < self.min_zoom || self.zoom > self.max_zoom {
            return Err(Error::Config(format!(
                "zoom {} outside [{}, {}]",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        let (lat, lng) = constants::DEFAULT_CENTER;
        Self {
            center: LatLng::new(lat, lng),
            zoom: constants::DEFAULT_ZOOM,
            min_zoom: constants::DEFAULT_MIN_ZOOM,
            max_zoom: constants::DEFAULT_MAX_ZOOM,
            zoom_control: true,
            fit_padding: constants::FIT_BOUNDS_PADDING,
        }
    }
}

/// Base tile layer handed to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerSpec {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: f64,
}

impl TileLayerSpec {
    fn validate(&self) -> Result<()> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(Error::Config(format!(
                    "tile template {:?} is missing {placeholder}",
                    self.url_template
                )));
            }
        }
        Ok(())
    }
}

impl Default for TileLayerSpec {
    fn default() -> Self {
        Self {
            url_template: constants::OSM_TILE_TEMPLATE.to_string(),
            attribution: constants::OSM_ATTRIBUTION.to_string(),
            max_zoom: constants::DEFAULT_MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionAnimationConfig {
    pub enable_transitions: bool,
    pub pan_duration_ms: u64,
}

impl InteractionAnimationConfig {
    pub fn pan_options(&self) -> PanOptions {
        if self.enable_transitions {
            PanOptions {
                animate: true,
                duration: Duration::from_millis(self.pan_duration_ms.min(MAX_PAN_DURATION_MS)),
            }
        } else {
            PanOptions {
                animate: false,
                duration: Duration::ZERO,
            }
        }
    }
}

impl Default for InteractionAnimationConfig {
    fn default() -> Self {
        Self {
            enable_transitions: true,
            pan_duration_ms: constants::PAN_DURATION_MS,
        }
    }
}

/// How the feature collection is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Base URL that relative `data_source` values are resolved against.
    pub base_url: Option<String>,
}

impl LoaderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: constants::LOAD_TIMEOUT_SECS,
            user_agent: constants::USER_AGENT.to_string(),
            base_url: None,
        }
    }
}
