//! Collaborator contracts
//!
//! The core never touches a tile widget, a DOM or a browser directly. Hosts
//! implement these traits (a Leaflet bridge, an egui widget, a test fake) and
//! hand them to [`PermitViewer`](crate::core::viewer::PermitViewer).

use crate::{
    core::{
        config::{MapViewConfig, TileLayerSpec},
        geo::{LatLng, LatLngBounds},
    },
    layers::marker::{ElementId, MapElement},
    ui::panel::PanelViewModel,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of an element layer attached to a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u64);

/// Pixel padding used when fitting the view to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub x: u32,
    pub y: u32,
}

impl Padding {
    pub fn uniform(px: u32) -> Self {
        Self { x: px, y: px }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration: Duration,
}

/// The tile/map widget. Elements handed to `add_layer` are owned by the
/// surface until the layer is removed.
pub trait MapSurface {
    /// Positions the map and applies its zoom limits and controls.
    fn set_view(&mut self, view: &MapViewConfig);

    fn add_tile_layer(&mut self, spec: &TileLayerSpec);

    /// Attaches a complete element layer in one step.
    fn add_layer(&mut self, id: LayerId, elements: Vec<MapElement>);

    fn remove_layer(&mut self, id: LayerId);

    /// Whether an element with this id is currently attached.
    fn contains_element(&self, id: ElementId) -> bool;

    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Padding);

    fn pan_to(&mut self, point: LatLng, options: PanOptions);
}

/// The detail panel next to the map.
pub trait PanelView {
    /// Shows the panel with fresh content.
    fn open(&mut self, model: &PanelViewModel);

    /// Hides the panel and drops whatever it displayed.
    fn close(&mut self);
}

/// Where an outbound link should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// A new browsing context (`_blank`).
    NewContext,
}

impl LinkTarget {
    pub fn as_html_target(self) -> &'static str {
        match self {
            LinkTarget::NewContext => "_blank",
        }
    }
}

/// Opens external viewer URLs.
pub trait LinkOpener {
    fn open(&mut self, url: &str, target: LinkTarget);
}
