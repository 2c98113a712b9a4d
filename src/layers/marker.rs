use crate::{
    constants,
    core::geo::LatLng,
    layers::icon::IconImage,
    ui::popup::PopupContent,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the element rendered for one feature.
///
/// Derived from the feature's position in its collection, so an element id
/// is stable for the lifetime of a loaded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl ElementId {
    pub fn for_feature(index: usize) -> Self {
        Self(index)
    }

    pub fn feature_index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "permit-{}", self.0)
    }
}

/// Fixed style for circle markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: String,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 6.0,
            fill_color: "#e53935".to_string(),
            color: "#b71c1c".to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    Circle(MarkerStyle),
    Icon(IconImage),
}

/// The on-map representation of exactly one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct MapElement {
    id: ElementId,
    position: LatLng,
    kind: MarkerKind,
    popup: PopupContent,
}

impl MapElement {
    pub fn new(id: ElementId, position: LatLng, kind: MarkerKind, popup: PopupContent) -> Self {
        Self {
            id,
            position,
            kind,
            popup,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    pub fn popup(&self) -> &PopupContent {
        &self.popup
    }

    pub fn is_icon(&self) -> bool {
        matches!(self.kind, MarkerKind::Icon(_))
    }

    /// JSON description consumed by host adapters (Leaflet option names).
    pub fn options(&self) -> serde_json::Value {
        let marker = match &self.kind {
            MarkerKind::Circle(style) => serde_json::json!({
                "kind": "circle",
                "radius": style.radius,
                "fillColor": style.fill_color,
                "color": style.color,
                "weight": style.weight,
                "opacity": style.opacity,
                "fillOpacity": style.fill_opacity,
            }),
            MarkerKind::Icon(icon) => serde_json::json!({
                "kind": "icon",
                "iconUrl": icon.data_url,
                "iconSize": [icon.size, icon.size],
                "iconAnchor": [icon.anchor.0, icon.anchor.1],
            }),
        };

        serde_json::json!({
            "id": self.id.to_string(),
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "marker": marker,
            "popup": {
                "content": self.popup.markup,
                "maxWidth": constants::POPUP_MAX_WIDTH,
                "className": constants::POPUP_CLASS_NAME,
            }
        })
    }
}
