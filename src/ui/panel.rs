use crate::{
    data::feature::Feature,
    imagery::{build_viewer_link, build_viewer_url, ImageryProvider},
    traits::{LinkOpener, PanelView},
};
use serde::Serialize;

pub const LOCATION_UNAVAILABLE: &str = "Location not available.";
pub const ADDRESS_PLACEHOLDER: &str = "(no address)";

/// What the panel offers in place of the street view thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageryControl {
    /// A tappable placeholder that opens the viewer.
    Link { label: String, url: String },
    /// A static image that opens the viewer when tapped.
    Thumbnail { image_url: String, link_url: String },
    /// Shown when the feature has no location.
    Unavailable { message: String },
}

impl ImageryControl {
    pub fn for_feature(feature: &Feature, provider: &ImageryProvider) -> Self {
        let (lat, lng) = (feature.lat(), feature.lng());
        let link = build_viewer_link(lat, lng, provider);

        match (provider, link) {
            (_, None) => Self::Unavailable {
                message: LOCATION_UNAVAILABLE.to_string(),
            },
            (ImageryProvider::NoKey, Some(url)) => Self::Link {
                label: provider.link_label().to_string(),
                url,
            },
            (ImageryProvider::Keyed { .. }, Some(link_url)) => {
                match build_viewer_url(lat, lng, provider) {
                    Some(image_url) => Self::Thumbnail {
                        image_url,
                        link_url,
                    },
                    None => Self::Link {
                        label: provider.link_label().to_string(),
                        url: link_url,
                    },
                }
            }
        }
    }

    /// The URL opened when the control is activated.
    pub fn link_url(&self) -> Option<&str> {
        match self {
            Self::Link { url, .. } => Some(url.as_str()),
            Self::Thumbnail { link_url, .. } => Some(link_url.as_str()),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.link_url().is_some()
    }
}

/// Display strings for the selected permit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelViewModel {
    pub address: String,
    pub permit: String,
    pub permit_type: String,
    pub status: String,
    pub issued: String,
    pub description: String,
    pub imagery: ImageryControl,
}

impl PanelViewModel {
    pub fn from_feature(feature: &Feature, provider: &ImageryProvider) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            address: feature
                .address
                .clone()
                .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string()),
            permit: text(&feature.permit_number),
            permit_type: text(&feature.permit_type),
            status: text(&feature.status),
            issued: text(&feature.issued_date),
            description: text(&feature.description),
            imagery: ImageryControl::for_feature(feature, provider),
        }
    }
}

/// The host views the selection controller drives.
pub struct ViewBindings {
    pub panel: Box<dyn PanelView>,
    pub links: Box<dyn LinkOpener>,
}

impl ViewBindings {
    pub fn new(panel: impl PanelView + 'static, links: impl LinkOpener + 'static) -> Self {
        Self {
            panel: Box::new(panel),
            links: Box::new(links),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn located() -> Feature {
        Feature {
            address: Some("350 Washington Park St, Denver, CO".into()),
            permit_number: Some("2025-DEM-1006".into()),
            issued_date: Some("2025-06-10".into()),
            ..Feature::at(LatLng::new(39.7199, -104.9844))
        }
    }

    #[test]
    fn test_view_model_fields() {
        let model = PanelViewModel::from_feature(&located(), &ImageryProvider::NoKey);

        assert_eq!(model.address, "350 Washington Park St, Denver, CO");
        assert_eq!(model.permit, "2025-DEM-1006");
        assert_eq!(model.issued, "2025-06-10");
        assert_eq!(model.status, "");
        assert_eq!(
            model.imagery,
            ImageryControl::Link {
                label: "Tap to open Mapillary Street View".into(),
                url: "https://www.mapillary.com/app/?lat=39.7199&lng=-104.9844&z=17&focus=photo"
                    .into(),
            }
        );
    }

    #[test]
    fn test_unlocated_feature_shows_indicator() {
        let model = PanelViewModel::from_feature(&Feature::default(), &ImageryProvider::NoKey);

        assert_eq!(model.address, "(no address)");
        assert_eq!(
            model.imagery,
            ImageryControl::Unavailable {
                message: "Location not available.".into()
            }
        );
        assert!(!model.imagery.is_available());
    }

    #[test]
    fn test_keyed_provider_uses_thumbnail() {
        let control = ImageryControl::for_feature(&located(), &ImageryProvider::keyed("K"));

        match &control {
            ImageryControl::Thumbnail {
                image_url,
                link_url,
            } => {
                assert!(image_url.contains("key=K"));
                assert!(link_url.contains("viewpoint=39.7199,-104.9844"));
            }
            other => panic!("expected thumbnail, got {other:?}"),
        }
        assert!(control.link_url().unwrap().starts_with("https://www.google.com/maps"));
    }
}
