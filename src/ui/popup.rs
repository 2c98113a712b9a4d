use crate::{core::geo::LatLng, data::feature::Feature};
use maud::html;
use serde::Serialize;

/// Markup bound to a marker's popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupContent {
    pub markup: String,
    /// Coordinates carried by the popup's street view button, captured when
    /// the popup was built.
    pub action: Option<LatLng>,
}

/// Builds popup markup from a feature.
///
/// Every feature field is escaped, since the permit text comes straight from
/// an external feed.
#[derive(Debug, Clone)]
pub struct PopupBuilder {
    address_placeholder: String,
    action_label: String,
}

impl PopupBuilder {
    pub fn new(address_placeholder: impl Into<String>, action_label: impl Into<String>) -> Self {
        Self {
            address_placeholder: address_placeholder.into(),
            action_label: action_label.into(),
        }
    }

    pub fn build(&self, feature: &Feature) -> PopupContent {
        let address = feature
            .address
            .as_deref()
            .unwrap_or(&self.address_placeholder);
        let permit = feature.permit_number.as_deref().unwrap_or_default();
        let permit_type = feature.permit_type.as_deref().unwrap_or_default();
        let status = feature.status.as_deref().unwrap_or_default();

        let markup = html! {
            div class="popup-content" {
                div class="popup-header" {
                    strong { (address) }
                }
                div class="popup-details" {
                    div { span class="label" { "Permit:" } " " (permit) }
                    div { span class="label" { "Type:" } " " (permit_type) }
                    div { span class="label" { "Status:" } " " (status) }
                }
                @if let Some(description) = &feature.description {
                    div class="popup-description" { (description) }
                }
                @if let Some(point) = feature.coordinates {
                    div class="popup-streetview" {
                        button class="streetview-btn" type="button"
                            data-lat=(point.lat) data-lng=(point.lng) {
                            (self.action_label)
                        }
                    }
                }
            }
        };

        PopupContent {
            markup: markup.into_string(),
            action: feature.coordinates,
        }
    }
}

impl Default for PopupBuilder {
    fn default() -> Self {
        Self::new("Unknown address", "View Street View")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature() -> Feature {
        Feature {
            address: Some("100 Downtown Denver St, Denver, CO".into()),
            permit_number: Some("2025-DEM-1001".into()),
            permit_type: Some("Demolition".into()),
            status: Some("ISSUED".into()),
            description: Some("Demolition of residential structure".into()),
            ..Feature::at(LatLng::new(39.7, -104.99))
        }
    }

    #[test]
    fn test_popup_fields() {
        let popup = PopupBuilder::default().build(&feature());

        assert!(popup.markup.contains("<strong>100 Downtown Denver St, Denver, CO</strong>"));
        assert!(popup.markup.contains("2025-DEM-1001"));
        assert!(popup.markup.contains("ISSUED"));
        assert!(popup.markup.contains(r#"data-lat="39.7""#));
        assert!(popup.markup.contains(r#"data-lng="-104.99""#));
        assert_eq!(popup.action, Some(LatLng::new(39.7, -104.99)));
    }

    #[test]
    fn test_description_is_escaped() {
        let hostile = Feature {
            description: Some(r#"<script>alert("x")</script> & <b>bold</b>"#.into()),
            address: Some("<img src=x onerror=alert(1)>".into()),
            ..feature()
        };
        let popup = PopupBuilder::default().build(&hostile);

        assert!(!popup.markup.contains("<script>"));
        assert!(!popup.markup.contains("<b>"));
        assert!(!popup.markup.contains("<img"));
        assert!(popup.markup.contains("&lt;script&gt;"));
        assert!(popup.markup.contains("&amp;"));
        assert!(popup.markup.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let popup = PopupBuilder::default().build(&Feature::default());

        assert!(popup.markup.contains("<strong>Unknown address</strong>"));
        assert!(!popup.markup.contains("streetview-btn"));
        assert!(!popup.markup.contains("popup-description"));
        assert_eq!(popup.action, None);
    }

    #[test]
    fn test_popup_is_deterministic() {
        let builder = PopupBuilder::default();
        assert_eq!(builder.build(&feature()), builder.build(&feature()));
    }
}
