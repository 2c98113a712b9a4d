use crate::{
    core::geo::LatLngBounds,
    data::feature::{Feature, FeatureCollection},
    layers::{
        icon::{GlyphIconRenderer, IconOptions, IconRenderer},
        marker::{ElementId, MapElement, MarkerKind, MarkerStyle},
    },
    ui::popup::PopupBuilder,
    Error, Result,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which kind of marker the factory produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum MarkerVariant {
    /// Fixed-style circle markers, built synchronously.
    Simple(MarkerStyle),
    /// Rendered bitmap icons; falls back to a circle marker on failure.
    RichIcon(IconOptions),
}

impl MarkerVariant {
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Simple(_) => Ok(()),
            Self::RichIcon(options) => options
                .validate()
                .map_err(|e| Error::Config(format!("marker icon: {e}"))),
        }
    }
}

impl Default for MarkerVariant {
    fn default() -> Self {
        Self::Simple(MarkerStyle::default())
    }
}

/// All elements built for a collection, plus the region they cover.
#[derive(Debug, Clone, Default)]
pub struct RenderedLayer {
    pub elements: Vec<MapElement>,
    pub bounds: Option<LatLngBounds>,
}

impl RenderedLayer {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Turns features into map elements.
pub struct MarkerFactory {
    variant: MarkerVariant,
    renderer: Arc<dyn IconRenderer>,
    popups: PopupBuilder,
    fallback: MarkerStyle,
}

impl MarkerFactory {
    pub fn new(variant: MarkerVariant) -> Self {
        let renderer: Arc<dyn IconRenderer> = match &variant {
            MarkerVariant::RichIcon(options) => Arc::new(GlyphIconRenderer::new(options.clone())),
            MarkerVariant::Simple(_) => Arc::new(GlyphIconRenderer::default()),
        };
        Self {
            variant,
            renderer,
            popups: PopupBuilder::default(),
            fallback: MarkerStyle::default(),
        }
    }

    /// Replaces the icon renderer used by the rich icon variant.
    pub fn with_renderer(mut self, renderer: Arc<dyn IconRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn variant(&self) -> &MarkerVariant {
        &self.variant
    }

    /// Builds the element for the feature at `index`.
    ///
    /// Returns `None` only for features without coordinates.
    pub async fn build(&self, index: usize, feature: &Feature) -> Option<MapElement> {
        let position = feature.coordinates?;
        let popup = self.popups.build(feature);

        let kind = match &self.variant {
            MarkerVariant::Simple(style) => MarkerKind::Circle(style.clone()),
            MarkerVariant::RichIcon(_) => match self.renderer.render(feature).await {
                Ok(icon) => MarkerKind::Icon(icon),
                Err(e) => {
                    log::warn!("icon for permit #{index} failed, using plain marker: {e}");
                    MarkerKind::Circle(self.fallback.clone())
                }
            },
        };

        Some(MapElement::new(
            ElementId::for_feature(index),
            position,
            kind,
            popup,
        ))
    }

    /// Builds every located feature concurrently, preserving collection order.
    pub async fn build_all(&self, collection: &FeatureCollection) -> RenderedLayer {
        let builds = collection
            .located()
            .map(|(index, feature)| self.build(index, feature));
        let elements: Vec<MapElement> = join_all(builds).await.into_iter().flatten().collect();
        let bounds = LatLngBounds::from_points(elements.iter().map(MapElement::position));

        log::debug!(
            "built {} elements for {} permits",
            elements.len(),
            collection.len()
        );
        RenderedLayer { elements, bounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLng, layers::icon::IconImage, IconRenderError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyRenderer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IconRenderer for FlakyRenderer {
        async fn render(&self, _feature: &Feature) -> std::result::Result<IconImage, IconRenderError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Err(IconRenderError::InvalidSize(0))
            } else {
                Ok(IconImage {
                    data_url: "data:image/png;base64,AAAA".into(),
                    size: 32,
                    anchor: (16, 16),
                })
            }
        }
    }

    fn collection() -> FeatureCollection {
        FeatureCollection::from_features(vec![
            Feature::at(LatLng::new(39.7392, -104.9903)),
            Feature::default(),
            Feature::at(LatLng::new(39.7676, -104.9844)),
        ])
    }

    #[test]
    fn test_marker_variant_serde() {
        let variant: MarkerVariant =
            serde_json::from_str(r#"{"kind":"rich_icon","options":{"size":24}}"#).unwrap();
        match variant {
            MarkerVariant::RichIcon(options) => {
                assert_eq!(options.size, 24);
                assert_eq!(options.fill_color, "#e53935");
            }
            other => panic!("unexpected variant {other:?}"),
        }
        assert!(MarkerVariant::RichIcon(IconOptions {
            size: 2,
            ..IconOptions::default()
        })
        .validate()
        .is_err());
    }

    #[tokio::test]
    async fn test_simple_markers_skip_unlocated() {
        let factory = MarkerFactory::new(MarkerVariant::default());
        let layer = factory.build_all(&collection()).await;

        assert_eq!(layer.len(), 2);
        assert_eq!(
            layer.elements.iter().map(|e| e.id()).collect::<Vec<_>>(),
            vec![ElementId(0), ElementId(2)]
        );
        assert!(layer.elements.iter().all(|e| !e.is_icon()));

        let bounds = layer.bounds.unwrap();
        assert_eq!(bounds.south_west, LatLng::new(39.7392, -104.9903));
        assert_eq!(bounds.north_east, LatLng::new(39.7676, -104.9844));
    }

    #[tokio::test]
    async fn test_unlocated_feature_builds_nothing() {
        let factory = MarkerFactory::new(MarkerVariant::default());
        assert!(factory.build(1, &Feature::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_rich_icons_render() {
        let factory = MarkerFactory::new(MarkerVariant::RichIcon(IconOptions::default()));
        let layer = factory.build_all(&collection()).await;

        assert_eq!(layer.len(), 2);
        assert!(layer.elements.iter().all(MapElement::is_icon));
    }

    #[tokio::test]
    async fn test_icon_failure_falls_back_to_circle() {
        let factory = MarkerFactory::new(MarkerVariant::RichIcon(IconOptions::default()))
            .with_renderer(Arc::new(FlakyRenderer {
                calls: AtomicUsize::new(0),
            }));
        let layer = factory.build_all(&collection()).await;

        assert_eq!(layer.len(), 2);
        assert_eq!(layer.elements.iter().filter(|e| e.is_icon()).count(), 1);
        assert_eq!(layer.elements.iter().filter(|e| !e.is_icon()).count(), 1);
    }
}
