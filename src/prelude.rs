//! Prelude module for common permitmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use permitmap::prelude::*;`

pub use crate::core::{
    config::{
        InteractionAnimationConfig, LoaderConfig, MapViewConfig, TileLayerSpec, ViewerConfig,
        ViewerProfile,
    },
    geo::{LatLng, LatLngBounds},
    viewer::{Lifecycle, LoadSummary, PermitViewer},
};

pub use crate::data::{
    feature::{Feature, FeatureCollection},
    store::{FeatureSource, FeatureStore},
};

pub use crate::layers::{
    factory::{MarkerFactory, MarkerVariant, RenderedLayer},
    icon::{IconImage, IconOptions, IconRenderer},
    marker::{ElementId, MapElement, MarkerKind, MarkerStyle},
};

pub use crate::imagery::{build_viewer_link, build_viewer_url, ImageryProvider};

pub use crate::input::events::{EventHandled, InputEvent, KeyCode};

pub use crate::traits::{LayerId, LinkOpener, LinkTarget, MapSurface, Padding, PanOptions, PanelView};

pub use crate::ui::{
    panel::{ImageryControl, PanelViewModel, ViewBindings},
    popup::{PopupBuilder, PopupContent},
    selection::{SelectionController, SelectionState, Transition},
};

pub use crate::{Error as PermitMapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
