pub mod factory;
pub mod icon;
pub mod marker;

pub use factory::{MarkerFactory, MarkerVariant, RenderedLayer};
pub use icon::{GlyphIconRenderer, IconImage, IconOptions, IconRenderer};
pub use marker::{ElementId, MapElement, MarkerKind, MarkerStyle};
