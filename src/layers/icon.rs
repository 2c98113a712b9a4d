//! Rendered marker icons
//!
//! Icons are small PNG bitmaps delivered to the map surface as `data:` URLs.
//! Rendering happens off the event loop through [`AsyncExecutor`], and each
//! render owns its own pixel buffer.

use crate::{
    constants, data::feature::Feature, runtime::AsyncExecutor, IconRenderError,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

const MIN_ICON_SIZE: u32 = 8;
const MAX_ICON_SIZE: u32 = 256;

/// A finished icon ready to hand to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconImage {
    pub data_url: String,
    pub size: u32,
    /// Pixel inside the icon that sits on the feature's location.
    pub anchor: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconOptions {
    pub size: u32,
    pub fill_color: String,
    pub stroke_color: String,
    pub glyph_color: String,
}

impl IconOptions {
    pub(crate) fn validate(&self) -> Result<(), IconRenderError> {
        if !(MIN_ICON_SIZE..=MAX_ICON_SIZE).contains(&self.size) {
            return Err(IconRenderError::InvalidSize(self.size));
        }
        for color in [&self.fill_color, &self.stroke_color, &self.glyph_color] {
            parse_hex_color(color)?;
        }
        Ok(())
    }
}

impl Default for IconOptions {
    fn default() -> Self {
        Self {
            size: constants::MARKER_ICON_SIZE,
            fill_color: "#e53935".to_string(),
            stroke_color: "#b71c1c".to_string(),
            glyph_color: "#ffffff".to_string(),
        }
    }
}

/// Produces the icon for one feature.
#[async_trait]
pub trait IconRenderer: Send + Sync {
    async fn render(&self, feature: &Feature) -> Result<IconImage, IconRenderError>;
}

/// Draws a round badge with a building glyph.
#[derive(Debug, Clone, Default)]
pub struct GlyphIconRenderer {
    options: IconOptions,
}

impl GlyphIconRenderer {
    pub fn new(options: IconOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl IconRenderer for GlyphIconRenderer {
    async fn render(&self, _feature: &Feature) -> Result<IconImage, IconRenderError> {
        let options = self.options.clone();
        let size = options.size;
        let png = AsyncExecutor::execute_blocking(move || draw_badge(&options)).await?;

        Ok(IconImage {
            data_url: format!("data:image/png;base64,{}", STANDARD.encode(png)),
            size,
            anchor: (size / 2, size / 2),
        })
    }
}

fn draw_badge(options: &IconOptions) -> Result<Vec<u8>, IconRenderError> {
    options.validate()?;
    let fill = parse_hex_color(&options.fill_color)?;
    let stroke = parse_hex_color(&options.stroke_color)?;
    let glyph = parse_hex_color(&options.glyph_color)?;

    let size = options.size;
    let extent = size as f64;
    let center = (extent - 1.0) / 2.0;
    let radius = extent / 2.0;
    let border = (extent / 16.0).max(1.0);

    let mut canvas = RgbaImage::new(size, size);
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let dx = x as f64 - center;
        let dy = y as f64 - center;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance > radius {
            continue;
        }
        if distance > radius - border {
            *pixel = stroke;
        } else if in_building_glyph(x as f64 / extent, y as f64 / extent) {
            *pixel = glyph;
        } else {
            *pixel = fill;
        }
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    Ok(png)
}

/// House silhouette in unit coordinates: a roof triangle over a body with a door gap.
fn in_building_glyph(u: f64, v: f64) -> bool {
    let roof = (0.25..=0.5).contains(&v) && (u - 0.5).abs() <= v - 0.25;
    let body = (0.32..=0.68).contains(&u) && (0.5..=0.75).contains(&v);
    let door = (0.45..=0.55).contains(&u) && (0.6..=0.75).contains(&v);
    roof || (body && !door)
}

fn parse_hex_color(value: &str) -> Result<Rgba<u8>, IconRenderError> {
    let invalid = || IconRenderError::InvalidColor(value.to_string());
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#e53935").unwrap(), Rgba([0xe5, 0x39, 0x35, 255]));
        assert!(parse_hex_color("e53935").is_err());
        assert!(parse_hex_color("#e5393").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_glyph_shape() {
        assert!(in_building_glyph(0.5, 0.3));
        assert!(in_building_glyph(0.35, 0.7));
        assert!(!in_building_glyph(0.5, 0.7));
        assert!(!in_building_glyph(0.1, 0.1));
    }

    #[test]
    fn test_draw_badge_is_png() {
        let png = draw_badge(&IconOptions::default()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (32, 32));
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
        assert_eq!(*decoded.get_pixel(16, 4), Rgba([0xe5, 0x39, 0x35, 255]));
    }

    #[test]
    fn test_invalid_options() {
        let options = IconOptions {
            size: 1024,
            ..IconOptions::default()
        };
        assert!(matches!(
            draw_badge(&options),
            Err(IconRenderError::InvalidSize(1024))
        ));

        let options = IconOptions {
            glyph_color: "white".into(),
            ..IconOptions::default()
        };
        assert!(matches!(
            draw_badge(&options),
            Err(IconRenderError::InvalidColor(_))
        ));
    }

    #[tokio::test]
    async fn test_renderer_produces_data_url() {
        let renderer = GlyphIconRenderer::default();
        let icon = renderer.render(&Feature::default()).await.unwrap();

        assert!(icon.data_url.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(icon.size, 32);
        assert_eq!(icon.anchor, (16, 16));
    }
}
