//! CPU rasterization of layout primitives to PNG, for headless export
//! without an SVG consumer.

use crate::RenderConfig;
use anyhow::Result;
use image::{Rgba, RgbaImage};
use karyo_core::{Fill, PlotGeometry, RectPrimitive};
use std::path::Path;

/// Rasterize primitives into an RGBA image of the plot geometry.
pub fn rasterize(
    primitives: &[RectPrimitive],
    geometry: &PlotGeometry,
    config: &RenderConfig,
) -> RgbaImage {
    let width = geometry.width.max(1.0) as u32;
    let height = geometry.height.max(1.0) as u32;
    let background = parse_hex_rgb(&config.background_color).unwrap_or([255, 255, 255]);
    let mut img = RgbaImage::from_pixel(
        width,
        height,
        Rgba([background[0], background[1], background[2], 255]),
    );

    for rect in primitives {
        let color = match &rect.fill {
            Fill::Color(c) => c.as_str(),
            Fill::Class(class) => config.class_color(class),
        };
        let Some(rgb) = parse_hex_rgb(color) else {
            log::warn!("unparseable fill color {color:?}, skipping rect");
            continue;
        };
        fill_rect(
            &mut img,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            Rgba([rgb[0], rgb[1], rgb[2], 255]),
        );
    }
    img
}

pub fn write_png(
    primitives: &[RectPrimitive],
    geometry: &PlotGeometry,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> Result<()> {
    rasterize(primitives, geometry, config).save(path.as_ref())?;
    Ok(())
}

fn fill_rect(img: &mut RgbaImage, x: f64, y: f64, w: f64, h: f64, color: Rgba<u8>) {
    let x0 = x.max(0.0) as u32;
    let y0 = y.max(0.0) as u32;
    let x1 = ((x + w).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((y + h).ceil().max(0.0) as u32).min(img.height());
    for py in y0..y1 {
        for px in x0..x1 {
            img.put_pixel(px, py, color);
        }
    }
}

// Parse a hex color like "#RRGGBB" into bytes.
fn parse_hex_rgb(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use karyo_core::PrimitiveKind;

    #[test]
    fn rasterizes_a_colored_rect() {
        let geometry = PlotGeometry {
            width: 20.0,
            height: 20.0,
            ..Default::default()
        };
        let rects = vec![RectPrimitive {
            kind: PrimitiveKind::HaplotypeBlock,
            chr: "1".to_owned(),
            x: 5.0,
            y: 5.0,
            width: 10.0,
            height: 10.0,
            fill: Fill::Color("#ff0000".to_owned()),
            strain: None,
            block: None,
            tooltip: None,
        }];
        let img = rasterize(&rects, &geometry, &RenderConfig::default());
        assert_eq!(img.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_rgb("#f9a825"), Some([0xf9, 0xa8, 0x25]));
        assert_eq!(parse_hex_rgb("f9a825"), Some([0xf9, 0xa8, 0x25]));
        assert_eq!(parse_hex_rgb("red"), None);
    }
}
