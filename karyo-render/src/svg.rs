//! SVG document builder for karyotype plots.
//!
//! Elements accumulate as strings and are written out with a fixed header
//! and footer; rendering the same scene twice yields byte-identical output
//! (the timestamp footer is opt-in and off for deterministic renders).

use crate::RenderConfig;
use karyo_core::{Fill, PlotGeometry, RectPrimitive, ScalePair};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct SvgBuilder {
    config: RenderConfig,
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl SvgBuilder {
    pub fn new(config: &RenderConfig, geometry: &PlotGeometry) -> Self {
        Self {
            config: config.clone(),
            width: geometry.width,
            height: geometry.height,
            elements: Vec::new(),
        }
    }

    pub fn add_background(&mut self) {
        self.elements.push(format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            self.width, self.height, self.config.background_color
        ));
    }

    pub fn add_title(&mut self, title: &str) {
        let title_y = f64::from(self.config.font_size) + 6.0;
        self.elements.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" text-anchor="middle" font-weight="bold">{}</text>"#,
            self.width / 2.0,
            title_y,
            self.config.font_family,
            self.config.font_size + 4,
            escape_text(title)
        ));
    }

    /// Emit one layout rectangle, carrying its CSS class (when class-filled)
    /// and its tooltip as an SVG `<title>`.
    pub fn push_rect(&mut self, rect: &RectPrimitive) {
        let (fill, class_attr) = match &rect.fill {
            Fill::Color(c) => (c.clone(), String::new()),
            Fill::Class(class) => (
                self.config.class_color(class).to_owned(),
                format!(r#" class="{class}""#),
            ),
        };
        let body = format!(
            r#"<rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="{}"{}/>"#,
            rect.x, rect.y, rect.width, rect.height, fill, class_attr
        );
        match &rect.tooltip {
            Some(tip) => self.elements.push(format!(
                "<g>{}<title>{}</title></g>",
                body,
                escape_text(tip)
            )),
            None => self.elements.push(body),
        }
    }

    /// Horizontal basepair axis below the lanes, labeled in Mb.
    pub fn add_genomic_axis(&mut self, scales: &ScalePair, geometry: &PlotGeometry) {
        let axis_y = geometry.height - geometry.axis_reserve;
        let (r0, r1) = scales.genomic.range();
        self.elements.push(format!(
            r#"<line x1="{r0}" y1="{axis_y}" x2="{r1}" y2="{axis_y}" stroke="black" stroke-width="1"/>"#
        ));
        for tick in scales.genomic.ticks(6) {
            let x = scales.genomic.to_px_f(tick.bp);
            self.elements.push(format!(
                r#"<line x1="{x:.3}" y1="{axis_y}" x2="{x:.3}" y2="{}" stroke="black" stroke-width="1"/>"#,
                axis_y + 5.0
            ));
            self.elements.push(format!(
                r#"<text x="{x:.3}" y="{}" font-family="{}" font-size="{}px" text-anchor="middle">{}</text>"#,
                axis_y + 18.0,
                self.config.font_family,
                self.config.font_size.saturating_sub(2),
                tick.label
            ));
        }
        self.elements.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" text-anchor="middle">Position (Mb)</text>"#,
            (r0 + r1) / 2.0,
            geometry.height - 8.0,
            self.config.font_family,
            self.config.font_size
        ));
    }

    /// Vertical chromosome axis with one `ChrN` label per lane.
    pub fn add_lane_axis(&mut self, scales: &ScalePair, geometry: &PlotGeometry) {
        let x = geometry.left_margin;
        let bottom = geometry.height - geometry.axis_reserve;
        self.elements.push(format!(
            r#"<line x1="{x}" y1="0" x2="{x}" y2="{bottom}" stroke="black" stroke-width="1"/>"#
        ));
        let band = scales.lanes.band();
        for (chr, label) in scales
            .lanes
            .lanes()
            .iter()
            .zip(scales.lanes.labels())
        {
            if let Some(lane_y) = scales.lanes.lane_y(chr) {
                self.elements.push(format!(
                    r#"<text x="{}" y="{:.3}" font-family="{}" font-size="{}px" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                    x - 6.0,
                    lane_y + band / 2.0,
                    self.config.font_family,
                    self.config.font_size.saturating_sub(2),
                    label
                ));
            }
        }
    }

    /// One swatch+label per contributing strain, laid out left to right with
    /// the advance derived from the label text length.
    pub fn add_legend(&mut self, entries: &[(String, String)]) {
        let swatch = 12.0;
        let char_width = f64::from(self.config.font_size) * 0.6;
        let mut x = 10.0;
        let y = 4.0;
        for (label, color) in entries {
            self.elements.push(format!(
                r#"<rect x="{x:.3}" y="{y}" width="{swatch}" height="{swatch}" fill="{color}"/>"#
            ));
            self.elements.push(format!(
                r#"<text x="{:.3}" y="{}" font-family="{}" font-size="{}px" dominant-baseline="middle">{}</text>"#,
                x + swatch + 4.0,
                y + swatch / 2.0,
                self.config.font_family,
                self.config.font_size.saturating_sub(2),
                escape_text(label)
            ));
            x += swatch + 4.0 + label.len() as f64 * char_width + 14.0;
        }
    }

    pub fn add_footer(&mut self) {
        let footer = format!(
            "karyoview v{} | Generated: {}",
            karyo_core::VERSION,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        self.elements.push(format!(
            r#"<text x="10" y="{}" font-family="{}" font-size="{}px" fill="gray">{}</text>"#,
            self.height - 4.0,
            self.config.font_family,
            self.config.font_size.saturating_sub(2),
            footer
        ));
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        out.push('\n');
        out.push_str(&format!(
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#,
            w = self.width,
            h = self.height
        ));
        out.push('\n');
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_svg_string().as_bytes())?;
        Ok(())
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
