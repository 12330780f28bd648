//! karyo-render
//!
//! SVG and PNG rendering for karyotype haplotype plots, plus the two plot
//! views (full genome and zoomed interval) that orchestrate scales, layout,
//! interaction and hover dispatch.

pub mod png;
pub mod svg;
pub mod view;

pub use png::{rasterize, write_png};
pub use svg::SvgBuilder;
pub use view::{
    FullGenomeView, HoverEvent, HoverListener, HoverListenerId, KaryoPlotView, ZoomedIntervalView,
};

/// Visual styling shared by the SVG and PNG backends.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub show_legend: bool,
    pub show_axes: bool,
    /// Footer carries a render timestamp; leave off for deterministic output.
    pub show_footer: bool,
    pub title: Option<String>,
    pub lane_color: String,
    pub concordance_color: String,
    /// Fallback colors for `hapN` classes when a strain has no color-map
    /// entry, cycled by index.
    pub hap_palette: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_owned(),
            font_family: "Arial, sans-serif".to_owned(),
            font_size: 12,
            show_legend: true,
            show_axes: true,
            show_footer: false,
            title: None,
            lane_color: "#ededed".to_owned(),
            concordance_color: "#9e9e9e".to_owned(),
            hap_palette: vec![
                "#1f77b4".to_owned(),
                "#ff7f0e".to_owned(),
                "#2ca02c".to_owned(),
                "#d62728".to_owned(),
                "#9467bd".to_owned(),
                "#8c564b".to_owned(),
                "#e377c2".to_owned(),
                "#7f7f7f".to_owned(),
            ],
        }
    }
}

impl RenderConfig {
    /// Resolve a stylesheet class emitted by the layout engine to a concrete
    /// color, so standalone SVG and PNG output match CSS-styled embeddings.
    pub fn class_color(&self, class: &str) -> &str {
        match class {
            "bar" => &self.lane_color,
            "concordance" => &self.concordance_color,
            _ => class
                .strip_prefix("hap")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n >= 1)
                .map(|n| {
                    let palette = &self.hap_palette;
                    palette[(n - 1) % palette.len()].as_str()
                })
                .unwrap_or("#333333"),
        }
    }
}
