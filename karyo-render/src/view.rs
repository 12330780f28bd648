//! The orchestrating plot views.
//!
//! Full-genome and zoomed-interval rendering are two explicit variants
//! behind one `KaryoPlotView` interface. They share the coordinate and
//! layout primitives through `PlotCore` but wire pointer events
//! differently: a full-genome view turns clicks into zoom intervals, an
//! interval view turns drags and pinch gestures into pans and resizes.

use crate::png;
use crate::svg::SvgBuilder;
use crate::RenderConfig;
use anyhow::Result;
use karyo_core::zoom::ListenerId;
use karyo_core::{
    ColorMap, GenomeCoordinateModel, GenomicInterval, HaploPayload, HaplotypeBlock,
    HaplotypeLayoutEngine, PlotGeometry, RectPrimitive, ScalePair, ViewDomain,
    ZoomPanController,
};
use std::path::Path;

/// Hover notification carrying the resolved strain identity, so callers can
/// highlight a strain consistently across block boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverEvent {
    Enter {
        strain: String,
        block: Option<HaplotypeBlock>,
    },
    Leave {
        strain: String,
    },
}

pub type HoverListenerId = u64;

pub type HoverListener = Box<dyn FnMut(&HoverEvent)>;

/// State and behavior shared by both view variants.
struct PlotCore {
    model: GenomeCoordinateModel,
    geometry: PlotGeometry,
    config: RenderConfig,
    domain: ViewDomain,
    scales: ScalePair,
    payload: Option<HaploPayload>,
    colors: Option<ColorMap>,
    primitives: Vec<RectPrimitive>,
    hover_listeners: Vec<(HoverListenerId, HoverListener)>,
    next_hover_listener: HoverListenerId,
    hovered_strain: Option<String>,
}

impl PlotCore {
    fn new(
        model: GenomeCoordinateModel,
        geometry: PlotGeometry,
        config: RenderConfig,
        domain: ViewDomain,
    ) -> Self {
        let scales = ScalePair::rebuild(&model, &domain, &geometry);
        Self {
            model,
            geometry,
            config,
            domain,
            scales,
            payload: None,
            colors: None,
            primitives: Vec::new(),
            hover_listeners: Vec::new(),
            next_hover_listener: 0,
            hovered_strain: None,
        }
    }

    /// Replace the visible domain: axes (scales) rebuild and the primitive
    /// set is regenerated from the cached data.
    fn set_domain(&mut self, domain: ViewDomain) {
        if self.domain == domain {
            return;
        }
        self.domain = domain;
        self.scales = ScalePair::rebuild(&self.model, &self.domain, &self.geometry);
        self.relayout();
    }

    /// Cache-then-default update: an omitted argument reuses the last
    /// supplied value.
    fn update_haplotypes(&mut self, data: Option<HaploPayload>, colors: Option<ColorMap>) {
        if let Some(data) = data {
            self.payload = Some(data);
        } else {
            log::debug!("re-rendering from cached haplotype data");
        }
        if let Some(colors) = colors {
            self.colors = Some(colors);
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        let primitives = {
            let engine = HaplotypeLayoutEngine::new(&self.model);
            let empty_payload = HaploPayload::default();
            let empty_colors = ColorMap::default();
            let payload = self.payload.as_ref().unwrap_or(&empty_payload);
            let colors = self.colors.as_ref().unwrap_or(&empty_colors);
            engine.layout(payload, colors, &self.scales, &self.domain)
        };
        self.primitives = primitives;
    }

    fn legend_entries(&self) -> Vec<(String, String)> {
        let strains = self
            .payload
            .as_ref()
            .map(|p| p.contributing_strains.as_slice())
            .unwrap_or(&[]);
        legend_entries_for(strains, self.colors.as_ref(), &self.config)
    }

    fn render_svg(&self) -> String {
        let mut svg = SvgBuilder::new(&self.config, &self.geometry);
        svg.add_background();
        if let Some(title) = &self.config.title {
            svg.add_title(title);
        }
        for rect in &self.primitives {
            svg.push_rect(rect);
        }
        if self.config.show_axes {
            svg.add_genomic_axis(&self.scales, &self.geometry);
            svg.add_lane_axis(&self.scales, &self.geometry);
        }
        if self.config.show_legend {
            svg.add_legend(&self.legend_entries());
        }
        if self.config.show_footer {
            svg.add_footer();
        }
        svg.to_svg_string()
    }

    fn pointer_hover(&mut self, x: f64, y: f64) {
        let (new_strain, enter) = {
            let hit = self.primitives.iter().rev().find(|r| {
                r.strain.is_some()
                    && x >= r.x
                    && x <= r.x + r.width
                    && y >= r.y
                    && y <= r.y + r.height
            });
            (
                hit.and_then(|r| r.strain.clone()),
                hit.map(|r| (r.strain.clone(), r.block)),
            )
        };
        if new_strain == self.hovered_strain {
            return;
        }
        if let Some(strain) = self.hovered_strain.take() {
            self.dispatch_hover(&HoverEvent::Leave { strain });
        }
        if let Some((Some(strain), block)) = enter {
            self.hovered_strain = Some(strain.clone());
            self.dispatch_hover(&HoverEvent::Enter { strain, block });
        }
    }

    fn dispatch_hover(&mut self, event: &HoverEvent) {
        for (_, listener) in &mut self.hover_listeners {
            listener(event);
        }
    }

    fn on_hover(&mut self, f: HoverListener) -> HoverListenerId {
        let id = self.next_hover_listener;
        self.next_hover_listener += 1;
        self.hover_listeners.push((id, f));
        id
    }

    fn remove_hover_listener(&mut self, id: HoverListenerId) -> bool {
        let before = self.hover_listeners.len();
        self.hover_listeners.retain(|(lid, _)| *lid != id);
        self.hover_listeners.len() != before
    }
}

fn legend_entries_for(
    strains: &[String],
    colors: Option<&ColorMap>,
    config: &RenderConfig,
) -> Vec<(String, String)> {
    strains
        .iter()
        .enumerate()
        .map(|(i, strain)| {
            let color = colors
                .and_then(|c| c.resolve(strain))
                .unwrap_or_else(|| config.class_color(&format!("hap{}", i + 1)));
            (strain.clone(), color.to_owned())
        })
        .collect()
}

/// The capability interface shared by both view variants.
pub trait KaryoPlotView {
    /// Re-render with new data and/or colors; omitted arguments reuse the
    /// cached values from the previous call.
    fn update_haplotypes(&mut self, data: Option<HaploPayload>, colors: Option<ColorMap>);

    /// The current drawable primitive set.
    fn primitives(&self) -> &[RectPrimitive];

    /// The scale pair for the current domain.
    fn scales(&self) -> &ScalePair;

    fn render_svg(&self) -> String;

    fn write_svg(&self, path: &Path) -> Result<()>;

    fn write_png(&self, path: &Path) -> Result<()>;

    /// Standalone legend document: one swatch+label per strain, in order.
    fn draw_legend(&self, colors: &ColorMap, strains: &[String]) -> String;

    /// Inject a pointer move; dispatches hover enter/leave synchronously.
    fn pointer_moved(&mut self, x: f64, y: f64);

    fn on_hover(&mut self, f: HoverListener) -> HoverListenerId;

    fn remove_hover_listener(&mut self, id: HoverListenerId) -> bool;
}

macro_rules! delegate_plot_view {
    ($ty:ty) => {
        impl KaryoPlotView for $ty {
            fn update_haplotypes(
                &mut self,
                data: Option<HaploPayload>,
                colors: Option<ColorMap>,
            ) {
                self.core.update_haplotypes(data, colors);
            }

            fn primitives(&self) -> &[RectPrimitive] {
                &self.core.primitives
            }

            fn scales(&self) -> &ScalePair {
                &self.core.scales
            }

            fn render_svg(&self) -> String {
                self.core.render_svg()
            }

            fn write_svg(&self, path: &Path) -> Result<()> {
                std::fs::write(path, self.render_svg())?;
                Ok(())
            }

            fn write_png(&self, path: &Path) -> Result<()> {
                png::write_png(
                    &self.core.primitives,
                    &self.core.geometry,
                    &self.core.config,
                    path,
                )
            }

            fn draw_legend(&self, colors: &ColorMap, strains: &[String]) -> String {
                let mut svg = SvgBuilder::new(&self.core.config, &self.core.geometry);
                svg.add_legend(&legend_entries_for(
                    strains,
                    Some(colors),
                    &self.core.config,
                ));
                svg.to_svg_string()
            }

            fn pointer_moved(&mut self, x: f64, y: f64) {
                self.core.pointer_hover(x, y);
            }

            fn on_hover(&mut self, f: HoverListener) -> HoverListenerId {
                self.core.on_hover(f)
            }

            fn remove_hover_listener(&mut self, id: HoverListenerId) -> bool {
                self.core.remove_hover_listener(id)
            }
        }
    };
}

/// All chromosomes as lanes; clicks produce zoom intervals for interested
/// listeners but the view itself keeps showing the whole genome.
pub struct FullGenomeView {
    core: PlotCore,
    controller: ZoomPanController,
}

impl FullGenomeView {
    pub fn new(model: GenomeCoordinateModel, geometry: PlotGeometry, config: RenderConfig) -> Self {
        Self {
            core: PlotCore::new(model, geometry, config, ViewDomain::FullGenome),
            controller: ZoomPanController::new(),
        }
    }

    /// A press resolves the clicked (chromosome, basepair) and centers a
    /// default-width zoom interval on it. Returns false when the press fell
    /// outside the plot area.
    pub fn pointer_pressed(&mut self, x: f64, y: f64) -> bool {
        self.controller.click(x, y, &self.core.scales)
    }

    pub fn on_zoom_changed(
        &mut self,
        f: impl FnMut(&GenomicInterval) + 'static,
    ) -> ListenerId {
        self.controller.subscribe(f)
    }

    pub fn remove_zoom_listener(&mut self, id: ListenerId) -> bool {
        self.controller.unsubscribe(id)
    }

    pub fn zoom_interval(&self) -> Option<&GenomicInterval> {
        self.controller.interval()
    }

    pub fn set_default_zoom_width(&mut self, width: karyo_core::BasePos) {
        self.controller.set_default_zoom_width(width);
    }
}

delegate_plot_view!(FullGenomeView);

/// One chromosome, one zoomed interval; drags pan and gestures resize.
pub struct ZoomedIntervalView {
    core: PlotCore,
    controller: ZoomPanController,
}

impl ZoomedIntervalView {
    pub fn new(
        model: GenomeCoordinateModel,
        geometry: PlotGeometry,
        config: RenderConfig,
        interval: GenomicInterval,
    ) -> Self {
        Self {
            core: PlotCore::new(
                model,
                geometry,
                config,
                ViewDomain::Interval(interval.clone()),
            ),
            controller: ZoomPanController::with_interval(interval),
        }
    }

    pub fn zoom_interval(&self) -> &GenomicInterval {
        match &self.core.domain {
            ViewDomain::Interval(iv) => iv,
            ViewDomain::FullGenome => unreachable!("interval view always has an interval"),
        }
    }

    pub fn set_zoom_interval(&mut self, interval: GenomicInterval) {
        self.controller.set_interval(interval);
        self.sync_domain();
    }

    pub fn on_zoom_changed(
        &mut self,
        f: impl FnMut(&GenomicInterval) + 'static,
    ) -> ListenerId {
        self.controller.subscribe(f)
    }

    pub fn remove_zoom_listener(&mut self, id: ListenerId) -> bool {
        self.controller.unsubscribe(id)
    }

    pub fn pointer_pressed(&mut self, x: f64) {
        self.controller.begin_drag(x);
    }

    pub fn pointer_dragged(&mut self, x: f64) {
        self.controller.update_drag(x, &self.core.scales);
        self.sync_domain();
    }

    pub fn pointer_released(&mut self) {
        self.controller.end_drag();
    }

    pub fn gesture_began(&mut self) {
        self.controller.begin_gesture();
    }

    pub fn gesture_updated(&mut self, scale_factor: f64) {
        self.controller.update_gesture(scale_factor);
        self.sync_domain();
    }

    pub fn gesture_ended(&mut self) {
        self.controller.end_gesture();
    }

    /// Pull the controller's interval into the visible domain; scales and
    /// primitives re-derive from the emitted value.
    fn sync_domain(&mut self) {
        if let Some(iv) = self.controller.interval().cloned() {
            self.core.set_domain(ViewDomain::Interval(iv));
        }
    }
}

delegate_plot_view!(ZoomedIntervalView);
