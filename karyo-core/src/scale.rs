//! The two composed scales mapping (chromosome, basepair) to screen space.
//!
//! A `ScalePair` is a plain owned value rebuilt from the visible coordinate
//! domain and passed explicitly to layout and inverse-lookup call sites.
//! Rebuilding is idempotent and has no side effects.

use crate::coords::GenomeCoordinateModel;
use crate::types::{BasePos, GenomicInterval};

/// Inter-lane gap fraction in full-genome mode.
const FULL_GENOME_GAP: f64 = 0.1;
/// Single-chromosome mode uses no gap; the lane is subdivided internally for
/// het/hom rendering instead.
const SINGLE_LANE_GAP: f64 = 0.0;

/// Pixel geometry of the plot surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGeometry {
    pub width: f64,
    pub height: f64,
    pub left_margin: f64,
    pub right_margin: f64,
    /// Vertical space reserved for the basepair axis below the lanes.
    pub axis_reserve: f64,
}

impl Default for PlotGeometry {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            left_margin: 50.0,
            right_margin: 0.0,
            axis_reserve: 50.0,
        }
    }
}

/// The currently visible coordinate domain: the whole genome, or one zoomed
/// interval on a single chromosome.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewDomain {
    FullGenome,
    Interval(GenomicInterval),
}

/// Continuous basepair-to-pixel mapping with forward and inverse evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomicScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

/// One axis tick: position in basepairs plus its rendered label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub bp: f64,
    pub label: String,
}

impl GenomicScale {
    pub fn new(domain: (BasePos, BasePos), range: (f64, f64)) -> Self {
        Self {
            domain_start: domain.0 as f64,
            domain_end: domain.1 as f64,
            range_start: range.0,
            range_end: range.1,
        }
    }

    /// Forward evaluation: basepair to pixel x.
    pub fn to_px(&self, bp: BasePos) -> f64 {
        self.to_px_f(bp as f64)
    }

    pub fn to_px_f(&self, bp: f64) -> f64 {
        let t = (bp - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + t * (self.range_end - self.range_start)
    }

    /// Inverse evaluation: pixel x to (fractional) basepair. Required for
    /// pointer-driven pan and zoom.
    pub fn to_bp(&self, px: f64) -> f64 {
        let t = (px - self.range_start) / (self.range_end - self.range_start);
        self.domain_start + t * (self.domain_end - self.domain_start)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn contains_px(&self, px: f64) -> bool {
        px >= self.range_start.min(self.range_end) && px <= self.range_start.max(self.range_end)
    }

    /// Tick positions with labels in Mb, one decimal.
    pub fn ticks(&self, desired: usize) -> Vec<Tick> {
        let span = (self.domain_end - self.domain_start).max(1.0);
        let step = nice_round_length(span / desired as f64);
        let mut ticks = Vec::new();
        let mut v = (self.domain_start / step).ceil() * step;
        while v <= self.domain_end {
            ticks.push(Tick {
                bp: v,
                label: format!("{:.1}", v / 1e6),
            });
            v += step;
        }
        ticks
    }
}

// Round a length up to a "nice" number: 2, 5, or 10 x 10^k.
fn nice_round_length(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    let base = 10f64.powf(x.log10().floor());
    let mant = x / base;
    let nice = if mant < 2.0 {
        2.0
    } else if mant < 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Ordinal mapping from chromosome id to a vertical lane band.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneScale {
    lanes: Vec<String>,
    range_height: f64,
    gap_fraction: f64,
}

impl LaneScale {
    pub fn new(lanes: Vec<String>, range_height: f64, gap_fraction: f64) -> Self {
        Self {
            lanes,
            range_height,
            gap_fraction,
        }
    }

    /// Vertical step per lane, gap included.
    pub fn step(&self) -> f64 {
        self.range_height / self.lanes.len().max(1) as f64
    }

    /// The resolved per-lane pixel height ("lane band").
    pub fn band(&self) -> f64 {
        self.step() * (1.0 - self.gap_fraction)
    }

    pub fn index(&self, chr: &str) -> Option<usize> {
        self.lanes.iter().position(|l| l == chr)
    }

    /// Top pixel y of the lane band for a chromosome.
    pub fn lane_y(&self, chr: &str) -> Option<f64> {
        let i = self.index(chr)?;
        Some(i as f64 * self.step() + self.step() * self.gap_fraction / 2.0)
    }

    /// Inverse lookup: which lane a pixel y falls in, gaps included.
    pub fn lane_at_y(&self, y: f64) -> Option<&str> {
        if y < 0.0 || y >= self.range_height || self.lanes.is_empty() {
            return None;
        }
        let i = (y / self.step()).floor() as usize;
        self.lanes.get(i.min(self.lanes.len() - 1)).map(String::as_str)
    }

    /// Visible chromosome ids in lane order.
    pub fn lanes(&self) -> &[String] {
        &self.lanes
    }

    /// Axis labels, rendered as `"Chr" + id`.
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.lanes.iter().map(|id| format!("Chr{id}"))
    }
}

/// The composed pair: continuous genomic scale plus ordinal lane scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalePair {
    pub genomic: GenomicScale,
    pub lanes: LaneScale,
}

impl ScalePair {
    /// Build both scales from the visible coordinate domain. Called whenever
    /// the domain changes (zoom interval set or cleared, or mode switch).
    pub fn rebuild(
        model: &GenomeCoordinateModel,
        domain: &ViewDomain,
        geometry: &PlotGeometry,
    ) -> Self {
        let range = (
            geometry.left_margin,
            geometry.width - geometry.right_margin,
        );
        let lane_height = geometry.height - geometry.axis_reserve;
        match domain {
            ViewDomain::FullGenome => Self {
                genomic: GenomicScale::new((model.min_start_bp(), model.max_end_bp()), range),
                lanes: LaneScale::new(
                    model.chromosome_ids().map(str::to_owned).collect(),
                    lane_height,
                    FULL_GENOME_GAP,
                ),
            },
            ViewDomain::Interval(iv) => Self {
                genomic: GenomicScale::new((iv.start_pos, iv.end_pos), range),
                lanes: LaneScale::new(vec![iv.chr.clone()], lane_height, SINGLE_LANE_GAP),
            },
        }
    }

    /// Resolve a pointer position to (chromosome, basepair) via the inverse
    /// scales. `None` when the point falls outside the plot area.
    pub fn resolve_point(&self, x_px: f64, y_px: f64) -> Option<(String, BasePos)> {
        if !self.genomic.contains_px(x_px) {
            return None;
        }
        let chr = self.lanes.lane_at_y(y_px)?.to_owned();
        Some((chr, self.genomic.to_bp(x_px).round() as BasePos))
    }
}
