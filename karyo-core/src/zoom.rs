//! Zoom/pan interaction state machine.
//!
//! The controller owns the active zoom interval as a value and emits a fresh
//! immutable `GenomicInterval` to subscribed listeners on every mutation;
//! callers never hold a mutable reference they expect to keep observing.
//!
//! States: `Unset` (no interval yet, full-genome mode only) -> `Set` ->
//! transient `Dragging`/`Gesturing` during pointer interaction -> `Set` on
//! release.

use crate::interval::recenter;
use crate::scale::ScalePair;
use crate::types::{BasePos, GenomicInterval};

/// Default width of the interval created by a full-genome click, in bp.
pub const DEFAULT_ZOOM_WIDTH: BasePos = 9_999_999;

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&GenomicInterval)>;

#[derive(Debug, Clone, Copy)]
struct GestureBaseline {
    start_pos: BasePos,
    size: BasePos,
}

pub struct ZoomPanController {
    interval: Option<GenomicInterval>,
    drag_anchor_px: Option<f64>,
    gesture_baseline: Option<GestureBaseline>,
    default_zoom_width: BasePos,
    next_listener: ListenerId,
    listeners: Vec<(ListenerId, Listener)>,
}

impl std::fmt::Debug for ZoomPanController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomPanController")
            .field("interval", &self.interval)
            .field("drag_anchor_px", &self.drag_anchor_px)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ZoomPanController {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomPanController {
    /// Start in the `Unset` state (full-genome mode).
    pub fn new() -> Self {
        Self {
            interval: None,
            drag_anchor_px: None,
            gesture_baseline: None,
            default_zoom_width: DEFAULT_ZOOM_WIDTH,
            next_listener: 0,
            listeners: Vec::new(),
        }
    }

    /// Start in the `Set` state with a required interval (interval mode).
    pub fn with_interval(interval: GenomicInterval) -> Self {
        let mut c = Self::new();
        c.interval = Some(interval);
        c
    }

    pub fn set_default_zoom_width(&mut self, width: BasePos) {
        self.default_zoom_width = width;
    }

    pub fn interval(&self) -> Option<&GenomicInterval> {
        self.interval.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor_px.is_some()
    }

    pub fn is_gesturing(&self) -> bool {
        self.gesture_baseline.is_some()
    }

    /// Register a zoom-changed listener; it receives every emitted interval.
    pub fn subscribe(&mut self, f: impl FnMut(&GenomicInterval) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Replace the interval outright (e.g. manual region navigation).
    pub fn set_interval(&mut self, interval: GenomicInterval) {
        self.interval = Some(interval);
        self.emit();
    }

    /// Drop the interval and return to `Unset`. A mode switch, not an
    /// interval mutation, so nothing is emitted.
    pub fn clear_interval(&mut self) {
        self.interval = None;
        self.drag_anchor_px = None;
        self.gesture_baseline = None;
    }

    /// Full-genome click: resolve the clicked (chromosome, basepair) through
    /// the inverse scales and center a default-width interval on it. Returns
    /// true when resolution succeeded and an interval was emitted.
    pub fn click(&mut self, x_px: f64, y_px: f64, scales: &ScalePair) -> bool {
        let Some((chr, bp)) = scales.resolve_point(x_px, y_px) else {
            log::debug!("click at ({x_px:.1}, {y_px:.1}) outside plot area");
            return false;
        };
        let start = bp - self.default_zoom_width / 2;
        self.interval = Some(GenomicInterval::with_size(chr, start, self.default_zoom_width));
        self.emit();
        true
    }

    /// Snapshot the current interval as the gesture baseline. No-op in
    /// `Unset`.
    pub fn begin_gesture(&mut self) {
        self.gesture_baseline = self.interval.as_ref().map(|iv| GestureBaseline {
            start_pos: iv.start_pos,
            size: iv.size,
        });
    }

    /// Apply a cumulative gesture scale factor against the baseline. The new
    /// size is `round(baseline_size / factor)` with the size delta split
    /// symmetrically around the baseline start. Emits only when the size
    /// actually changed, avoiding redundant re-layout.
    pub fn update_gesture(&mut self, scale_factor: f64) {
        let Some(baseline) = self.gesture_baseline else {
            return;
        };
        let Some(iv) = self.interval.as_ref() else {
            return;
        };
        let new_size = (baseline.size as f64 / scale_factor).round() as BasePos;
        if new_size == iv.size {
            return;
        }
        let chr = iv.chr.clone();
        let start = baseline.start_pos + (baseline.size - new_size) / 2;
        self.interval = Some(GenomicInterval::with_size(chr, start, new_size));
        self.emit();
    }

    /// Clear the baseline; the host's gesture accumulator is back to neutral.
    pub fn end_gesture(&mut self) {
        self.gesture_baseline = None;
    }

    /// Record the pointer x as the pan anchor.
    pub fn begin_drag(&mut self, x_px: f64) {
        self.drag_anchor_px = Some(x_px);
    }

    /// Convert the pointer delta since the anchor to a basepair delta via the
    /// inverse genomic scale and shift the interval by it, size held fixed.
    /// The anchor advances to the current position, so dragging is
    /// velocity-relative rather than an absolute replay.
    pub fn update_drag(&mut self, x_px: f64, scales: &ScalePair) {
        let Some(anchor) = self.drag_anchor_px else {
            return;
        };
        let Some(iv) = self.interval.as_ref() else {
            return;
        };
        let delta_bp =
            (scales.genomic.to_bp(x_px) - scales.genomic.to_bp(anchor)).round() as BasePos;
        if delta_bp == 0 {
            return;
        }
        self.interval = Some(recenter(iv, -delta_bp));
        self.drag_anchor_px = Some(x_px);
        self.emit();
    }

    /// Clear the anchor without reverting the interval.
    pub fn end_drag(&mut self) {
        self.drag_anchor_px = None;
    }

    fn emit(&mut self) {
        if let Some(iv) = self.interval.clone() {
            for (_, listener) in &mut self.listeners {
                listener(&iv);
            }
        }
    }
}
