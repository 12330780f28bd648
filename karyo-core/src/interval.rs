//! Interval math: region text parsing, clipping, pan and zoom arithmetic.

use crate::types::{BasePos, GenomicInterval};
use regex::Regex;
use std::sync::OnceLock;

fn region_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:chr)?([0-9a-z]+)\s*[:\s]\s*([0-9]+(?:\.[0-9]+)?)\s*(mb)?\s*-\s*([0-9]+(?:\.[0-9]+)?)\s*(mb)?\s*$",
        )
        .expect("region pattern is valid")
    })
}

/// Parse a textual region spec such as `"chr3:10-20Mb"` or `"3 10000-20000"`.
///
/// Case-insensitive; the `chr` prefix is optional. An `Mb` suffix multiplies
/// its endpoint by 1,000,000, and a suffix on only one endpoint applies to
/// both (so `"chrX:10-20Mb"` spans 10Mb..20Mb). Returns `None` on any
/// non-match; the caller treats that as invalid input, not a fatal error.
/// End-before-start is accepted by the grammar and passed through as-is.
pub fn parse_region(text: &str) -> Option<GenomicInterval> {
    let caps = region_re().captures(text)?;
    let chr = caps.get(1)?.as_str().to_uppercase();
    let start_raw: f64 = caps.get(2)?.as_str().parse().ok()?;
    let end_raw: f64 = caps.get(4)?.as_str().parse().ok()?;
    let start_mb = caps.get(3).is_some();
    let end_mb = caps.get(5).is_some();
    let any_mb = start_mb || end_mb;

    let scale = |raw: f64, own_mb: bool| -> BasePos {
        let mult = if own_mb || any_mb { 1_000_000.0 } else { 1.0 };
        (raw * mult).round() as BasePos
    };

    Some(GenomicInterval::new(
        chr,
        scale(start_raw, start_mb),
        scale(end_raw, end_mb),
    ))
}

/// Intersect `[start, end]` with `[bound_start, bound_end]`.
///
/// Returns `None` when the clipped interval is empty (`start >= end`); the
/// caller must skip drawing in that case. Idempotent: clipping an
/// already-clipped interval against the same bound returns the same result.
pub fn clip(
    start: BasePos,
    end: BasePos,
    bound_start: BasePos,
    bound_end: BasePos,
) -> Option<(BasePos, BasePos)> {
    let s = start.max(bound_start);
    let e = end.min(bound_end);
    if s >= e {
        None
    } else {
        Some((s, e))
    }
}

/// Shift an interval by a basepair delta, holding its size fixed.
pub fn recenter(interval: &GenomicInterval, delta_bp: BasePos) -> GenomicInterval {
    GenomicInterval::with_size(
        interval.chr.clone(),
        interval.start_pos + delta_bp,
        interval.size,
    )
}

/// Resize an interval by `1 / scale_factor`, distributing the size delta
/// symmetrically around the original start so the midpoint stays
/// (approximately) fixed.
pub fn rescale(interval: &GenomicInterval, scale_factor: f64) -> GenomicInterval {
    let new_size = (interval.size as f64 / scale_factor).round() as BasePos;
    let start = interval.start_pos + (interval.size - new_size) / 2;
    GenomicInterval::with_size(interval.chr.clone(), start, new_size)
}
