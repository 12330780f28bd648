//! Converts one sample's haplotype-block and concordance-bin records into
//! drawable rectangles for the currently visible chromosomes.
//!
//! Re-layout is a full replace: primitives are regenerated from the cached
//! data plus the current visible bound on every domain, data, or color-map
//! change. No incremental diffing.

use crate::coords::GenomeCoordinateModel;
use crate::interval::clip;
use crate::scale::{ScalePair, ViewDomain};
use crate::types::{BasePos, ColorMap, HaploPayload, HaplotypeBlock};

/// How a rectangle gets its color: an explicit CSS color from the color map,
/// or a stylesheet class when no mapping exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    Color(String),
    Class(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    LaneOutline,
    HaplotypeBlock,
    ConcordanceOverlay,
}

/// One drawable rectangle in plot pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub kind: PrimitiveKind,
    pub chr: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Fill,
    /// Resolved strain identity, for hover highlighting across block
    /// boundaries where indices and identities may remap.
    pub strain: Option<String>,
    /// Source block, carried as the hover payload.
    pub block: Option<HaplotypeBlock>,
    pub tooltip: Option<String>,
}

pub struct HaplotypeLayoutEngine<'a> {
    model: &'a GenomeCoordinateModel,
}

impl<'a> HaplotypeLayoutEngine<'a> {
    pub fn new(model: &'a GenomeCoordinateModel) -> Self {
        Self { model }
    }

    /// Lay out every visible chromosome of `payload` against `scales`.
    ///
    /// Identical inputs produce an identical primitive list: lanes are walked
    /// in display order and records in payload order.
    pub fn layout(
        &self,
        payload: &HaploPayload,
        colors: &ColorMap,
        scales: &ScalePair,
        domain: &ViewDomain,
    ) -> Vec<RectPrimitive> {
        let mut rects = Vec::new();
        for chr in scales.lanes.lanes() {
            let Some(extent) = self.model.extent(chr) else {
                log::warn!("chromosome {chr} not in the reference extent table, skipping");
                continue;
            };
            let (bound_start, bound_end) = match domain {
                ViewDomain::FullGenome => (extent.start_pos, extent.end_pos()),
                ViewDomain::Interval(iv) => (iv.start_pos, iv.end_pos),
            };
            let Some(lane_y) = scales.lanes.lane_y(chr) else {
                continue;
            };
            let band = scales.lanes.band();

            // Lane outline behind the calls, spanning the visible part of the
            // chromosome.
            if let Some((s, e)) = clip(extent.start_pos, extent.end_pos(), bound_start, bound_end)
            {
                rects.push(RectPrimitive {
                    kind: PrimitiveKind::LaneOutline,
                    chr: chr.clone(),
                    x: scales.genomic.to_px(s),
                    y: lane_y,
                    width: scales.genomic.to_px(e) - scales.genomic.to_px(s),
                    height: band,
                    fill: Fill::Class("bar".to_owned()),
                    strain: None,
                    block: None,
                    tooltip: None,
                });
            }

            let Some(calls) = payload.viterbi_haplotypes.chromosome_data.get(chr) else {
                continue;
            };
            if calls.results_pending {
                log::debug!("chromosome {chr} results pending, nothing to draw");
                continue;
            }

            for block in &calls.haplotype_blocks {
                let Some((s, e)) = clip(
                    block.start_position_bp,
                    block.end_position_bp,
                    bound_start,
                    bound_end,
                ) else {
                    continue;
                };
                let x = scales.genomic.to_px(s);
                let width = scales.genomic.to_px(e) - scales.genomic.to_px(s);
                if block.is_homozygous() {
                    rects.push(self.block_rect(
                        payload, colors, chr, block, block.haplotype_index_1, x, width, lane_y,
                        band, s, e,
                    ));
                } else {
                    // Two quarter-band bars stacked in the lower half of the
                    // lane; the upper half is reserved for the concordance
                    // overlay. index_1 takes the upper bar, index_2 the lower.
                    rects.push(self.block_rect(
                        payload,
                        colors,
                        chr,
                        block,
                        block.haplotype_index_1,
                        x,
                        width,
                        lane_y + band / 2.0,
                        band / 4.0,
                        s,
                        e,
                    ));
                    rects.push(self.block_rect(
                        payload,
                        colors,
                        chr,
                        block,
                        block.haplotype_index_2,
                        x,
                        width,
                        lane_y + band * 0.75,
                        band / 4.0,
                        s,
                        e,
                    ));
                }
            }

            let Some(bins) = &calls.concordance_bins else {
                continue;
            };
            for bin in bins {
                let Some((s, e)) = clip(
                    bin.start_position_bp,
                    bin.end_position_bp,
                    bound_start,
                    bound_end,
                ) else {
                    continue;
                };
                let height = bin.disagreement_fraction() * band / 2.0;
                if height <= 0.0 {
                    continue;
                }
                let x = scales.genomic.to_px(s);
                rects.push(RectPrimitive {
                    kind: PrimitiveKind::ConcordanceOverlay,
                    chr: chr.clone(),
                    x,
                    // Anchored at the lane midline, growing upward; taller
                    // means more disagreement.
                    y: lane_y + band / 2.0 - height,
                    width: scales.genomic.to_px(e) - x,
                    height,
                    fill: Fill::Class("concordance".to_owned()),
                    strain: None,
                    block: None,
                    tooltip: Some(format!(
                        "Chr{}:{}-{} {}/{} concordant",
                        chr, s, e, bin.concordant_count, bin.informative_count
                    )),
                });
            }
        }
        rects
    }

    #[allow(clippy::too_many_arguments)]
    fn block_rect(
        &self,
        payload: &HaploPayload,
        colors: &ColorMap,
        chr: &str,
        block: &HaplotypeBlock,
        index: usize,
        x: f64,
        width: f64,
        y: f64,
        height: f64,
        clipped_start: BasePos,
        clipped_end: BasePos,
    ) -> RectPrimitive {
        let strain = payload.strain_for_index(index).map(str::to_owned);
        let fill = strain
            .as_deref()
            .and_then(|s| colors.resolve(s))
            .map(|c| Fill::Color(c.to_owned()))
            .unwrap_or_else(|| Fill::Class(format!("hap{}", index + 1)));
        let tooltip = format!(
            "Chr{}:{}-{} {}",
            chr,
            clipped_start,
            clipped_end,
            strain.as_deref().unwrap_or("?"),
        );
        RectPrimitive {
            kind: PrimitiveKind::HaplotypeBlock,
            chr: chr.to_owned(),
            x,
            y,
            width,
            height,
            fill,
            strain,
            block: Some(*block),
            tooltip: Some(tooltip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::PlotGeometry;
    use crate::types::{
        ChromosomeCalls, ChromosomeExtent, ColorEntry, ConcordanceBin, GenomicInterval,
    };

    fn model() -> GenomeCoordinateModel {
        GenomeCoordinateModel::new(vec![
            ChromosomeExtent::new("1", 0, 100),
            ChromosomeExtent::new("2", 0, 50),
        ])
    }

    fn geometry() -> PlotGeometry {
        PlotGeometry {
            width: 150.0,
            height: 120.0,
            left_margin: 50.0,
            right_margin: 0.0,
            axis_reserve: 20.0,
        }
    }

    fn payload_with(chr: &str, calls: ChromosomeCalls) -> HaploPayload {
        let mut payload = HaploPayload {
            contributing_strains: vec![
                "A/J".to_owned(),
                "C57BL/6J".to_owned(),
                "CAST/EiJ".to_owned(),
            ],
            ..Default::default()
        };
        payload
            .viterbi_haplotypes
            .chromosome_data
            .insert(chr.to_owned(), calls);
        payload
    }

    fn block(start: BasePos, end: BasePos, i1: usize, i2: usize) -> HaplotypeBlock {
        HaplotypeBlock {
            start_position_bp: start,
            end_position_bp: end,
            haplotype_index_1: i1,
            haplotype_index_2: i2,
        }
    }

    fn blocks_of(rects: &[RectPrimitive]) -> Vec<&RectPrimitive> {
        rects
            .iter()
            .filter(|r| r.kind == PrimitiveKind::HaplotypeBlock)
            .collect()
    }

    #[test]
    fn homozygous_block_is_one_full_band_rect() {
        let model = model();
        let payload = payload_with(
            "1",
            ChromosomeCalls {
                haplotype_blocks: vec![block(10, 20, 2, 2)],
                ..Default::default()
            },
        );
        let scales = ScalePair::rebuild(&model, &ViewDomain::FullGenome, &geometry());
        let rects = HaplotypeLayoutEngine::new(&model).layout(
            &payload,
            &ColorMap::default(),
            &scales,
            &ViewDomain::FullGenome,
        );

        let blocks = blocks_of(&rects);
        assert_eq!(blocks.len(), 1);
        let r = blocks[0];
        assert_eq!(r.x, scales.genomic.to_px(10));
        assert_eq!(r.x + r.width, scales.genomic.to_px(20));
        assert_eq!(r.y, scales.lanes.lane_y("1").unwrap());
        assert_eq!(r.height, scales.lanes.band());
        assert_eq!(r.strain.as_deref(), Some("CAST/EiJ"));
        assert_eq!(r.fill, Fill::Class("hap3".to_owned()));
    }

    #[test]
    fn het_block_splits_lower_half_between_strains() {
        let model = model();
        let payload = payload_with(
            "1",
            ChromosomeCalls {
                haplotype_blocks: vec![block(10, 20, 0, 1)],
                ..Default::default()
            },
        );
        let scales = ScalePair::rebuild(&model, &ViewDomain::FullGenome, &geometry());
        let rects = HaplotypeLayoutEngine::new(&model).layout(
            &payload,
            &ColorMap::default(),
            &scales,
            &ViewDomain::FullGenome,
        );

        let blocks = blocks_of(&rects);
        assert_eq!(blocks.len(), 2);
        let (upper, lower) = (blocks[0], blocks[1]);
        let lane_y = scales.lanes.lane_y("1").unwrap();
        let band = scales.lanes.band();

        // haplotype_index_1 renders in the upper of the two bars.
        assert_eq!(upper.strain.as_deref(), Some("A/J"));
        assert_eq!(lower.strain.as_deref(), Some("C57BL/6J"));

        // Vertically adjacent, together exactly the lower half of the band.
        assert_eq!(upper.y, lane_y + band / 2.0);
        assert_eq!(upper.height, band / 4.0);
        assert_eq!(lower.y, upper.y + upper.height);
        assert_eq!(lower.height, band / 4.0);
        assert_eq!(lower.y + lower.height, lane_y + band);
    }

    #[test]
    fn blocks_clip_against_zoom_interval() {
        let model = model();
        let payload = payload_with(
            "1",
            ChromosomeCalls {
                haplotype_blocks: vec![block(10, 20, 0, 0), block(60, 90, 1, 1)],
                ..Default::default()
            },
        );
        let domain = ViewDomain::Interval(GenomicInterval::new("1", 15, 50));
        let scales = ScalePair::rebuild(&model, &domain, &geometry());
        let rects = HaplotypeLayoutEngine::new(&model).layout(
            &payload,
            &ColorMap::default(),
            &scales,
            &domain,
        );

        // The second block lies wholly outside the interval: no primitive.
        let blocks = blocks_of(&rects);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].x, scales.genomic.to_px(15));
        assert_eq!(blocks[0].x + blocks[0].width, scales.genomic.to_px(20));
    }

    #[test]
    fn overlay_height_tracks_disagreement() {
        let model = model();
        let bin = |c, i| ConcordanceBin {
            start_position_bp: 0,
            end_position_bp: 50,
            concordant_count: c,
            informative_count: i,
        };
        let scales = ScalePair::rebuild(&model, &ViewDomain::FullGenome, &geometry());
        let engine = HaplotypeLayoutEngine::new(&model);
        let colors = ColorMap::default();

        let height_for = |b: ConcordanceBin| -> f64 {
            let payload = payload_with(
                "1",
                ChromosomeCalls {
                    concordance_bins: Some(vec![b]),
                    ..Default::default()
                },
            );
            engine
                .layout(&payload, &colors, &scales, &ViewDomain::FullGenome)
                .iter()
                .filter(|r| r.kind == PrimitiveKind::ConcordanceOverlay)
                .map(|r| r.height)
                .next()
                .unwrap_or(0.0)
        };

        let band = scales.lanes.band();
        // Monotone decreasing in the concordance ratio.
        let h90 = height_for(bin(81, 90));
        let h70 = height_for(bin(63, 90));
        assert!(h70 > h90);
        // Perfect agreement draws nothing; at or below coin-flip the overlay
        // fills the half band, as does a bin with no informative markers.
        assert_eq!(height_for(bin(90, 90)), 0.0);
        assert_eq!(height_for(bin(45, 90)), band / 2.0);
        assert_eq!(height_for(bin(0, 0)), band / 2.0);
    }

    #[test]
    fn overlay_grows_up_from_the_midline() {
        let model = model();
        let payload = payload_with(
            "1",
            ChromosomeCalls {
                concordance_bins: Some(vec![ConcordanceBin {
                    start_position_bp: 0,
                    end_position_bp: 50,
                    concordant_count: 63,
                    informative_count: 90,
                }]),
                ..Default::default()
            },
        );
        let scales = ScalePair::rebuild(&model, &ViewDomain::FullGenome, &geometry());
        let rects = HaplotypeLayoutEngine::new(&model).layout(
            &payload,
            &ColorMap::default(),
            &scales,
            &ViewDomain::FullGenome,
        );
        let overlay = rects
            .iter()
            .find(|r| r.kind == PrimitiveKind::ConcordanceOverlay)
            .unwrap();
        let midline = scales.lanes.lane_y("1").unwrap() + scales.lanes.band() / 2.0;
        assert!((overlay.y + overlay.height - midline).abs() < 1e-9);
    }

    #[test]
    fn pending_chromosome_draws_only_its_outline() {
        let model = model();
        let payload = payload_with(
            "1",
            ChromosomeCalls {
                results_pending: true,
                haplotype_blocks: vec![block(10, 20, 0, 0)],
                ..Default::default()
            },
        );
        let scales = ScalePair::rebuild(&model, &ViewDomain::FullGenome, &geometry());
        let rects = HaplotypeLayoutEngine::new(&model).layout(
            &payload,
            &ColorMap::default(),
            &scales,
            &ViewDomain::FullGenome,
        );
        assert!(blocks_of(&rects).is_empty());
        assert!(rects.iter().any(|r| r.kind == PrimitiveKind::LaneOutline));
    }

    #[test]
    fn unknown_interval_chromosome_is_skipped_not_fatal() {
        let model = model();
        let payload = payload_with(
            "7",
            ChromosomeCalls {
                haplotype_blocks: vec![block(10, 20, 0, 0)],
                ..Default::default()
            },
        );
        let domain = ViewDomain::Interval(GenomicInterval::new("7", 0, 30));
        let scales = ScalePair::rebuild(&model, &domain, &geometry());
        let rects = HaplotypeLayoutEngine::new(&model).layout(
            &payload,
            &ColorMap::default(),
            &scales,
            &domain,
        );
        assert!(rects.is_empty());
    }

    #[test]
    fn color_map_overrides_class_fallback() {
        let model = model();
        let payload = payload_with(
            "1",
            ChromosomeCalls {
                haplotype_blocks: vec![block(10, 20, 0, 0)],
                ..Default::default()
            },
        );
        let mut colors = ColorMap::default();
        colors.0.insert(
            "A/J".to_owned(),
            ColorEntry {
                color: "#f9a825".to_owned(),
            },
        );
        let scales = ScalePair::rebuild(&model, &ViewDomain::FullGenome, &geometry());
        let rects = HaplotypeLayoutEngine::new(&model).layout(
            &payload,
            &colors,
            &scales,
            &ViewDomain::FullGenome,
        );
        let blocks = blocks_of(&rects);
        assert_eq!(blocks[0].fill, Fill::Color("#f9a825".to_owned()));
    }

    #[test]
    fn layout_is_deterministic() {
        let model = model();
        let payload = payload_with(
            "1",
            ChromosomeCalls {
                haplotype_blocks: vec![block(10, 20, 0, 1), block(30, 40, 2, 2)],
                concordance_bins: Some(vec![ConcordanceBin {
                    start_position_bp: 0,
                    end_position_bp: 50,
                    concordant_count: 70,
                    informative_count: 90,
                }]),
                ..Default::default()
            },
        );
        let scales = ScalePair::rebuild(&model, &ViewDomain::FullGenome, &geometry());
        let engine = HaplotypeLayoutEngine::new(&model);
        let colors = ColorMap::default();
        let a = engine.layout(&payload, &colors, &scales, &ViewDomain::FullGenome);
        let b = engine.layout(&payload, &colors, &scales, &ViewDomain::FullGenome);
        assert_eq!(a, b);
    }
}
