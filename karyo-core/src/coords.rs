use crate::types::{BasePos, ChromosomeExtent};
use std::collections::HashMap;

/// Ordered chromosome extents plus the derived genome-wide bounds.
///
/// Built once at plot construction from static reference data and never
/// mutated. The extent order is the canonical display order, used for both
/// lane ordering and iteration.
#[derive(Debug, Clone)]
pub struct GenomeCoordinateModel {
    extents: Vec<ChromosomeExtent>,
    index: HashMap<String, usize>,
    min_start_bp: BasePos,
    max_end_bp: BasePos,
}

impl GenomeCoordinateModel {
    pub fn new(extents: Vec<ChromosomeExtent>) -> Self {
        let mut index = HashMap::with_capacity(extents.len());
        let mut min_start_bp = BasePos::MAX;
        let mut max_end_bp = BasePos::MIN;
        for (i, extent) in extents.iter().enumerate() {
            min_start_bp = min_start_bp.min(extent.start_pos);
            max_end_bp = max_end_bp.max(extent.end_pos());
            index.insert(extent.chr.clone(), i);
        }
        Self {
            extents,
            index,
            min_start_bp,
            max_end_bp,
        }
    }

    /// The mm10 mouse reference chromosome sizes, in display order.
    /// Derived from the UCSC goldenPath chromInfo table.
    pub fn mm10() -> Self {
        const MM10_SIZES: &[(&str, i64)] = &[
            ("1", 195_471_971),
            ("2", 182_113_224),
            ("3", 160_039_680),
            ("4", 156_508_116),
            ("5", 151_834_684),
            ("6", 149_736_546),
            ("7", 145_441_459),
            ("8", 129_401_213),
            ("9", 124_595_110),
            ("10", 130_694_993),
            ("11", 122_082_543),
            ("12", 120_129_022),
            ("13", 120_421_639),
            ("14", 124_902_244),
            ("15", 104_043_685),
            ("16", 98_207_768),
            ("17", 94_987_271),
            ("18", 90_702_639),
            ("19", 61_431_566),
            ("X", 171_031_299),
            ("Y", 91_744_698),
            ("M", 16_299),
        ];
        Self::new(
            MM10_SIZES
                .iter()
                .map(|&(chr, size)| ChromosomeExtent::new(chr, 0, size))
                .collect(),
        )
    }

    /// Genome-wide minimum start basepair across all chromosomes.
    pub fn min_start_bp(&self) -> BasePos {
        self.min_start_bp
    }

    /// Genome-wide maximum end basepair across all chromosomes.
    pub fn max_end_bp(&self) -> BasePos {
        self.max_end_bp
    }

    pub fn extent(&self, chr: &str) -> Option<&ChromosomeExtent> {
        self.index.get(chr).map(|&i| &self.extents[i])
    }

    pub fn extents(&self) -> &[ChromosomeExtent] {
        &self.extents
    }

    /// Chromosome ids in display order.
    pub fn chromosome_ids(&self) -> impl Iterator<Item = &str> {
        self.extents.iter().map(|e| e.chr.as_str())
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }
}
