use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Genomic position in basepairs. Signed: recentering a zoom interval near a
/// chromosome edge can push its start below zero, and the model keeps that
/// value as-is rather than clamping.
pub type BasePos = i64;

/// A contiguous genomic region on one chromosome.
///
/// Invariant: `size == end_pos - start_pos + 1` whenever both ends are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicInterval {
    pub chr: String,
    pub start_pos: BasePos,
    pub end_pos: BasePos,
    pub size: BasePos,
}

impl GenomicInterval {
    pub fn new(chr: impl Into<String>, start_pos: BasePos, end_pos: BasePos) -> Self {
        Self {
            chr: chr.into(),
            start_pos,
            end_pos,
            size: end_pos - start_pos + 1,
        }
    }

    /// Build an interval from a start and a width.
    pub fn with_size(chr: impl Into<String>, start_pos: BasePos, size: BasePos) -> Self {
        Self {
            chr: chr.into(),
            start_pos,
            end_pos: start_pos + size - 1,
            size,
        }
    }
}

/// Size and offset of one chromosome, in canonical display order.
///
/// Accepts both the upstream `startPos` spelling and snake case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromosomeExtent {
    pub chr: String,
    #[serde(default, alias = "startPos")]
    pub start_pos: BasePos,
    pub size: BasePos,
}

impl ChromosomeExtent {
    pub fn new(chr: impl Into<String>, start_pos: BasePos, size: BasePos) -> Self {
        Self {
            chr: chr.into(),
            start_pos,
            size,
        }
    }

    /// Exclusive end of the chromosome.
    pub fn end_pos(&self) -> BasePos {
        self.start_pos + self.size
    }
}

/// One called haplotype segment from the upstream payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaplotypeBlock {
    pub start_position_bp: BasePos,
    pub end_position_bp: BasePos,
    pub haplotype_index_1: usize,
    pub haplotype_index_2: usize,
}

impl HaplotypeBlock {
    /// Equal indices mean a homozygous call, rendered as one full-height bar.
    pub fn is_homozygous(&self) -> bool {
        self.haplotype_index_1 == self.haplotype_index_2
    }
}

/// Agreement between observed and called genotype over one genomic bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceBin {
    pub start_position_bp: BasePos,
    pub end_position_bp: BasePos,
    pub concordant_count: u32,
    pub informative_count: u32,
}

impl ConcordanceBin {
    /// Fraction of the half-lane overlay to fill, in `[0, 1]`.
    ///
    /// The overlay encodes *disagreement*: ratio 1.0 maps to 0.0 and any
    /// ratio at or below 0.5 maps to 1.0. A bin with no informative markers
    /// carries no evidence and also maps to 1.0 rather than dividing by zero.
    pub fn disagreement_fraction(&self) -> f64 {
        if self.informative_count == 0 {
            return 1.0;
        }
        let ratio = f64::from(self.concordant_count) / f64::from(self.informative_count);
        let score = ((ratio - 0.5) * 2.0).max(0.0);
        1.0 - score
    }
}

/// Per-chromosome call results from the upstream payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeCalls {
    #[serde(default)]
    pub results_pending: bool,
    #[serde(default)]
    pub haplotype_blocks: Vec<HaplotypeBlock>,
    /// Absent when the upstream payload carries no confidence data.
    #[serde(default)]
    pub concordance_bins: Option<Vec<ConcordanceBin>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViterbiHaplotypes {
    #[serde(default)]
    pub chromosome_data: HashMap<String, ChromosomeCalls>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaplotypeSample {
    pub obj_id: String,
}

/// One sample's haplotype-call payload as delivered by the data layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HaploPayload {
    #[serde(default)]
    pub contributing_strains: Vec<String>,
    #[serde(default)]
    pub haplotype_samples: Vec<HaplotypeSample>,
    #[serde(default)]
    pub viterbi_haplotypes: ViterbiHaplotypes,
}

impl HaploPayload {
    /// Resolve a haplotype index to the identity of the contributing strain.
    pub fn strain_for_index(&self, index: usize) -> Option<&str> {
        self.contributing_strains.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub color: String,
}

/// Strain/sample identifier to display color, treated as an immutable lookup
/// for one render pass. Missing entries fall back to a CSS class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(pub HashMap<String, ColorEntry>);

impl ColorMap {
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(|e| e.color.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_size_invariant() {
        let iv = GenomicInterval::new("1", 10, 20);
        assert_eq!(iv.size, 11);
        let iv = GenomicInterval::with_size("1", 10, 11);
        assert_eq!(iv.end_pos, 20);
    }

    #[test]
    fn disagreement_endpoints() {
        let full = ConcordanceBin {
            start_position_bp: 0,
            end_position_bp: 10,
            concordant_count: 90,
            informative_count: 90,
        };
        assert_eq!(full.disagreement_fraction(), 0.0);

        let coin_flip = ConcordanceBin {
            concordant_count: 45,
            informative_count: 90,
            ..full
        };
        assert_eq!(coin_flip.disagreement_fraction(), 1.0);

        let below_half = ConcordanceBin {
            concordant_count: 10,
            informative_count: 90,
            ..full
        };
        assert_eq!(below_half.disagreement_fraction(), 1.0);
    }

    #[test]
    fn zero_informative_count_is_not_nan() {
        let empty = ConcordanceBin {
            start_position_bp: 0,
            end_position_bp: 10,
            concordant_count: 0,
            informative_count: 0,
        };
        let f = empty.disagreement_fraction();
        assert!(f.is_finite());
        assert_eq!(f, 1.0);
    }
}
