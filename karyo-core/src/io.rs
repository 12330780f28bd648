//! Readers for the upstream haplotype-call payload, color maps, and
//! chromosome extent tables.
//!
//! All inputs are JSON; a `.gz` extension selects gzip decompression.

use crate::types::{ChromosomeExtent, ColorMap, HaploPayload};
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, PayloadError> {
    let file = File::open(path)?;
    let is_gz = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
    if is_gz {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PayloadError> {
    let reader = BufReader::new(open_maybe_gz(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Read one sample's haplotype-call payload.
pub fn read_payload(path: impl AsRef<Path>) -> Result<HaploPayload, PayloadError> {
    let path = path.as_ref();
    let payload: HaploPayload = read_json(path)?;
    log::debug!(
        "loaded payload from {}: {} strains, {} chromosomes",
        path.display(),
        payload.contributing_strains.len(),
        payload.viterbi_haplotypes.chromosome_data.len()
    );
    Ok(payload)
}

/// Read a strain/sample color map (`{"<id>": {"color": "#rrggbb"}}`).
pub fn read_color_map(path: impl AsRef<Path>) -> Result<ColorMap, PayloadError> {
    read_json(path.as_ref())
}

/// Read an ordered chromosome extent table
/// (`[{"chr": "1", "start_pos": 0, "size": 195471971}, ...]`).
pub fn read_chromosome_extents(
    path: impl AsRef<Path>,
) -> Result<Vec<ChromosomeExtent>, PayloadError> {
    read_json(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAYLOAD: &str = r#"{
        "contributing_strains": ["A/J", "C57BL/6J"],
        "haplotype_samples": [{"obj_id": "sample-1"}],
        "viterbi_haplotypes": {
            "chromosome_data": {
                "1": {
                    "results_pending": false,
                    "haplotype_blocks": [
                        {"start_position_bp": 3000000, "end_position_bp": 5500000,
                         "haplotype_index_1": 0, "haplotype_index_2": 1}
                    ],
                    "concordance_bins": [
                        {"start_position_bp": 3000000, "end_position_bp": 4000000,
                         "concordant_count": 87, "informative_count": 90}
                    ]
                },
                "2": {"results_pending": true}
            }
        }
    }"#;

    #[test]
    fn reads_plain_payload() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(PAYLOAD.as_bytes()).unwrap();

        let payload = read_payload(file.path()).unwrap();
        assert_eq!(payload.contributing_strains.len(), 2);
        let chr1 = &payload.viterbi_haplotypes.chromosome_data["1"];
        assert_eq!(chr1.haplotype_blocks.len(), 1);
        assert_eq!(chr1.concordance_bins.as_ref().unwrap().len(), 1);
        // A pending chromosome deserializes with missing arrays defaulted.
        let chr2 = &payload.viterbi_haplotypes.chromosome_data["2"];
        assert!(chr2.results_pending);
        assert!(chr2.haplotype_blocks.is_empty());
        assert!(chr2.concordance_bins.is_none());
    }

    #[test]
    fn reads_gzipped_payload() {
        let mut file = tempfile::Builder::new().suffix(".json.gz").tempfile().unwrap();
        let mut enc =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(PAYLOAD.as_bytes()).unwrap();
        file.write_all(&enc.finish().unwrap()).unwrap();

        let payload = read_payload(file.path()).unwrap();
        assert_eq!(payload.haplotype_samples[0].obj_id, "sample-1");
    }

    #[test]
    fn reads_color_map() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br##"{"A/J": {"color": "#f9a825"}}"##).unwrap();
        let colors = read_color_map(file.path()).unwrap();
        assert_eq!(colors.resolve("A/J"), Some("#f9a825"));
        assert_eq!(colors.resolve("unknown"), None);
    }

    #[test]
    fn reads_extent_table_with_upstream_field_names() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"[{"chr": "1", "startPos": 0, "size": 195471971},
                 {"chr": "X", "size": 171031299}]"#,
        )
        .unwrap();
        let extents = read_chromosome_extents(file.path()).unwrap();
        assert_eq!(extents.len(), 2);
        assert_eq!(extents[0].size, 195_471_971);
        assert_eq!(extents[1].chr, "X");
        assert_eq!(extents[1].start_pos, 0);
    }

    #[test]
    fn malformed_json_is_a_typed_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{not json").unwrap();
        match read_payload(file.path()) {
            Err(PayloadError::Json(_)) => {}
            other => panic!("expected Json error, got {other:?}"),
        }
    }
}
