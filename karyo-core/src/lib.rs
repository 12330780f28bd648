//! karyo-core
//!
//! Genome-coordinate engine for karyotype haplotype visualization: coordinate
//! models, interval math, composed basepair/lane scales, the zoom/pan
//! interaction state machine, and the haplotype layout engine.

pub mod coords;
pub mod interval;
pub mod io;
pub mod layout;
pub mod scale;
pub mod types;
pub mod zoom;

// Re-export commonly used types and functions
pub use coords::GenomeCoordinateModel;
pub use interval::{clip, parse_region, recenter, rescale};
pub use layout::{Fill, HaplotypeLayoutEngine, PrimitiveKind, RectPrimitive};
pub use scale::{GenomicScale, LaneScale, PlotGeometry, ScalePair, Tick, ViewDomain};
pub use types::{
    BasePos, ChromosomeCalls, ChromosomeExtent, ColorEntry, ColorMap, ConcordanceBin, GenomicInterval,
    HaploPayload, HaplotypeBlock,
};
pub use zoom::{ZoomPanController, DEFAULT_ZOOM_WIDTH};

/// Version information for the karyo core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
