//! `atlas-runtime` – alignment control loop.
//!
//! Drives the perception primitives to a single shared coordinate frame and
//! merges every resolved scanner's beacons into one global map.
//!
//! # Modules
//!
//! - [`alignment`] – [`AlignmentEngine`][alignment::AlignmentEngine]:
//!   breadth-first propagation of known frames.  Starting from the reference
//!   scanner, each resolved scanner is used once as an anchor against every
//!   scanner still unresolved; matches are fixed and queued in turn.
//! - [`assembler`] – [`GlobalMap`][assembler::GlobalMap]: the deduplicated
//!   union of all resolved beacons.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber, optionally exporting spans over OTLP.
//!
//! # Example
//!
//! ```rust
//! use atlas_runtime::align_scanners;
//! use atlas_types::{ScannerReport, Vector3};
//!
//! let reports = vec![ScannerReport::new(0, [Vector3::new(1, 2, 3)])];
//! assert_eq!(align_scanners(reports).unwrap(), 1);
//! ```

pub mod alignment;
pub mod assembler;
pub mod telemetry;

pub use alignment::{AlignConfig, Alignment, AlignmentEngine};
pub use assembler::GlobalMap;
pub use telemetry::{LogFormat, TelemetryConfig, TracerProviderGuard, init_tracing};

// Re-exported so callers can tune the detector without depending on
// atlas-perception directly.
pub use atlas_perception::{DEFAULT_MIN_OVERLAP, OverlapConfig};

use atlas_types::{AtlasError, ScannerReport};

/// Align `reports` with the default configuration and return the size of
/// the merged global beacon set.
///
/// Scanners that no chain of overlaps connects to the reference are left out
/// of the count.  Use [`AlignmentEngine`] directly to find out which ones.
pub fn align_scanners(reports: Vec<ScannerReport>) -> Result<usize, AtlasError> {
    let alignment = AlignmentEngine::new(reports, AlignConfig::default())?.run()?;
    Ok(alignment.beacon_count())
}
