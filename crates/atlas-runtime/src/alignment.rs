//! [`AlignmentEngine`] – propagation of known frames across scanners.
//!
//! Every scanner is in one of three states: unresolved, resolved and queued,
//! or resolved and already used as an anchor.  The reference scanner starts
//! resolved at the origin with the identity orientation and is queued.  Each
//! step pops the front of the queue and runs the overlap detector with it as
//! the anchor against every scanner that is still unresolved; matches are
//! fixed in the [`FrameTable`] and queued behind it.
//!
//! The loop ends when the queue drains or every scanner is resolved.
//! Scanners that no chain of overlaps reaches stay unresolved; the run still
//! succeeds and [`Alignment::unresolved`] names them.
//!
//! # Example
//!
//! ```rust
//! use atlas_runtime::{AlignConfig, AlignmentEngine, OverlapConfig};
//! use atlas_types::{ScannerId, ScannerReport, Vector3};
//!
//! let seen: Vec<Vector3> = (0..3).map(|i| Vector3::new(i, 2 * i * i, -i)).collect();
//! let shifted = seen.iter().map(|&b| b - Vector3::new(4, 0, 0));
//!
//! let config = AlignConfig {
//!     overlap: OverlapConfig { min_overlap: 3 },
//!     ..AlignConfig::default()
//! };
//! let engine = AlignmentEngine::new(
//!     vec![ScannerReport::new(0, seen.clone()), ScannerReport::new(1, shifted)],
//!     config,
//! )
//! .unwrap();
//!
//! let alignment = engine.run().unwrap();
//! assert!(alignment.is_complete());
//! assert_eq!(alignment.get(ScannerId(1)).unwrap().position(), Vector3::new(4, 0, 0));
//! assert_eq!(alignment.beacon_count(), 3);
//! ```

use std::collections::{HashSet, VecDeque};

use atlas_perception::{FrameTable, OverlapConfig, ResolvedScanner, Scanner, find_overlap};
use atlas_types::{AlignmentSummary, AtlasError, ScannerId, ScannerPlacement, ScannerReport};
use tracing::{debug, info, info_span, warn};

use crate::assembler::GlobalMap;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Settings for one alignment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignConfig {
    /// Overlap detector tuning.
    pub overlap: OverlapConfig,
    /// Scanner that defines the shared frame.  Defaults to the first report.
    pub reference: Option<ScannerId>,
}

// ────────────────────────────────────────────────────────────────────────────
// AlignmentEngine
// ────────────────────────────────────────────────────────────────────────────

/// Scanner arena plus the settings needed to align it.
#[derive(Debug, Clone)]
pub struct AlignmentEngine {
    scanners: Vec<Scanner>,
    reference: usize,
    config: AlignConfig,
}

impl AlignmentEngine {
    /// Build the scanner arena from raw reports.
    ///
    /// Fails on duplicate scanner ids, on beacons outside
    /// `±MAX_COORDINATE`, on an empty input, or when the configured reference
    /// is not among the reports.
    pub fn new(reports: Vec<ScannerReport>, config: AlignConfig) -> Result<Self, AtlasError> {
        let mut ids = HashSet::with_capacity(reports.len());
        for report in &reports {
            if !ids.insert(report.id) {
                return Err(AtlasError::DuplicateScanner(report.id));
            }
            if let Some(&beacon) = report.beacons.iter().find(|b| !b.is_within_limits()) {
                return Err(AtlasError::CoordinateOutOfRange {
                    scanner: report.id,
                    beacon,
                });
            }
        }

        let scanners: Vec<Scanner> = reports
            .into_iter()
            .map(|report| Scanner::new(report.id, report.beacons))
            .collect();

        let reference = match config.reference {
            Some(id) => scanners
                .iter()
                .position(|scanner| scanner.id() == id)
                .ok_or(AtlasError::UnknownScanner(id))?,
            None if scanners.is_empty() => return Err(AtlasError::MissingReference),
            None => 0,
        };

        Ok(Self {
            scanners,
            reference,
            config,
        })
    }

    pub fn scanners(&self) -> &[Scanner] {
        &self.scanners
    }

    pub fn reference(&self) -> &Scanner {
        &self.scanners[self.reference]
    }

    /// Propagate frames from the reference until no more progress is
    /// possible.
    ///
    /// Only invariant violations are errors; an incomplete alignment is a
    /// successful run with unresolved scanners.
    pub fn run(&self) -> Result<Alignment, AtlasError> {
        let span = info_span!(
            "align",
            scanners = self.scanners.len(),
            reference = %self.reference().id(),
            min_overlap = self.config.overlap.min_overlap
        );
        let _enter = span.enter();

        let mut frames = FrameTable::new(self.scanners.len());
        frames.fix(self.reference, ResolvedScanner::reference(self.reference()))?;

        let mut queue = VecDeque::from([self.reference]);

        while !frames.is_complete() {
            let Some(anchor_index) = queue.pop_front() else {
                break;
            };
            let Some(anchor) = frames.get(anchor_index) else {
                continue;
            };
            debug!(anchor = %anchor.id(), pending = queue.len(), "using scanner as anchor");

            let matches: Vec<_> = frames
                .unresolved_indices()
                .filter_map(|index| {
                    let candidate = &self.scanners[index];
                    find_overlap(anchor, candidate, &self.config.overlap)
                        .map(|placement| (index, placement))
                })
                .collect();
            let anchor_id = anchor.id();

            for (index, placement) in matches {
                let scanner = &self.scanners[index];
                let resolved =
                    frames.fix(index, scanner.resolve(placement.position, placement.rotation))?;
                info!(
                    scanner = %resolved.id(),
                    anchor = %anchor_id,
                    position = %resolved.position(),
                    rotation = %resolved.rotation(),
                    shared = placement.shared,
                    "scanner resolved"
                );
                queue.push_back(index);
            }
        }

        let alignment = Alignment::new(self.scanners.iter().map(Scanner::id).collect(), frames);
        if alignment.is_complete() {
            info!(
                resolved = alignment.frames.resolved_count(),
                beacons = alignment.beacon_count(),
                "alignment complete"
            );
        } else {
            warn!(
                unresolved = ?alignment.unresolved(),
                beacons = alignment.beacon_count(),
                "propagation halted with unresolved scanners"
            );
        }
        Ok(alignment)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Alignment
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of [`AlignmentEngine::run`].
#[derive(Debug, Clone)]
pub struct Alignment {
    ids: Vec<ScannerId>,
    frames: FrameTable,
    map: GlobalMap,
}

impl Alignment {
    fn new(ids: Vec<ScannerId>, frames: FrameTable) -> Self {
        let map = GlobalMap::from_resolved(frames.resolved());
        Self { ids, frames, map }
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    /// Resolved scanners in input order.
    pub fn resolved(&self) -> impl Iterator<Item = &ResolvedScanner> {
        self.frames.resolved()
    }

    /// The frame of scanner `id`, if it was resolved.
    pub fn get(&self, id: ScannerId) -> Option<&ResolvedScanner> {
        let index = self.ids.iter().position(|&candidate| candidate == id)?;
        self.frames.get(index)
    }

    /// Scanners left unresolved, in input order.
    pub fn unresolved(&self) -> Vec<ScannerId> {
        self.frames
            .unresolved_indices()
            .map(|index| self.ids[index])
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.frames.is_complete()
    }

    pub fn global_map(&self) -> &GlobalMap {
        &self.map
    }

    /// Size of the deduplicated global beacon set.
    pub fn beacon_count(&self) -> usize {
        self.map.len()
    }

    pub fn placements(&self) -> Vec<ScannerPlacement> {
        self.resolved().map(ResolvedScanner::placement).collect()
    }

    /// Largest Manhattan distance between any two resolved scanners.
    pub fn max_scanner_distance(&self) -> u64 {
        let positions: Vec<_> = self.resolved().map(ResolvedScanner::position).collect();
        positions
            .iter()
            .enumerate()
            .flat_map(|(i, a)| positions[i + 1..].iter().map(move |b| a.manhattan(*b)))
            .max()
            .unwrap_or(0)
    }

    pub fn summary(&self) -> AlignmentSummary {
        AlignmentSummary {
            beacon_count: self.beacon_count(),
            scanners: self.placements(),
            unresolved: self.unresolved(),
            max_scanner_distance: self.max_scanner_distance(),
        }
    }

    /// Turn unresolved scanners into [`AtlasError::Incomplete`].
    pub fn require_complete(self) -> Result<Self, AtlasError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(AtlasError::Incomplete {
                unresolved: self.unresolved(),
            })
        }
    }
}
