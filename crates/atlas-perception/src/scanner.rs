//! Scanners and their resolved frames.
//!
//! A [`Scanner`] is built once from a raw report and never changes: it keeps
//! the local beacons and, for every [`Rotation`], the beacons rotated into
//! that orientation.  Fixing its absolute frame produces a separate
//! [`ResolvedScanner`] value rather than mutating the scanner.

use std::collections::BTreeSet;

use atlas_types::{ScannerId, ScannerPlacement, Vector3};

use crate::rotation::Rotation;

// ────────────────────────────────────────────────────────────────────────────
// Scanner
// ────────────────────────────────────────────────────────────────────────────

/// A scanner's beacons in its own frame, with all 24 oriented variants.
///
/// Beacons are deduplicated and every variant is kept sorted so that
/// searches over them visit candidates in a deterministic order.
#[derive(Debug, Clone)]
pub struct Scanner {
    id: ScannerId,
    local_beacons: Vec<Vector3>,
    oriented: Vec<Vec<Vector3>>,
}

impl Scanner {
    /// Build a scanner and precompute its oriented variants.
    pub fn new(id: ScannerId, beacons: impl IntoIterator<Item = Vector3>) -> Self {
        let local_beacons: Vec<Vector3> = beacons
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let oriented = Rotation::all()
            .map(|rotation| {
                let mut variant: Vec<Vector3> =
                    local_beacons.iter().map(|&b| rotation.apply(b)).collect();
                variant.sort_unstable();
                variant
            })
            .collect();

        Self {
            id,
            local_beacons,
            oriented,
        }
    }

    pub fn id(&self) -> ScannerId {
        self.id
    }

    /// Beacons exactly as reported (deduplicated, sorted).
    pub fn local_beacons(&self) -> &[Vector3] {
        &self.local_beacons
    }

    /// The local beacons rotated into `rotation`.
    pub fn oriented_variant(&self, rotation: Rotation) -> &[Vector3] {
        &self.oriented[usize::from(rotation.index())]
    }

    pub fn len(&self) -> usize {
        self.local_beacons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local_beacons.is_empty()
    }

    /// Place this scanner at `position` with orientation `rotation`.
    ///
    /// The absolute beacons are the oriented variant translated by
    /// `position`.
    pub fn resolve(&self, position: Vector3, rotation: Rotation) -> ResolvedScanner {
        let absolute_beacons = self
            .oriented_variant(rotation)
            .iter()
            .map(|&b| b + position)
            .collect();
        ResolvedScanner {
            id: self.id,
            position,
            rotation,
            absolute_beacons,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ResolvedScanner
// ────────────────────────────────────────────────────────────────────────────

/// A scanner whose absolute position and orientation are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScanner {
    id: ScannerId,
    position: Vector3,
    rotation: Rotation,
    absolute_beacons: BTreeSet<Vector3>,
}

impl ResolvedScanner {
    /// Resolve `scanner` as the reference frame: origin, identity rotation.
    pub fn reference(scanner: &Scanner) -> Self {
        scanner.resolve(Vector3::ORIGIN, Rotation::IDENTITY)
    }

    pub fn id(&self) -> ScannerId {
        self.id
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Beacons in the reference frame.
    pub fn absolute_beacons(&self) -> &BTreeSet<Vector3> {
        &self.absolute_beacons
    }

    pub fn len(&self) -> usize {
        self.absolute_beacons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.absolute_beacons.is_empty()
    }

    pub fn placement(&self) -> ScannerPlacement {
        ScannerPlacement {
            id: self.id,
            position: self.position,
            rotation: self.rotation.index(),
        }
    }
}
