//! Overlap detection between a resolved anchor and an unresolved scanner.
//!
//! For every orientation of the candidate, every pairing of an anchor beacon
//! with a candidate beacon proposes a translation.  The candidate's oriented
//! beacons are shifted by it and compared with the anchor's absolute beacons;
//! the first placement where at least [`OverlapConfig::min_overlap`] beacons
//! coincide wins.  Coordinates are exact integers, so coincidence is plain
//! equality and no distance-based consistency check is involved.
//!
//! Cost is `O(24 · |A| · |B|)` candidate translations, each checked in
//! `O(|B| log |A|)`.  Scanners see tens of beacons, not thousands.

use std::collections::{BTreeSet, HashSet};

use atlas_types::Vector3;
use tracing::{debug, instrument};

use crate::rotation::Rotation;
use crate::scanner::{ResolvedScanner, Scanner};

/// Smallest overlap accepted as a genuine match.
pub const DEFAULT_MIN_OVERLAP: usize = 12;

/// Tuning for [`find_overlap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapConfig {
    /// Beacons that must coincide for a placement to be accepted.
    /// Values below 1 behave as 1.
    pub min_overlap: usize,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
        }
    }
}

/// A placement of the candidate scanner in the anchor's (absolute) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Absolute position of the candidate scanner.
    pub position: Vector3,
    /// Orientation of the candidate scanner.
    pub rotation: Rotation,
    /// Number of beacons shared with the anchor under this placement.
    pub shared: usize,
}

/// Search for a placement of `candidate` consistent with `anchor`.
///
/// Returns `None` when no orientation and translation make enough beacons
/// coincide.  That is the normal outcome for scanners that do not see the
/// same region, not an error.
///
/// # Example
///
/// ```
/// use atlas_perception::{find_overlap, OverlapConfig, ResolvedScanner, Rotation, Scanner};
/// use atlas_types::{ScannerId, Vector3};
///
/// let beacons: Vec<Vector3> = (0..4).map(|i| Vector3::new(i, i * i, 7 - 2 * i)).collect();
/// let anchor = ResolvedScanner::reference(&Scanner::new(ScannerId(0), beacons.clone()));
///
/// let offset = Vector3::new(10, 0, -3);
/// let moved = Scanner::new(ScannerId(1), beacons.iter().map(|&b| b - offset));
///
/// let config = OverlapConfig { min_overlap: 4 };
/// let placement = find_overlap(&anchor, &moved, &config).unwrap();
/// assert_eq!(placement.rotation, Rotation::IDENTITY);
/// assert_eq!(placement.position, offset);
/// ```
#[instrument(
    level = "debug",
    skip_all,
    fields(anchor = %anchor.id(), candidate = %candidate.id())
)]
pub fn find_overlap(
    anchor: &ResolvedScanner,
    candidate: &Scanner,
    config: &OverlapConfig,
) -> Option<Placement> {
    let needed = config.min_overlap.max(1);
    if anchor.len() < needed || candidate.len() < needed {
        return None;
    }

    let anchor_beacons = anchor.absolute_beacons();
    let mut tried = HashSet::new();

    for rotation in Rotation::all() {
        let variant = candidate.oriented_variant(rotation);
        tried.clear();

        for &a in anchor_beacons {
            for &b in variant {
                let translation = a - b;
                // A translation that failed once fails again.
                if !tried.insert(translation) {
                    continue;
                }
                if reaches_threshold(anchor_beacons, variant, translation, needed) {
                    let shared = count_coincident(anchor_beacons, variant, translation);
                    debug!(%rotation, position = %translation, shared, "overlap found");
                    return Some(Placement {
                        position: translation,
                        rotation,
                        shared,
                    });
                }
            }
        }
    }

    None
}

/// Number of `variant` beacons that land on an anchor beacon once shifted
/// by `translation`.
pub fn count_coincident(
    anchor: &BTreeSet<Vector3>,
    variant: &[Vector3],
    translation: Vector3,
) -> usize {
    variant
        .iter()
        .filter(|&&b| anchor.contains(&(b + translation)))
        .count()
}

/// Like [`count_coincident`] `>= needed`, but gives up as soon as the
/// outcome is decided.
fn reaches_threshold(
    anchor: &BTreeSet<Vector3>,
    variant: &[Vector3],
    translation: Vector3,
    needed: usize,
) -> bool {
    let mut shared = 0;
    for (seen, &b) in variant.iter().enumerate() {
        if anchor.contains(&(b + translation)) {
            shared += 1;
            if shared >= needed {
                return true;
            }
        } else if shared + (variant.len() - seen - 1) < needed {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_types::ScannerId;

    fn cloud() -> Vec<Vector3> {
        [
            (404, -588, -901),
            (528, -643, 409),
            (-838, 591, 734),
            (390, -675, -793),
            (-537, -823, -458),
            (-485, -357, 347),
            (-345, -311, 381),
            (-661, -816, -575),
            (-876, 649, 763),
            (-618, -824, -621),
            (553, 345, -567),
            (474, 580, 667),
            (-447, -329, 318),
            (-584, 868, -557),
        ]
        .into_iter()
        .map(Vector3::from)
        .collect()
    }

    fn extras() -> Vec<Vector3> {
        vec![
            Vector3::new(1601, 13, -40),
            Vector3::new(2117, -906, 301),
            Vector3::new(1888, 444, -1290),
        ]
    }

    /// How a sensor mounted with `mount` at `offset` reports `points`.
    fn observed(points: &[Vector3], mount: Rotation, offset: Vector3) -> Vec<Vector3> {
        points.iter().map(|&p| mount.apply(p) + offset).collect()
    }

    fn anchor(points: &[Vector3]) -> ResolvedScanner {
        ResolvedScanner::reference(&Scanner::new(ScannerId(0), points.iter().copied()))
    }

    // ── Threshold ───────────────────────────────────────────────────────────

    #[test]
    fn twelve_shared_beacons_match() {
        let world = cloud();
        let mount = Rotation::new(13).unwrap();
        let offset = Vector3::new(-68, 1246, 43);

        let mut seen = observed(&world[..12], mount, offset);
        seen.extend(extras());
        let candidate = Scanner::new(ScannerId(1), seen);

        let placement =
            find_overlap(&anchor(&world[..12]), &candidate, &OverlapConfig::default()).unwrap();
        assert_eq!(placement.shared, 12);
        assert_eq!(placement.rotation, mount.inverse());
        assert_eq!(placement.position, -placement.rotation.apply(offset));
    }

    #[test]
    fn eleven_shared_beacons_do_not_match() {
        let world = cloud();
        let mount = Rotation::new(13).unwrap();
        let offset = Vector3::new(-68, 1246, 43);

        let mut seen = observed(&world[..11], mount, offset);
        seen.extend(extras());
        let candidate = Scanner::new(ScannerId(1), seen);

        assert!(find_overlap(&anchor(&world[..12]), &candidate, &OverlapConfig::default()).is_none());
    }

    #[test]
    fn lower_threshold_accepts_smaller_overlap() {
        let world = cloud();
        let mount = Rotation::new(18).unwrap();
        let offset = Vector3::new(5, 5, 0);
        let candidate = Scanner::new(ScannerId(1), observed(&world[..6], mount, offset));

        let config = OverlapConfig { min_overlap: 6 };
        let placement = find_overlap(&anchor(&world), &candidate, &config).unwrap();
        assert_eq!(placement.shared, 6);
        assert_eq!(placement.rotation, mount.inverse());
    }

    #[test]
    fn too_few_beacons_short_circuit() {
        let world = cloud();
        let candidate = Scanner::new(ScannerId(1), world[..5].iter().copied());
        assert!(find_overlap(&anchor(&world), &candidate, &OverlapConfig::default()).is_none());
    }

    // ── Placement ───────────────────────────────────────────────────────────

    #[test]
    fn placement_maps_candidate_onto_anchor() {
        let world = cloud();
        let mount = Rotation::new(6).unwrap();
        let offset = Vector3::new(1105, -1205, 1229);
        let candidate = Scanner::new(ScannerId(1), observed(&world, mount, offset));

        let a = anchor(&world);
        let placement = find_overlap(&a, &candidate, &OverlapConfig::default()).unwrap();
        let resolved = candidate.resolve(placement.position, placement.rotation);
        assert_eq!(resolved.absolute_beacons(), a.absolute_beacons());
        assert_eq!(placement.shared, world.len());
    }

    #[test]
    fn overlap_is_symmetric() {
        let world = cloud();
        let mount = Rotation::new(22).unwrap();
        let offset = Vector3::new(-20, -1133, 1061);

        let a_scanner = Scanner::new(ScannerId(0), world.iter().copied());
        let mut seen = observed(&world[2..], mount, offset);
        seen.extend(extras());
        let b_scanner = Scanner::new(ScannerId(1), seen);

        let forward = find_overlap(
            &ResolvedScanner::reference(&a_scanner),
            &b_scanner,
            &OverlapConfig::default(),
        )
        .unwrap();
        let backward = find_overlap(
            &ResolvedScanner::reference(&b_scanner),
            &a_scanner,
            &OverlapConfig::default(),
        )
        .unwrap();

        assert_eq!(backward.rotation, forward.rotation.inverse());
        assert_eq!(backward.position, -backward.rotation.apply(forward.position));
        assert_eq!(backward.shared, forward.shared);
    }

    #[test]
    fn unrelated_clouds_do_not_match() {
        let world = cloud();
        let other: Vec<Vector3> = (0..14)
            .map(|i| Vector3::new(37 * i * i - 500, 91 * i - 300, 13 * i * i * i % 997))
            .collect();
        let candidate = Scanner::new(ScannerId(2), other);
        assert!(find_overlap(&anchor(&world), &candidate, &OverlapConfig::default()).is_none());
    }

    // ── Counting ────────────────────────────────────────────────────────────

    #[test]
    fn count_coincident_counts_shifted_hits() {
        let anchor: BTreeSet<Vector3> = [Vector3::new(1, 1, 1), Vector3::new(2, 2, 2)].into();
        let variant = [Vector3::new(0, 0, 0), Vector3::new(1, 1, 1), Vector3::new(9, 9, 9)];
        assert_eq!(count_coincident(&anchor, &variant, Vector3::new(1, 1, 1)), 2);
        assert_eq!(count_coincident(&anchor, &variant, Vector3::ORIGIN), 1);
        assert!(reaches_threshold(&anchor, &variant, Vector3::new(1, 1, 1), 2));
        assert!(!reaches_threshold(&anchor, &variant, Vector3::ORIGIN, 2));
    }
}
