//! Global map assembly.
//!
//! Once propagation halts, the absolute beacons of every resolved scanner
//! are unioned into one set.  Beacons seen by several scanners land on the
//! same absolute coordinate and are counted once.

use std::collections::BTreeSet;

use atlas_perception::ResolvedScanner;
use atlas_types::Vector3;

/// Deduplicated beacons of all resolved scanners, in the reference frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalMap {
    beacons: BTreeSet<Vector3>,
}

impl GlobalMap {
    /// Union the absolute beacons of `resolved`.  Scanner state is only read.
    pub fn from_resolved<'a>(resolved: impl IntoIterator<Item = &'a ResolvedScanner>) -> Self {
        let beacons = resolved
            .into_iter()
            .flat_map(|scanner| scanner.absolute_beacons().iter().copied())
            .collect();
        Self { beacons }
    }

    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    pub fn contains(&self, beacon: &Vector3) -> bool {
        self.beacons.contains(beacon)
    }

    /// Beacons in ascending coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &Vector3> {
        self.beacons.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_perception::{Rotation, Scanner};
    use atlas_types::ScannerId;

    #[test]
    fn empty_input_gives_empty_map() {
        let map = GlobalMap::from_resolved(std::iter::empty());
        assert!(map.is_empty());
    }

    #[test]
    fn shared_beacons_are_counted_once() {
        let a = ResolvedScanner::reference(&Scanner::new(
            ScannerId(0),
            [Vector3::new(0, 0, 0), Vector3::new(1, 0, 0), Vector3::new(2, 0, 0)],
        ));
        // Local (0,0,0) and (1,0,0) land on (1,0,0) and (2,0,0).
        let b = Scanner::new(
            ScannerId(1),
            [Vector3::new(0, 0, 0), Vector3::new(1, 0, 0), Vector3::new(0, 0, 9)],
        )
        .resolve(Vector3::new(1, 0, 0), Rotation::IDENTITY);

        let map = GlobalMap::from_resolved([&a, &b]);
        assert_eq!(map.len(), 3 + 3 - 2);
        assert!(map.contains(&Vector3::new(1, 0, 9)));
        assert_eq!(map.iter().next(), Some(&Vector3::ORIGIN));
    }
}
