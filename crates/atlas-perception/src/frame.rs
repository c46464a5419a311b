//! [`FrameTable`] – write-once record of resolved scanner frames.
//!
//! Scanners live in an arena and are addressed by their index in it; the
//! table holds one slot per index.  A slot goes from empty to resolved
//! exactly once.  Fixing an occupied slot is an invariant violation and
//! returns [`AtlasError::AlreadyResolved`] instead of overwriting it.

use atlas_types::AtlasError;

use crate::scanner::ResolvedScanner;

/// Resolution state of every scanner in an arena.
///
/// # Example
///
/// ```
/// use atlas_perception::{FrameTable, ResolvedScanner, Scanner};
/// use atlas_types::{ScannerId, Vector3};
///
/// let scanner = Scanner::new(ScannerId(0), [Vector3::new(1, 2, 3)]);
/// let mut frames = FrameTable::new(1);
///
/// frames.fix(0, ResolvedScanner::reference(&scanner)).unwrap();
/// assert!(frames.is_complete());
/// assert!(frames.fix(0, ResolvedScanner::reference(&scanner)).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    slots: Vec<Option<ResolvedScanner>>,
}

impl FrameTable {
    /// A table for `len` scanners, all unresolved.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Record the frame of the scanner at `index`.
    ///
    /// Fails with [`AtlasError::AlreadyResolved`] if that scanner already
    /// has a frame, and with [`AtlasError::UnknownScanner`] if `index` is
    /// outside the table.
    pub fn fix(
        &mut self,
        index: usize,
        resolved: ResolvedScanner,
    ) -> Result<&ResolvedScanner, AtlasError> {
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(AtlasError::UnknownScanner(resolved.id()));
        };
        if let Some(existing) = slot.as_ref() {
            return Err(AtlasError::AlreadyResolved(existing.id()));
        }
        let stored: &ResolvedScanner = slot.insert(resolved);
        Ok(stored)
    }

    pub fn get(&self, index: usize) -> Option<&ResolvedScanner> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_resolved(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Resolved frames in index order.
    pub fn resolved(&self) -> impl Iterator<Item = &ResolvedScanner> {
        self.slots.iter().flatten()
    }

    /// Indices still waiting for a frame, in ascending order.
    pub fn unresolved_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| index)
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved().count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True once every slot holds a frame.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Rotation;
    use crate::scanner::Scanner;
    use atlas_types::{ScannerId, Vector3};

    fn scanner(id: u32) -> Scanner {
        Scanner::new(ScannerId(id), [Vector3::new(1, 0, 0), Vector3::new(0, 4, 9)])
    }

    #[test]
    fn new_table_is_unresolved() {
        let frames = FrameTable::new(3);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames.resolved_count(), 0);
        assert_eq!(frames.unresolved_indices().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(!frames.is_complete());
    }

    #[test]
    fn fix_records_frame() {
        let mut frames = FrameTable::new(2);
        let resolved = scanner(1).resolve(Vector3::new(5, 5, 0), Rotation::new(3).unwrap());
        let stored = frames.fix(1, resolved.clone()).unwrap();
        assert_eq!(stored, &resolved);
        assert!(frames.is_resolved(1));
        assert!(!frames.is_resolved(0));
        assert_eq!(frames.unresolved_indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn second_fix_is_rejected_and_keeps_first_frame() {
        let mut frames = FrameTable::new(1);
        let first = ResolvedScanner::reference(&scanner(4));
        frames.fix(0, first.clone()).unwrap();

        let second = scanner(4).resolve(Vector3::new(1, 1, 1), Rotation::new(5).unwrap());
        let err = frames.fix(0, second).unwrap_err();
        assert_eq!(err, AtlasError::AlreadyResolved(ScannerId(4)));
        assert_eq!(frames.get(0), Some(&first));
    }

    #[test]
    fn fix_outside_table_is_rejected() {
        let mut frames = FrameTable::new(1);
        let err = frames
            .fix(3, ResolvedScanner::reference(&scanner(9)))
            .unwrap_err();
        assert_eq!(err, AtlasError::UnknownScanner(ScannerId(9)));
    }

    #[test]
    fn complete_once_every_slot_is_fixed() {
        let mut frames = FrameTable::new(2);
        frames.fix(0, ResolvedScanner::reference(&scanner(0))).unwrap();
        assert!(!frames.is_complete());
        frames
            .fix(1, scanner(1).resolve(Vector3::ORIGIN, Rotation::IDENTITY))
            .unwrap();
        assert!(frames.is_complete());
        assert_eq!(frames.resolved().map(|r| r.id().0).collect::<Vec<_>>(), vec![0, 1]);
    }
}
