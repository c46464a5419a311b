//! Orientation enumerator.
//!
//! A scanner is mounted facing along one of the six axis directions with one
//! of four "up" directions, giving 24 proper rotations (no reflections).
//! [`Rotation`] names each of them by a stable index in `[0, 24)`:
//!
//! | index      | construction                                      |
//! |------------|---------------------------------------------------|
//! | `0..16`    | roll `i / 4` quarter turns, then pitch `i % 4`    |
//! | `16..20`   | yaw −1 quarter turn, then pitch `i % 4`           |
//! | `20..24`   | yaw +1 quarter turn, then pitch `i % 4`           |
//!
//! The numbering itself is arbitrary; what matters is that every scanner
//! uses the same one, so indices found for different scanners compare.
//!
//! # Example
//!
//! ```rust
//! use atlas_perception::rotation::Rotation;
//! use atlas_types::Vector3;
//!
//! let v = Vector3::new(1, 2, 3);
//! assert_eq!(Rotation::IDENTITY.apply(v), v);
//!
//! let r = Rotation::new(21).unwrap();
//! assert_eq!(r.inverse().apply(r.apply(v)), v);
//! ```

use std::fmt;

use atlas_types::{AtlasError, Vector3};

/// A vector whose 24 rotated images are pairwise distinct, used to identify
/// a rotation by its effect.
const PROBE: Vector3 = Vector3::new(1, 2, 3);

const COUNT: usize = 24;

/// `COMPOSE[a][b]` is the index of "apply `a`, then `b`".
const COMPOSE: [[u8; COUNT]; COUNT] = compose_table();

/// `INVERSE[a]` is the index that undoes `a`.
const INVERSE: [u8; COUNT] = inverse_table();

/// One of the 24 proper rotations of an axis-aligned sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rotation(u8);

impl Rotation {
    /// Number of distinct orientations.
    pub const COUNT: usize = COUNT;

    /// Index 0: no rotation at all.
    pub const IDENTITY: Self = Self(0);

    /// Validate a raw orientation index.
    pub fn new(index: u8) -> Result<Self, AtlasError> {
        if usize::from(index) < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(AtlasError::InvalidRotation(index))
        }
    }

    /// The raw orientation index.
    pub fn index(self) -> u8 {
        self.0
    }

    /// All 24 rotations in enumeration order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Rotate `v` into this orientation.
    pub fn apply(self, v: Vector3) -> Vector3 {
        rotate(self.0, v)
    }

    /// The single rotation equivalent to applying `self` and then `next`.
    pub fn then(self, next: Self) -> Self {
        Self(COMPOSE[usize::from(self.0)][usize::from(next.0)])
    }

    /// The rotation that undoes `self`.
    pub fn inverse(self) -> Self {
        Self(INVERSE[usize::from(self.0)])
    }
}

const fn rotate(index: u8, v: Vector3) -> Vector3 {
    let i = index as i32;
    if i < 16 {
        v.roll(i / 4).pitch(i % 4)
    } else {
        let yaw = if i < 20 { -1 } else { 1 };
        v.yaw(yaw).pitch(i % 4)
    }
}

const fn same(a: Vector3, b: Vector3) -> bool {
    a.x == b.x && a.y == b.y && a.z == b.z
}

/// Index of the enumerated rotation that maps `PROBE` to `image`.  Evaluated
/// only at compile time; a miss fails the build.
const fn with_effect(image: Vector3) -> u8 {
    let mut index = 0;
    while index < COUNT as u8 {
        if same(rotate(index, PROBE), image) {
            return index;
        }
        index += 1;
    }
    panic!("enumerated rotations are not closed under composition");
}

const fn compose_table() -> [[u8; COUNT]; COUNT] {
    let mut table = [[0; COUNT]; COUNT];
    let mut a = 0;
    while a < COUNT {
        let mut b = 0;
        while b < COUNT {
            table[a][b] = with_effect(rotate(b as u8, rotate(a as u8, PROBE)));
            b += 1;
        }
        a += 1;
    }
    table
}

const fn inverse_table() -> [u8; COUNT] {
    let mut table = [0; COUNT];
    let mut a = 0;
    while a < COUNT {
        let mut b = 0;
        while b < COUNT && COMPOSE[a][b] != 0 {
            b += 1;
        }
        assert!(b < COUNT, "enumerated rotation without an inverse");
        table[a] = b as u8;
        a += 1;
    }
    table
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<u8> for Rotation {
    type Error = AtlasError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn cross(a: Vector3, b: Vector3) -> Vector3 {
        Vector3::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        )
    }

    #[test]
    fn index_zero_is_identity() {
        let v = Vector3::new(-618, -824, -621);
        assert_eq!(Rotation::IDENTITY.apply(v), v);
        assert_eq!(Rotation::default(), Rotation::IDENTITY);
    }

    #[test]
    fn enumerates_exactly_24_distinct_images() {
        let v = Vector3::new(5, -7, 11);
        let images: HashSet<Vector3> = Rotation::all().map(|r| r.apply(v)).collect();
        assert_eq!(Rotation::all().count(), 24);
        assert_eq!(images.len(), 24);
    }

    #[test]
    fn every_rotation_preserves_handedness() {
        let x = Vector3::new(1, 0, 0);
        let y = Vector3::new(0, 1, 0);
        let z = Vector3::new(0, 0, 1);
        for r in Rotation::all() {
            assert_eq!(cross(r.apply(x), r.apply(y)), r.apply(z), "{r} is a reflection");
        }
    }

    #[test]
    fn composition_is_closed() {
        let v = Vector3::new(4, -9, 2);
        let reachable: HashSet<Vector3> = Rotation::all().map(|r| r.apply(v)).collect();
        for a in Rotation::all() {
            for b in Rotation::all() {
                let composed = b.apply(a.apply(v));
                assert!(reachable.contains(&composed));
                assert_eq!(a.then(b).apply(v), composed);
            }
        }
    }

    #[test]
    fn inverse_undoes_rotation() {
        let v = Vector3::new(-3, 8, 13);
        for r in Rotation::all() {
            assert_eq!(r.inverse().apply(r.apply(v)), v);
            assert_eq!(r.then(r.inverse()), Rotation::IDENTITY);
        }
    }

    #[test]
    fn composition_table_has_identity_row_and_column() {
        for r in Rotation::all() {
            assert_eq!(Rotation::IDENTITY.then(r), r);
            assert_eq!(r.then(Rotation::IDENTITY), r);
            assert_eq!(r.inverse().inverse(), r);
        }
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert_eq!(Rotation::new(24), Err(AtlasError::InvalidRotation(24)));
        assert_eq!(Rotation::try_from(23).map(u8::from), Ok(23));
    }
}
