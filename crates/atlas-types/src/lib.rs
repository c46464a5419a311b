//! `atlas-types` – shared vocabulary for the beacon-atlas workspace.
//!
//! Holds the integer [`Vector3`] value type together with its quarter-turn
//! rotation primitives, the raw [`ScannerReport`] blocks handed to the
//! alignment engine, the serialisable result records and the workspace-wide
//! [`AtlasError`].

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Vector3
// ────────────────────────────────────────────────────────────────────────────

const QUARTER_COS: [i64; 4] = [1, 0, -1, 0];
const QUARTER_SIN: [i64; 4] = [0, 1, 0, -1];

const fn quarter_turn(turns: i32) -> (i64, i64) {
    let k = turns.rem_euclid(4) as usize;
    (QUARTER_COS[k], QUARTER_SIN[k])
}

/// Largest coordinate magnitude accepted in a scanner report (`2^31`, which
/// covers every 32-bit value).
///
/// [`Vector3`] stores 64-bit coordinates, so rotating a reported beacon,
/// subtracting two of them, or chaining positions across scanners stays far
/// from overflow.
pub const MAX_COORDINATE: i64 = 1 << 31;

/// An exact integer point (or offset) in 3-D space.
///
/// Two vectors with the same coordinates are the same vector; the type is
/// used directly as a set and map key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Vector3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Vector3 {
    /// The origin, `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Rotate about the x axis by `turns` quarter turns.
    pub const fn roll(self, turns: i32) -> Self {
        let (cos, sin) = quarter_turn(turns);
        Self::new(
            self.x,
            cos * self.y + sin * self.z,
            -sin * self.y + cos * self.z,
        )
    }

    /// Rotate about the y axis by `turns` quarter turns.
    pub const fn pitch(self, turns: i32) -> Self {
        let (cos, sin) = quarter_turn(turns);
        Self::new(
            cos * self.x - sin * self.z,
            self.y,
            sin * self.x + cos * self.z,
        )
    }

    /// Rotate about the z axis by `turns` quarter turns.
    pub const fn yaw(self, turns: i32) -> Self {
        let (cos, sin) = quarter_turn(turns);
        Self::new(
            cos * self.x + sin * self.y,
            -sin * self.x + cos * self.y,
            self.z,
        )
    }

    /// Manhattan (taxicab) distance to `other`.
    pub fn manhattan(self, other: Self) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    /// True when every coordinate lies within `±MAX_COORDINATE`.
    pub fn is_within_limits(self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|c| c.unsigned_abs() <= MAX_COORDINATE.unsigned_abs())
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Renders as `x,y,z`, the same form beacons take in scanner reports.
impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Vector3 {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x.into(), y.into(), z.into())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scanner input
// ────────────────────────────────────────────────────────────────────────────

/// Identity of a scanner as given in its report header.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScannerId(pub u32);

impl fmt::Display for ScannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scanner {}", self.0)
    }
}

/// One raw scanner block: the beacons a scanner saw, in its own frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerReport {
    pub id: ScannerId,
    pub beacons: Vec<Vector3>,
}

impl ScannerReport {
    pub fn new(id: u32, beacons: impl IntoIterator<Item = Vector3>) -> Self {
        Self {
            id: ScannerId(id),
            beacons: beacons.into_iter().collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

/// Where a resolved scanner sits in the reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerPlacement {
    pub id: ScannerId,
    /// Absolute position relative to the reference scanner.
    pub position: Vector3,
    /// Orientation index in `[0, 24)`.
    pub rotation: u8,
}

/// Serialisable outcome of one alignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentSummary {
    /// Size of the deduplicated global beacon set.
    pub beacon_count: usize,
    /// Every resolved scanner, in input order.
    pub scanners: Vec<ScannerPlacement>,
    /// Scanners no chain of overlaps could connect to the reference.
    pub unresolved: Vec<ScannerId>,
    /// Largest Manhattan distance between two resolved scanners.
    pub max_scanner_distance: u64,
}

impl AlignmentSummary {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Fatal conditions raised by the alignment engine.
///
/// A pair of scanners failing to overlap is not an error; these variants
/// cover broken invariants and unusable input only.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtlasError {
    #[error("{0} is already resolved")]
    AlreadyResolved(ScannerId),

    #[error("no reference scanner: input contains no scanners")]
    MissingReference,

    #[error("{0} appears more than once in the input")]
    DuplicateScanner(ScannerId),

    #[error("{0} is not part of the input")]
    UnknownScanner(ScannerId),

    #[error("rotation index {0} is outside 0..24")]
    InvalidRotation(u8),

    #[error("{scanner} reports beacon {beacon} outside the supported coordinate range")]
    CoordinateOutOfRange { scanner: ScannerId, beacon: Vector3 },

    #[error("alignment incomplete: {} scanner(s) unresolved", unresolved.len())]
    Incomplete { unresolved: Vec<ScannerId> },
}
