//! `atlas-perception` – geometry of the scanner alignment problem.
//!
//! Turns raw scanner reports into the oriented point clouds the alignment
//! engine searches over, and decides whether two clouds describe the same
//! patch of space.
//!
//! # Modules
//!
//! - [`rotation`] – [`Rotation`][rotation::Rotation]: the 24 proper
//!   rotations an axis-aligned, right-handed sensor can be mounted at, in a
//!   fixed enumeration order shared by every scanner.
//! - [`scanner`] – [`Scanner`][scanner::Scanner]: a scanner's local beacons
//!   with all 24 oriented variants precomputed, and the immutable
//!   [`ResolvedScanner`][scanner::ResolvedScanner] it becomes once its
//!   absolute frame is known.
//! - [`frame`] – [`FrameTable`][frame::FrameTable]: write-once table of
//!   resolved frames, addressed by scanner index.
//! - [`overlap`] – [`find_overlap`][overlap::find_overlap]: searches
//!   orientations and translations for a placement under which enough
//!   beacons coincide with a resolved anchor.

pub mod frame;
pub mod overlap;
pub mod rotation;
pub mod scanner;

pub use frame::FrameTable;
pub use overlap::{DEFAULT_MIN_OVERLAP, OverlapConfig, Placement, find_overlap};
pub use rotation::Rotation;
pub use scanner::{ResolvedScanner, Scanner};
