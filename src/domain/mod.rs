//! Domain layer: puzzle models and algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod grid;
pub mod image;
pub mod origami;
pub mod packet;
pub mod polymer;
pub mod snailfish;
pub mod trajectory;

pub use error::{DomainError, DomainResult};
pub use grid::Grid;
pub use image::{Algorithm, Image, TrenchMap};
pub use origami::{Axis, Fold, Manual, Point, Sheet};
pub use packet::{Operator, Packet, Payload};
pub use polymer::{Polymer, Rule};
pub use snailfish::{Reduction, SnailNumber};
pub use trajectory::{Hit, Target};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Uses shellexpand crate for robust expansion. Unknown variables leave the
/// input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
