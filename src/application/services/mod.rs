//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod puzzle;
mod snailfish;

pub use puzzle::{Answer, Answers, Puzzle, PuzzleService};
pub use snailfish::{SnailSum, SnailfishService};
