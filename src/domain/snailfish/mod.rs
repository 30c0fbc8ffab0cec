//! Snailfish numbers: binary trees of regular numbers that reduce by explode
//! and split rules and combine by addition.

pub mod arena;
pub mod parser;
pub mod reduce;

pub use arena::{Element, NodeKind, PreOrder, SnailNode, SnailNumber};
pub use parser::{parse_number, parse_numbers};
pub use reduce::{largest_pair_magnitude, Reduction, EXPLODE_DEPTH, SPLIT_THRESHOLD};
