//! advent: puzzle solvers behind a layered CLI.
//!
//! Layers, innermost first: `domain` (models and algorithms, no I/O),
//! `application` (services), `infrastructure` (filesystem and wiring),
//! `cli` (arguments, dispatch and output).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
