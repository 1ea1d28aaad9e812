//! # lec-toolchain
//!
//! Runs the external compiler toolchain (`forge`) and turns what it prints
//! into Lectern's types.
//!
//! - [`invoke`]: subprocess execution with a wall-clock timeout
//! - [`diagnostics`]: compiler messages from JSON or free text, deduplicated
//! - [`test_report`]: per-test outcomes from JSON or free text

pub mod diagnostics;
pub mod error;
pub mod invoke;
mod json;
pub mod test_report;

pub use diagnostics::{Normalized, Outcome, normalize};
pub use error::ToolchainError;
pub use invoke::{Invocation, Toolchain, build_args, invoke, test_args};
pub use test_report::{ReportSource, TestReport, parse_test_report};
