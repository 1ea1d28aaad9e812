//! # lec-runner
//!
//! Request orchestration for Lectern: save, compile, test, status, reset.
//!
//! Storage is the source of truth. Each request locks the student's
//! workspace, rewrites `src/` and `test/` from the saved files, runs the
//! toolchain, and records the outcome. Compiler errors and failed
//! preconditions come back as statuses inside `Ok` responses; `Err` is kept
//! for timeouts, unsafe paths, and infrastructure failures.

pub mod error;
pub mod locks;
pub mod ops;
pub mod runner;

pub use error::RunnerError;
pub use locks::{LockGuard, WorkspaceLocks};
pub use ops::save::{ResolvedFile, resolve_submission};
pub use runner::Runner;
