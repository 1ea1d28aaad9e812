//! # lec-workspace
//!
//! Per-student project trees for Lectern.
//!
//! Layout under the configured root:
//!
//! ```text
//! <root>/<course>/lib/                    shared dependencies (write-once)
//! <root>/<course>/students/<student>/     one workspace
//!     foundry.toml
//!     src/
//!     test/
//! ```
//!
//! Every path that comes from outside goes through [`guard::resolve_within`]
//! before it touches disk.

pub mod error;
pub mod guard;
pub mod hide;
pub mod materialize;
pub mod shared_lib;
pub mod sync;
pub mod transient;

pub use error::WorkspaceError;
pub use hide::{HIDDEN_SUFFIX, HiddenFiles};
pub use materialize::{Workspace, WorkspaceOptions, ensure_workspace, workspace_root};
pub use shared_lib::{BootstrapOutcome, ensure_shared_library, shared_library_path};
pub use sync::{SyncReport, read_tree, write_files};
pub use transient::TransientFile;
