//! # lec-parser
//!
//! Source scanning for Lectern: finds the contract, interface, or library a
//! Solidity file declares and derives the canonical file name from it.
//!
//! Scanning is regex-based over comment-stripped text with string literals
//! masked, so commented-out or quoted declarations never win.

mod comments;
mod declaration;
mod naming;

pub use declaration::{Declaration, resolve_declaration, resolve_declared_name};
pub use naming::{
    SOURCE_EXTENSION, TEST_EXTENSION, canonical_file_name, file_name_of, is_test_file,
    resolve_file_name,
};
