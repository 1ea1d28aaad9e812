//! # lec-core
//!
//! Core types, ID prefixes, and error types for Lectern.
//!
//! This crate provides the foundational types shared across all Lectern crates:
//! - Entity structs for persisted records (progress, source files, results)
//! - The normalized compiler `Diagnostic` model and test case records
//! - Closed enums for severities, file types, and run statuses
//! - Natural keys for progress records and workspaces
//! - Lesson input shapes supplied by the course collaborator
//! - Response types returned by compile/test/status operations

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod keys;
pub mod lesson;
pub mod responses;
