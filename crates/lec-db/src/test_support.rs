//! Shared test utilities for lec-db.
