//! ID prefix constants.
//!
//! IDs are generated by the database as `{prefix}-{8 hex chars}`,
//! e.g. `prg-a3f8b2c1`.

pub const PREFIX_PROGRESS: &str = "prg";
pub const PREFIX_SOURCE_FILE: &str = "sfl";
pub const PREFIX_COMPILATION: &str = "cmp";
pub const PREFIX_TEST_RESULT: &str = "tst";

/// All prefixes, used by ID generation tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_PROGRESS,
    PREFIX_SOURCE_FILE,
    PREFIX_COMPILATION,
    PREFIX_TEST_RESULT,
];

/// Extract the prefix part of an ID (`"prg-a3f8b2c1"` -> `Some("prg")`).
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    let (prefix, rest) = id.split_once('-')?;
    (!prefix.is_empty() && !rest.is_empty()).then_some(prefix)
}
