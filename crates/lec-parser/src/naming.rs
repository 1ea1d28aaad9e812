//! Canonical file names derived from declarations.

use std::path::Path;

use crate::declaration::resolve_declared_name;

pub const SOURCE_EXTENSION: &str = ".sol";
pub const TEST_EXTENSION: &str = ".t.sol";

/// `Name.sol`, or `Name.t.sol` for tests.
#[must_use]
pub fn canonical_file_name(name: &str, is_test: bool) -> String {
    if is_test {
        format!("{name}{TEST_EXTENSION}")
    } else {
        format!("{name}{SOURCE_EXTENSION}")
    }
}

#[must_use]
pub fn is_test_file(path: &str) -> bool {
    path.ends_with(TEST_EXTENSION)
}

/// Final path component, tolerating both separators.
#[must_use]
pub fn file_name_of(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    (!name.is_empty()).then_some(name)
}

/// Pick the file name a submission is stored under.
///
/// The declared name wins over whatever the caller sent. Without a
/// declaration the caller's file name is kept when it has the right
/// extension.
#[must_use]
pub fn resolve_file_name(source: &str, caller_path: Option<&str>, is_test: bool) -> Option<String> {
    if let Some(name) = resolve_declared_name(source) {
        return Some(canonical_file_name(&name, is_test));
    }

    let name = caller_path.and_then(file_name_of)?;
    tracing::debug!(name, "no declaration found, keeping submitted file name");
    let valid = if is_test {
        is_test_file(name)
    } else {
        Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sol"))
    };
    valid.then(|| name.to_string())
}
