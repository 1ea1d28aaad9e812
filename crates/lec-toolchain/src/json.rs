//! Locating the JSON document in toolchain stdout.

use serde::de::DeserializeOwned;

/// Parse stdout as `T`: the whole text first, then from the first line that
/// opens an object. Anything printed before the document is ignored.
pub(crate) fn extract<T: DeserializeOwned>(stdout: &str) -> Option<T> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(doc) = serde_json::from_str(trimmed) {
        return Some(doc);
    }

    let mut offset = 0;
    for line in stdout.split_inclusive('\n') {
        if line.trim_start().starts_with('{') {
            return serde_json::from_str(stdout[offset..].trim()).ok();
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn finds_document_after_preamble() {
        let out = "Compiling 3 files\nSolc finished\n{\"errors\": []}\n";
        let doc: Value = extract(out).unwrap();
        assert!(doc["errors"].is_array());
    }

    #[test]
    fn rejects_non_json() {
        assert!(extract::<Value>("Error: Compiler run failed").is_none());
        assert!(extract::<Value>("").is_none());
    }
}
