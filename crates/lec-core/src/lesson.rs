//! Input shapes supplied by the course/lesson collaborator and by callers
//! submitting code.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A file given by path and content.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FileSpec {
    pub path: String,
    pub content: String,
}

/// Starter code for a lesson: a single source string or a list of files.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum InitialCode {
    Single(String),
    Files(Vec<FileSpec>),
}

impl InitialCode {
    /// Flatten into submitted files. A single string becomes the main file
    /// with no caller-supplied name.
    #[must_use]
    pub fn into_submissions(self) -> Vec<SubmittedFile> {
        match self {
            Self::Single(content) => vec![SubmittedFile {
                path: None,
                content,
                is_main: true,
            }],
            Self::Files(files) => files
                .into_iter()
                .enumerate()
                .map(|(idx, file)| SubmittedFile {
                    path: Some(file.path),
                    content: file.content,
                    is_main: idx == 0,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(content) => content.trim().is_empty(),
            Self::Files(files) => files.iter().all(|f| f.content.trim().is_empty()),
        }
    }
}

/// Instructor-authored test file, materialized only for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvaluatorTest {
    pub test_file_name: String,
    pub test_content: String,
}

/// Lesson data consumed by the orchestration layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LessonCode {
    #[serde(default)]
    pub initial_code: Option<InitialCode>,
    #[serde(default)]
    pub test: Option<EvaluatorTest>,
    /// Workspace template providing extra scaffolding.
    #[serde(default)]
    pub template_id: Option<String>,
}

/// A file submitted for saving. The stored name is derived from the
/// declaration in `content` when one is found, overriding `path`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubmittedFile {
    #[serde(default)]
    pub path: Option<String>,
    pub content: String,
    #[serde(default)]
    pub is_main: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn initial_code_accepts_string_or_list() {
        let single: InitialCode = serde_json::from_str(r#""contract A {}""#).unwrap();
        assert_eq!(single, InitialCode::Single("contract A {}".into()));

        let files: InitialCode =
            serde_json::from_str(r#"[{"path": "src/A.sol", "content": "contract A {}"}]"#)
                .unwrap();
        assert_eq!(
            files,
            InitialCode::Files(vec![FileSpec {
                path: "src/A.sol".into(),
                content: "contract A {}".into(),
            }])
        );
    }

    #[test]
    fn first_listed_file_is_main() {
        let code = InitialCode::Files(vec![
            FileSpec {
                path: "src/A.sol".into(),
                content: "contract A {}".into(),
            },
            FileSpec {
                path: "src/L.sol".into(),
                content: "library L {}".into(),
            },
        ]);
        let subs = code.into_submissions();
        assert!(subs[0].is_main);
        assert!(!subs[1].is_main);
        assert_eq!(subs[1].path.as_deref(), Some("src/L.sol"));
    }

    #[test]
    fn blank_initial_code_is_empty() {
        assert!(InitialCode::Single("  \n".into()).is_empty());
        assert!(InitialCode::Files(vec![]).is_empty());
        assert!(!InitialCode::Single("contract A {}".into()).is_empty());
    }

    #[test]
    fn lesson_defaults_are_empty() {
        let lesson: LessonCode = serde_json::from_str("{}").unwrap();
        assert_eq!(lesson, LessonCode::default());
    }
}
