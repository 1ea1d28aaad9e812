//! Workspace layout and shared-library bootstrap configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default root under which all course workspaces live.
fn default_root() -> String {
    "./workspaces".to_string()
}

/// Dependency folders recognized in a course's shared library.
fn default_dependencies() -> Vec<String> {
    vec!["forge-std".to_string(), "openzeppelin-contracts".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Root directory for `<course>/lib` and `<course>/students/<student>`.
    #[serde(default = "default_root")]
    pub root: String,

    /// Directory holding one reference compiler project per course
    /// (`<reference_projects_root>/<course>/lib`). Empty disables this source.
    #[serde(default)]
    pub reference_projects_root: String,

    /// Operator-provided dependency directory used when the reference project
    /// has none. Empty disables this source.
    #[serde(default)]
    pub fallback_library_path: String,

    /// Directory of workspace templates (`<templates_dir>/<template_id>`).
    #[serde(default)]
    pub templates_dir: String,

    /// Dependency folder names copied into and recognized in the shared library.
    #[serde(default = "default_dependencies")]
    pub dependencies: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            reference_projects_root: String::new(),
            fallback_library_path: String::new(),
            templates_dir: String::new(),
            dependencies: default_dependencies(),
        }
    }
}

impl WorkspaceConfig {
    #[must_use]
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    /// Reference project library for a course, if a reference root is configured.
    #[must_use]
    pub fn reference_library(&self, course_id: &str) -> Option<PathBuf> {
        non_empty(&self.reference_projects_root)
            .map(|root| PathBuf::from(root).join(course_id).join("lib"))
    }

    #[must_use]
    pub fn fallback_library(&self) -> Option<PathBuf> {
        non_empty(&self.fallback_library_path).map(PathBuf::from)
    }

    #[must_use]
    pub fn template_dir(&self, template_id: &str) -> Option<PathBuf> {
        non_empty(&self.templates_dir).map(|dir| PathBuf::from(dir).join(template_id))
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
