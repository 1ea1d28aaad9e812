//! Create and reset student workspaces.

use std::fs;
use std::path::{Component, Path, PathBuf};

use lec_config::WorkspaceConfig;
use lec_core::enums::WorkspaceMode;
use lec_core::keys::{WorkspaceKey, is_safe_segment};
use serde::Serialize;

use crate::error::WorkspaceError;
use crate::guard::resolve_within;
use crate::shared_lib::{copy_missing, ensure_shared_library, present_dependencies, shared_library_path};

pub const MANIFEST_FILE: &str = "foundry.toml";
pub const SOURCE_DIR: &str = "src";
pub const TEST_DIR: &str = "test";

/// Directories wiped by a reset. Everything else (manifest, template
/// scaffolding) survives.
const RESET_DIRS: [&str; 4] = [SOURCE_DIR, TEST_DIR, "out", "cache"];

#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    pub mode: WorkspaceMode,
    pub template_id: Option<String>,
    /// The caller already ran [`ensure_shared_library`] while holding the
    /// course lock; skip the unlocked copy.
    pub library_ready: bool,
}

/// Handle to a materialized workspace directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    key: WorkspaceKey,
    root: PathBuf,
    library: PathBuf,
}

impl Workspace {
    #[must_use]
    pub const fn key(&self) -> &WorkspaceKey {
        &self.key
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn src_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    #[must_use]
    pub fn test_dir(&self) -> PathBuf {
        self.root.join(TEST_DIR)
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    #[must_use]
    pub fn library_path(&self) -> &Path {
        &self.library
    }

    /// Resolve a workspace-relative path, rejecting escapes.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::PathTraversal`.
    pub fn resolve(&self, rel: &str) -> Result<PathBuf, WorkspaceError> {
        resolve_within(&self.root, rel)
    }

    /// Wipe `src/`, `test/` and build output, then recreate the source dirs.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::Io`.
    pub fn reset(&self) -> Result<(), WorkspaceError> {
        for dir in RESET_DIRS {
            let path = self.root.join(dir);
            match fs::remove_dir_all(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(WorkspaceError::io(&path)(e)),
            }
        }
        self.create_source_dirs()?;
        tracing::info!(workspace = %self.key, "workspace reset");
        Ok(())
    }

    fn create_source_dirs(&self) -> Result<(), WorkspaceError> {
        for dir in [self.src_dir(), self.test_dir()] {
            fs::create_dir_all(&dir).map_err(WorkspaceError::io(&dir))?;
        }
        Ok(())
    }
}

/// `<root>/<course>/students/<student>`.
#[must_use]
pub fn workspace_root(config: &WorkspaceConfig, key: &WorkspaceKey) -> PathBuf {
    config
        .root_path()
        .join(&key.course_id)
        .join("students")
        .join(&key.student_id)
}

/// Create (or reuse) the workspace for `key`.
///
/// Bootstraps the course library unless `library_ready` is set, creates
/// `src/` and `test/`, rewrites the project manifest, and copies template
/// scaffolding when requested. Concurrent bootstraps of one course must be
/// serialized by the caller.
/// Calling it again with `WorkspaceMode::Reuse` changes nothing.
///
/// # Errors
///
/// `DependencyBootstrap` if the shared library cannot be populated,
/// `PathTraversal` for an unsafe template id, `Io`/`Manifest` otherwise.
pub fn ensure_workspace(
    config: &WorkspaceConfig,
    key: &WorkspaceKey,
    options: &WorkspaceOptions,
) -> Result<Workspace, WorkspaceError> {
    if !options.library_ready {
        ensure_shared_library(config, &key.course_id)?;
    }

    let workspace = Workspace {
        key: key.clone(),
        root: workspace_root(config, key),
        library: shared_library_path(config, &key.course_id),
    };

    if options.mode == WorkspaceMode::Reset {
        workspace.reset()?;
    } else {
        workspace.create_source_dirs()?;
    }

    write_manifest(config, &workspace)?;

    if let Some(template_id) = options.template_id.as_deref() {
        apply_template(config, &workspace, template_id)?;
    }

    tracing::debug!(workspace = %key, root = %workspace.root.display(), "workspace ready");
    Ok(workspace)
}

#[derive(Serialize)]
struct Manifest {
    profile: Profiles,
}

#[derive(Serialize)]
struct Profiles {
    default: Profile,
}

#[derive(Serialize)]
struct Profile {
    src: &'static str,
    test: &'static str,
    out: &'static str,
    libs: Vec<String>,
    remappings: Vec<String>,
}

fn write_manifest(config: &WorkspaceConfig, workspace: &Workspace) -> Result<(), WorkspaceError> {
    let lib = relative_path(&workspace.root, &workspace.library);
    let remappings = present_dependencies(config, &workspace.library)
        .iter()
        .map(|dep| remapping(dep, &lib))
        .collect();

    let manifest = Manifest {
        profile: Profiles {
            default: Profile {
                src: SOURCE_DIR,
                test: TEST_DIR,
                out: "out",
                libs: vec![lib],
                remappings,
            },
        },
    };
    let rendered = toml::to_string(&manifest)?;

    let path = workspace.manifest_path();
    if fs::read_to_string(&path).is_ok_and(|current| current == rendered) {
        return Ok(());
    }
    fs::write(&path, rendered).map_err(WorkspaceError::io(&path))
}

fn remapping(dep: &str, lib: &str) -> String {
    match dep {
        "forge-std" => format!("forge-std/={lib}/forge-std/src/"),
        "openzeppelin-contracts" => format!("@openzeppelin/={lib}/openzeppelin-contracts/"),
        other => format!("{other}/={lib}/{other}/"),
    }
}

/// Copy template scaffolding that is not already present. `src/` and `test/`
/// belong to storage and are skipped.
fn apply_template(
    config: &WorkspaceConfig,
    workspace: &Workspace,
    template_id: &str,
) -> Result<(), WorkspaceError> {
    if !is_safe_segment(template_id) {
        return Err(WorkspaceError::traversal(template_id));
    }
    let Some(template) = config.template_dir(template_id).filter(|dir| dir.is_dir()) else {
        tracing::debug!(template = template_id, "template not found, skipping");
        return Ok(());
    };

    for entry in fs::read_dir(&template).map_err(WorkspaceError::io(&template))? {
        let entry = entry.map_err(WorkspaceError::io(&template))?;
        let name = entry.file_name();
        if name == SOURCE_DIR || name == TEST_DIR {
            continue;
        }
        copy_missing(&entry.path(), &workspace.root.join(&name))?;
    }
    Ok(())
}

/// Lexical relative path from directory `from` to `to`, `/`-separated.
fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), from.len() - common).collect();
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup() -> (tempfile::TempDir, WorkspaceConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let fallback = tmp.path().join("fallback");
        for dep in ["forge-std", "openzeppelin-contracts"] {
            fs::create_dir_all(fallback.join(dep)).unwrap();
            fs::write(fallback.join(dep).join("README.md"), dep).unwrap();
        }
        let config = WorkspaceConfig {
            root: tmp.path().join("ws").display().to_string(),
            fallback_library_path: fallback.display().to_string(),
            templates_dir: tmp.path().join("templates").display().to_string(),
            ..Default::default()
        };
        (tmp, config)
    }

    fn key() -> WorkspaceKey {
        WorkspaceKey::new("c1", "s1").unwrap()
    }

    #[test]
    fn creates_layout_and_manifest() {
        let (_tmp, config) = setup();
        let ws = ensure_workspace(&config, &key(), &WorkspaceOptions::default()).unwrap();

        assert!(ws.src_dir().is_dir());
        assert!(ws.test_dir().is_dir());
        assert!(ws.library_path().join("forge-std").is_dir());

        let manifest = fs::read_to_string(ws.manifest_path()).unwrap();
        assert!(manifest.contains("[profile.default]"));
        assert!(manifest.contains(r#"libs = ["../../lib"]"#));
        assert!(manifest.contains("forge-std/=../../lib/forge-std/src/"));
        assert!(manifest.contains("@openzeppelin/=../../lib/openzeppelin-contracts/"));
    }

    #[test]
    fn ready_library_is_left_alone() {
        let (_tmp, config) = setup();
        let options = WorkspaceOptions {
            library_ready: true,
            ..WorkspaceOptions::default()
        };
        let ws = ensure_workspace(&config, &key(), &options).unwrap();

        assert!(ws.src_dir().is_dir());
        assert!(!ws.library_path().join("forge-std").exists());
    }

    #[test]
    fn reuse_is_idempotent() {
        let (_tmp, config) = setup();
        let ws = ensure_workspace(&config, &key(), &WorkspaceOptions::default()).unwrap();
        fs::write(ws.src_dir().join("A.sol"), "contract A {}").unwrap();

        ensure_workspace(&config, &key(), &WorkspaceOptions::default()).unwrap();
        assert!(ws.src_dir().join("A.sol").exists());
    }

    #[test]
    fn reset_wipes_managed_dirs() {
        let (_tmp, config) = setup();
        let ws = ensure_workspace(&config, &key(), &WorkspaceOptions::default()).unwrap();
        fs::write(ws.src_dir().join("A.sol"), "contract A {}").unwrap();
        fs::create_dir_all(ws.root().join("out/A.sol")).unwrap();

        let options = WorkspaceOptions {
            mode: WorkspaceMode::Reset,
            ..WorkspaceOptions::default()
        };
        ensure_workspace(&config, &key(), &options).unwrap();
        assert!(!ws.src_dir().join("A.sol").exists());
        assert!(!ws.root().join("out").exists());
        assert!(ws.src_dir().is_dir());
        assert!(ws.manifest_path().is_file());
    }

    #[test]
    fn template_copies_scaffolding_without_overwriting() {
        let (tmp, config) = setup();
        let template = tmp.path().join("templates/basic");
        fs::create_dir_all(template.join("script")).unwrap();
        fs::create_dir_all(template.join("src")).unwrap();
        fs::write(template.join("script/Deploy.s.sol"), "// deploy").unwrap();
        fs::write(template.join("src/Starter.sol"), "contract Starter {}").unwrap();
        fs::write(template.join(MANIFEST_FILE), "# template manifest").unwrap();

        let options = WorkspaceOptions {
            mode: WorkspaceMode::Reuse,
            template_id: Some("basic".into()),
            ..WorkspaceOptions::default()
        };
        let ws = ensure_workspace(&config, &key(), &options).unwrap();

        assert!(ws.root().join("script/Deploy.s.sol").is_file());
        assert!(!ws.src_dir().join("Starter.sol").exists());
        let manifest = fs::read_to_string(ws.manifest_path()).unwrap();
        assert!(manifest.contains("[profile.default]"));
    }

    #[test]
    fn missing_template_is_a_no_op() {
        let (_tmp, config) = setup();
        let options = WorkspaceOptions {
            mode: WorkspaceMode::Reuse,
            template_id: Some("ghost".into()),
            ..WorkspaceOptions::default()
        };
        assert!(ensure_workspace(&config, &key(), &options).is_ok());
    }

    #[test]
    fn relative_paths() {
        assert_eq!(
            relative_path(Path::new("/w/c1/students/s1"), Path::new("/w/c1/lib")),
            "../../lib"
        );
        assert_eq!(relative_path(Path::new("/a"), Path::new("/a")), ".");
        assert_eq!(relative_path(Path::new("/a"), Path::new("/a/b")), "b");
    }
}
