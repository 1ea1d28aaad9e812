//! Per-course shared dependency folder.
//!
//! Dependencies are copied once into `<root>/<course>/lib` and referenced by
//! every student workspace of that course. Existing folders are never
//! overwritten.
//!
//! Each dependency is copied into `lib/.<dep>.partial` and renamed into
//! place only once the whole tree is there, so a failed copy never leaves a
//! folder that counts as present.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use lec_config::WorkspaceConfig;
use lec_core::keys::is_safe_segment;

use crate::error::WorkspaceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// At least one recognized dependency was already in place.
    AlreadyPresent,
    /// Dependencies were copied from `source`.
    Copied {
        source: PathBuf,
        dependencies: Vec<String>,
    },
}

/// `<root>/<course>/lib`.
#[must_use]
pub fn shared_library_path(config: &WorkspaceConfig, course_id: &str) -> PathBuf {
    config.root_path().join(course_id).join("lib")
}

/// Make sure the course's shared library holds the recognized dependencies.
///
/// Sources are tried in order: the course's reference project `lib/`, then
/// the configured fallback library. The first source that yields at least
/// one recognized dependency is used.
///
/// # Errors
///
/// `PathTraversal` for an unsafe course id, `DependencyBootstrap` when no
/// source provides anything, `Io` on copy failures.
pub fn ensure_shared_library(
    config: &WorkspaceConfig,
    course_id: &str,
) -> Result<BootstrapOutcome, WorkspaceError> {
    if !is_safe_segment(course_id) {
        return Err(WorkspaceError::traversal(course_id));
    }

    let lib = shared_library_path(config, course_id);
    if !present_dependencies(config, &lib).is_empty() {
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let sources: Vec<PathBuf> = config
        .reference_library(course_id)
        .into_iter()
        .chain(config.fallback_library())
        .collect();

    for source in &sources {
        let available = present_dependencies(config, source);
        if available.is_empty() {
            tracing::debug!(source = %source.display(), "no dependencies at source");
            continue;
        }

        install_all(source, &lib, &available)?;
        tracing::info!(
            course = course_id,
            source = %source.display(),
            dependencies = ?available,
            "bootstrapped shared library"
        );
        return Ok(BootstrapOutcome::Copied {
            source: source.clone(),
            dependencies: available,
        });
    }

    let tried = if sources.is_empty() {
        "no reference project or fallback library configured".to_string()
    } else {
        format!(
            "none of {} provides {}",
            sources
                .iter()
                .map(|s| s.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            config.dependencies.join(", ")
        )
    };
    Err(WorkspaceError::DependencyBootstrap {
        course_id: course_id.to_string(),
        reason: tried,
    })
}

/// Recognized dependency names present as non-empty directories under `dir`.
pub(crate) fn present_dependencies(config: &WorkspaceConfig, dir: &Path) -> Vec<String> {
    config
        .dependencies
        .iter()
        .filter(|dep| is_non_empty_dir(&dir.join(dep)))
        .cloned()
        .collect()
}

fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some())
}

/// Install every dependency in `deps` from `source` into `lib`. On failure
/// the dependencies installed by this call are removed again.
fn install_all(source: &Path, lib: &Path, deps: &[String]) -> Result<(), WorkspaceError> {
    fs::create_dir_all(lib).map_err(WorkspaceError::io(lib))?;

    let mut installed = Vec::with_capacity(deps.len());
    for dep in deps {
        if let Err(err) = install_dependency(&source.join(dep), lib, dep) {
            for done in &installed {
                remove_tree(&lib.join(done));
            }
            return Err(err);
        }
        installed.push(dep);
    }
    Ok(())
}

fn install_dependency(src: &Path, lib: &Path, dep: &str) -> Result<(), WorkspaceError> {
    let staging = lib.join(format!(".{dep}.partial"));
    let dest = lib.join(dep);

    // Leftover from a run that died mid-copy.
    remove_tree(&staging);

    if let Err(err) = copy_missing(src, &staging) {
        remove_tree(&staging);
        return Err(err);
    }

    // An empty folder does not count as present; make room for the rename.
    let _ = fs::remove_dir(&dest);
    fs::rename(&staging, &dest).map_err(|source| {
        remove_tree(&staging);
        WorkspaceError::Io {
            path: dest.clone(),
            source,
        }
    })
}

fn remove_tree(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => tracing::warn!(path = %path.display(), %err, "failed to remove partial copy"),
    }
}

/// Copy `src` (a file or a tree) into `dest`, skipping anything already at
/// the destination. Symlinks are recreated as links, never followed.
pub(crate) fn copy_missing(src: &Path, dest: &Path) -> Result<(), WorkspaceError> {
    let walker = WalkBuilder::new(src)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .build();

    for entry in walker {
        let entry = entry?;
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        let rel = entry.path().strip_prefix(src).unwrap_or(Path::new(""));
        let target = if rel.as_os_str().is_empty() {
            dest.to_path_buf()
        } else {
            dest.join(rel)
        };

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(WorkspaceError::io(&target))?;
        } else if target.symlink_metadata().is_ok() {
            continue;
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(WorkspaceError::io(entry.path()))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_link(src: &Path, dest: &Path) -> Result<(), WorkspaceError> {
    let link = fs::read_link(src).map_err(WorkspaceError::io(src))?;
    std::os::unix::fs::symlink(&link, dest).map_err(WorkspaceError::io(dest))
}

#[cfg(not(unix))]
fn copy_link(src: &Path, _dest: &Path) -> Result<(), WorkspaceError> {
    tracing::warn!(path = %src.display(), "skipping symlink");
    Ok(())
}
