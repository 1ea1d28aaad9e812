//! Single-flight locking.
//!
//! Every request that touches a workspace holds its lock for the whole
//! request, so hide, write, and restore never interleave on one tree.
//! Library bootstrap holds a per-course lock.
//!
//! Two layers: an async mutex per key for tasks inside this process, and a
//! pid lock file next to the workspace for separate `lct` processes.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use lec_config::WorkspaceConfig;
use lec_core::keys::WorkspaceKey;
use lec_workspace::workspace_root;
use tokio::sync::OwnedMutexGuard;

use crate::error::RunnerError;

const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Workspace(WorkspaceKey),
    Course(String),
}

type SlotMap = Mutex<HashMap<Slot, Arc<tokio::sync::Mutex<()>>>>;

/// Held lock. Released on drop; the slot is forgotten once nobody else is
/// waiting on it.
#[derive(Debug)]
pub struct LockGuard {
    file: Option<LockFile>,
    held: Option<OwnedMutexGuard<()>>,
    slot: Slot,
    slots: Arc<SlotMap>,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.file.take();
        self.held.take();

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only made under this map lock, so a count of one means
        // no task holds or waits on the mutex.
        if slots
            .get(&self.slot)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            slots.remove(&self.slot);
        }
    }
}

#[derive(Debug, Default)]
pub struct WorkspaceLocks {
    slots: Arc<SlotMap>,
}

impl WorkspaceLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock one student's workspace.
    ///
    /// # Errors
    ///
    /// `Busy` or `LockUnavailable` when another process holds the lock file
    /// past the wait limit.
    pub async fn workspace(
        &self,
        config: &WorkspaceConfig,
        key: &WorkspaceKey,
    ) -> Result<LockGuard, RunnerError> {
        let path = workspace_root(config, key).with_extension("lock");
        self.acquire(Slot::Workspace(key.clone()), path).await
    }

    /// Lock a course's shared library.
    ///
    /// # Errors
    ///
    /// See [`Self::workspace`].
    pub async fn course(
        &self,
        config: &WorkspaceConfig,
        course_id: &str,
    ) -> Result<LockGuard, RunnerError> {
        let path = config.root_path().join(course_id).join(".bootstrap.lock");
        self.acquire(Slot::Course(course_id.to_string()), path).await
    }

    async fn acquire(&self, slot: Slot, path: PathBuf) -> Result<LockGuard, RunnerError> {
        let mutex = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(slot.clone()).or_default())
        };
        let mut guard = LockGuard {
            file: None,
            held: Some(mutex.lock_owned().await),
            slot,
            slots: Arc::clone(&self.slots),
        };
        // Dropping `guard` on error releases and prunes the slot.
        guard.file = Some(LockFile::acquire(path, LOCK_WAIT_TIMEOUT).await?);
        Ok(guard)
    }

    /// Number of workspaces and courses currently locked or waited on.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Pid file created with `create_new`; removed on drop.
#[derive(Debug)]
struct LockFile {
    path: PathBuf,
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[derive(Debug)]
enum LockState {
    HeldBy(i32),
    Stale,
    Unknown,
}

impl LockFile {
    async fn acquire(path: PathBuf, wait: Duration) -> Result<Self, RunnerError> {
        let started = Instant::now();
        loop {
            match try_acquire(&path).await {
                Ok(()) => return Ok(Self { path }),
                Err(LockState::Stale) => {
                    tracing::debug!(lock = %path.display(), "removing stale lock");
                    let _ = std::fs::remove_file(&path);
                }
                Err(LockState::HeldBy(holder)) => {
                    if started.elapsed() >= wait {
                        return Err(RunnerError::Busy { path, holder });
                    }
                    tokio::time::sleep(LOCK_RETRY_DELAY).await;
                }
                Err(LockState::Unknown) => {
                    if started.elapsed() >= wait {
                        return Err(RunnerError::LockUnavailable { path });
                    }
                    tokio::time::sleep(LOCK_RETRY_DELAY).await;
                }
            }
        }
    }
}

async fn try_acquire(path: &Path) -> Result<(), LockState> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create_new(true).write(true).open(path) {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut contents = String::new();
            if OpenOptions::new()
                .read(true)
                .open(path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .is_err()
            {
                return Err(LockState::Unknown);
            }
            match contents.trim().parse::<i32>().ok() {
                Some(pid) if is_process_running(pid).await => Err(LockState::HeldBy(pid)),
                Some(_) => Err(LockState::Stale),
                // Written but not yet flushed by its owner.
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

async fn is_process_running(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    tokio::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .is_ok_and(|status| status.success())
}
