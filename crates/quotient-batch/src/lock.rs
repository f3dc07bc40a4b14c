//! Run exclusivity lock.
//!
//! One lock file per run key prevents two batch runs from submitting the
//! same request set concurrently. The file records the owner PID; a lock
//! whose owner is no longer alive is stale and gets reclaimed. There is no
//! Drop cleanup: a killed process leaves its lock behind, and the next
//! invocation detects it through the liveness probe rather than through
//! cleanup handlers that never ran.

use quotient_core::RunKey;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from lock acquisition and release.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another live run holds the lock
    #[error("batch {key} is already running (pid {pid})")]
    Held {
        /// Run key the lock belongs to
        key: String,
        /// PID recorded in the lock file
        pid: u32,
    },

    /// Filesystem failure while working with the lock file
    #[error("lock I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Checks whether a recorded lock owner is still running.
///
/// Injected so stale-lock handling is testable without spawning processes.
pub trait ProcessProbe: Send + Sync {
    /// Whether a process with this PID exists.
    fn is_alive(&self, pid: u32) -> bool;
}

/// Probe backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl ProcessProbe for SystemProbe {
    #[cfg(target_os = "linux")]
    fn is_alive(&self, pid: u32) -> bool {
        Path::new(&format!("/proc/{pid}")).exists()
    }

    #[cfg(all(unix, not(target_os = "linux")))]
    fn is_alive(&self, pid: u32) -> bool {
        std::process::Command::new("kill")
            .args(["-0", &pid.to_string()])
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    // No liveness signal on this platform; treat the owner as alive
    #[cfg(not(unix))]
    fn is_alive(&self, _pid: u32) -> bool {
        true
    }
}

/// Exclusivity token for one batch run.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock for a run key.
    ///
    /// Creation is atomic (`create_new`), so two processes racing for the
    /// same key cannot both win. An existing lock with a live owner fails
    /// with [`LockError::Held`]; a stale one is reclaimed and logged.
    pub fn acquire(
        dir: &Path,
        key: &RunKey,
        probe: &dyn ProcessProbe,
    ) -> Result<Self, LockError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{key}.lock"));

        match Self::try_create(&path) {
            Ok(()) => {
                tracing::debug!(key = %key, path = %path.display(), "run lock acquired");
                Ok(Self { path })
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let owner = Self::read_owner(&path);

                if let Some(pid) = owner {
                    if probe.is_alive(pid) {
                        return Err(LockError::Held {
                            key: key.to_string(),
                            pid,
                        });
                    }
                }

                tracing::warn!(
                    key = %key,
                    stale_pid = owner,
                    "reclaiming stale run lock, previous owner is gone"
                );
                match fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }

                // A concurrent run may have re-created the lock between the
                // remove and this create; that run wins.
                match Self::try_create(&path) {
                    Ok(()) => Ok(Self { path }),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        let pid = Self::read_owner(&path).unwrap_or(0);
                        Err(LockError::Held {
                            key: key.to_string(),
                            pid,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock by deleting its file.
    pub fn release(self) -> io::Result<()> {
        tracing::debug!(path = %self.path.display(), "releasing run lock");
        fs::remove_file(&self.path)
    }

    fn try_create(path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        writeln!(file, "{}", std::process::id())?;
        writeln!(file, "started {}", chrono::Utc::now().to_rfc3339())?;
        Ok(())
    }

    /// PID on the first line of the lock file, if readable.
    fn read_owner(path: &Path) -> Option<u32> {
        fs::read_to_string(path)
            .ok()?
            .lines()
            .next()?
            .trim()
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProbe {
        alive: bool,
    }

    impl ProcessProbe for FakeProbe {
        fn is_alive(&self, _pid: u32) -> bool {
            self.alive
        }
    }

    fn key() -> RunKey {
        RunKey::new("1008627").expect("valid key")
    }

    #[test]
    fn test_acquire_and_release() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let lock = RunLock::acquire(dir.path(), &key(), &SystemProbe).expect("acquire");
        assert!(lock.path().exists());
        let path = lock.path().to_path_buf();
        lock.release().expect("release");
        assert!(!path.exists());
    }

    #[test]
    fn test_live_owner_blocks_second_acquire() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let _lock = RunLock::acquire(dir.path(), &key(), &SystemProbe).expect("acquire");

        // This process is the recorded owner and is definitely alive
        let err = RunLock::acquire(dir.path(), &key(), &SystemProbe).unwrap_err();
        match err {
            LockError::Held { key, pid } => {
                assert_eq!(key, "1008627");
                assert_eq!(pid, std::process::id());
            }
            LockError::Io(e) => panic!("expected Held, got {e}"),
        }
    }

    #[test]
    fn test_stale_lock_is_reclaimed() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("1008627.lock");
        fs::write(&path, "99999999\nstarted 2026-01-01T00:00:00Z\n").expect("write lock");

        let probe = FakeProbe { alive: false };
        let lock = RunLock::acquire(dir.path(), &key(), &probe).expect("reclaim");

        // The reclaimed lock now records this process
        let owner = RunLock::read_owner(lock.path()).expect("owner");
        assert_eq!(owner, std::process::id());
    }

    #[test]
    fn test_live_foreign_owner_blocks() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("1008627.lock");
        fs::write(&path, "4242\n").expect("write lock");

        let probe = FakeProbe { alive: true };
        let err = RunLock::acquire(dir.path(), &key(), &probe).unwrap_err();
        assert!(matches!(err, LockError::Held { pid: 4242, .. }));
    }

    #[test]
    fn test_unreadable_lock_is_reclaimed() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("1008627.lock");
        fs::write(&path, "not a pid\n").expect("write lock");

        // Owner can't be verified, so the lock is treated as stale
        let probe = FakeProbe { alive: true };
        assert!(RunLock::acquire(dir.path(), &key(), &probe).is_ok());
    }

    #[test]
    fn test_different_keys_do_not_contend() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let _first = RunLock::acquire(dir.path(), &key(), &SystemProbe).expect("acquire");
        let other = RunKey::new("1008628").expect("valid key");
        assert!(RunLock::acquire(dir.path(), &other, &SystemProbe).is_ok());
    }
}
