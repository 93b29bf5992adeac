//! # File I/O Module
//!
//! Saves and loads finished design records with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent concurrent edits on shared drives
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Designs are saved as JSON files wrapping the record with a schema
//! version and save timestamp. Lock files append a `.lock` extension
//! and carry metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gate_core::designer::{DesignRequirements, GateDesigner};
//! use gate_core::file_io::{load_design, save_design, FileLock};
//! use gate_core::materials::InfillType;
//! use std::path::Path;
//!
//! let requirements =
//!     DesignRequirements::new(6000.0, 2400.0, 33.5, "A572_50", InfillType::ChainLink);
//! let record = GateDesigner::new().evaluate(requirements)?;
//! let path = Path::new("design.json");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "engineer@yard.example")?;
//! save_design(&record, path)?;
//! drop(lock); // releases lock
//!
//! let saved = load_design(path)?;
//! println!("Saved at {}", saved.saved_at);
//! # Ok::<(), gate_core::errors::DesignError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::designer::DesignRecord;
use crate::errors::{DesignError, DesignResult};

/// Current schema version for saved design files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Locks older than this are treated as abandoned (hours)
const LOCK_STALE_HOURS: i64 = 4;

/// On-disk wrapper around a design record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDesign {
    /// Schema version (for migration compatibility)
    pub version: String,
    /// When the file was written
    pub saved_at: DateTime<Utc>,
    /// The design record itself
    pub record: DesignRecord,
}

/// Lock file metadata stored in .lock sidecars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub locked_by: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(locked_by: impl Into<String>) -> Self {
        LockInfo {
            locked_by: locked_by.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. A .lock sidecar with metadata for user visibility
#[derive(Debug)]
pub struct FileLock {
    /// Path to the design file
    design_path: PathBuf,
    /// Path to the lock sidecar
    lock_path: PathBuf,
    /// The underlying file handle (keeps the OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a design file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the design file
    /// * `locked_by` - Identifier for the user acquiring the lock
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired
    /// * `Err(DesignError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, locked_by: impl Into<String>) -> DesignResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(locked_by);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                // Stale locks may be taken over
                if !is_lock_stale(&existing) {
                    return Err(DesignError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.locked_by, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                DesignError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            DesignError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| {
            DesignError::SerializationError {
                reason: e.to_string(),
            }
        })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            DesignError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            DesignError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            design_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Get the path to the design file
    pub fn design_path(&self) -> &Path {
        &self.design_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Remove the lock sidecar; the OS lock releases with the handle
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Get the lock sidecar path for a design file
fn lock_path_for(design_path: &Path) -> PathBuf {
    let mut lock_path = design_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Get the temporary path used during an atomic save
fn tmp_path_for(design_path: &Path) -> PathBuf {
    let mut tmp_path = design_path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

/// Read lock info from a lock sidecar
fn read_lock_info(lock_path: &Path) -> DesignResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        DesignError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        DesignError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| DesignError::SerializationError {
        reason: e.to_string(),
    })
}

/// Check if a lock is stale (holder gone or too old)
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            // Same machine, check whether the process still exists
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() >= LOCK_STALE_HOURS
}

/// Save a design record to a file with atomic write semantics.
///
/// The save process:
/// 1. Wrap the record with the schema version and a timestamp
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename over the final path (atomic on most filesystems)
///
/// An interrupted save never leaves a corrupt design file behind.
pub fn save_design(record: &DesignRecord, path: &Path) -> DesignResult<()> {
    let saved = SavedDesign {
        version: SCHEMA_VERSION.to_string(),
        saved_at: Utc::now(),
        record: record.clone(),
    };

    let json = serde_json::to_string_pretty(&saved).map_err(|e| DesignError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        DesignError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        DesignError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        DesignError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up the temp file if the rename fails
        let _ = fs::remove_file(&tmp_path);
        DesignError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a saved design from a file.
///
/// # Returns
///
/// * `Ok(SavedDesign)` - Record plus file metadata
/// * `Err(DesignError::VersionMismatch)` - File schema is incompatible
/// * `Err(DesignError::SerializationError)` - Invalid JSON
/// * `Err(DesignError::FileError)` - I/O error
pub fn load_design(path: &Path) -> DesignResult<SavedDesign> {
    let mut file = File::open(path).map_err(|e| {
        DesignError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        DesignError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let saved: SavedDesign =
        serde_json::from_str(&contents).map_err(|e| DesignError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&saved.version)?;

    Ok(saved)
}

/// Load a saved design, also reporting any active lock on it.
///
/// # Returns
///
/// * `Ok((SavedDesign, None))` - Loaded, no lock
/// * `Ok((SavedDesign, Some(LockInfo)))` - Loaded, another user holds the lock
/// * `Err(_)` - Failed to load
pub fn load_design_with_lock_check(path: &Path) -> DesignResult<(SavedDesign, Option<LockInfo>)> {
    let saved = load_design(path)?;
    let lock_info = FileLock::check(path);
    Ok((saved, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> DesignResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(DesignError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(DesignError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions the file may not be newer than the schema
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 {
        if file_parts[1] > current_parts[1] {
            return Err(DesignError::VersionMismatch {
                file_version: file_version.to_string(),
                expected_version: SCHEMA_VERSION.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designer::{DesignRequirements, GateDesigner};
    use crate::materials::InfillType;
    use std::env::temp_dir;

    fn temp_design_path(name: &str) -> PathBuf {
        temp_dir().join(format!("gatecalc_test_{}.json", name))
    }

    fn sample_record() -> DesignRecord {
        let requirements =
            DesignRequirements::new(6_000.0, 2_400.0, 33.5, "A572_50", InfillType::ChainLink);
        GateDesigner::new().evaluate(requirements).unwrap()
    }

    #[test]
    fn test_lock_path_generation() {
        let design_path = Path::new("/path/to/design.json");
        assert_eq!(lock_path_for(design_path), Path::new("/path/to/design.json.lock"));
        assert_eq!(tmp_path_for(design_path), Path::new("/path/to/design.json.tmp"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.locked_by, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_design_path("roundtrip");

        let record = sample_record();
        save_design(&record, &path).unwrap();

        let loaded = load_design(&path).unwrap();
        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.record, record);

        // Calculated floats must survive the parse exactly, not just
        // within tolerance
        assert_eq!(loaded.record.result.wind_load_n, record.result.wind_load_n);
        assert_eq!(
            serde_json::to_string(&loaded.record).unwrap(),
            serde_json::to_string(&record).unwrap()
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_design_path("atomic");
        let tmp_path = tmp_path_for(&path);

        save_design(&sample_record(), &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_design_path("lock_test");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.locked_by, "test@example.com");

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_lock_blocks_second_writer() {
        let path = temp_design_path("second_writer");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "first@example.com").unwrap();
        let err = FileLock::acquire(&path, "second@example.com").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.is_recoverable());

        // Releasing the first lock frees the file
        drop(lock);
        let relock = FileLock::acquire(&path, "second@example.com").unwrap();
        drop(relock);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_stale_lock_is_reclaimed() {
        let path = temp_design_path("stale_lock");
        File::create(&path).unwrap();
        let lock_path = lock_path_for(&path);

        // An abandoned lock from another machine, past the stale
        // threshold
        let stale = LockInfo {
            locked_by: "night-shift@example.com".to_string(),
            machine: "someone-elses-workstation".to_string(),
            pid: 4_000_000,
            locked_at: Utc::now() - chrono::Duration::hours(LOCK_STALE_HOURS + 1),
        };
        fs::write(&lock_path, serde_json::to_string_pretty(&stale).unwrap()).unwrap();

        assert!(FileLock::check(&path).is_none());

        let lock = FileLock::acquire(&path, "day-shift@example.com").unwrap();
        assert_eq!(lock.info.locked_by, "day-shift@example.com");
        drop(lock);

        // A fresh lock from another machine still blocks
        let fresh = LockInfo {
            locked_by: "night-shift@example.com".to_string(),
            machine: "someone-elses-workstation".to_string(),
            pid: 4_000_000,
            locked_at: Utc::now() - chrono::Duration::minutes(30),
        };
        fs::write(&lock_path, serde_json::to_string_pretty(&fresh).unwrap()).unwrap();

        assert!(FileLock::check(&path).is_some());
        let err = FileLock::acquire(&path, "day-shift@example.com").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        let _ = fs::remove_file(&lock_path);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());

        // Different major fails
        assert!(validate_version("1.0.0").is_err());
        // Newer minor (in 0.x) fails
        assert!(validate_version("0.2.0").is_err());
        // Garbage fails
        assert!(validate_version("not-a-version").is_err());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_design_path("version");

        save_design(&sample_record(), &path).unwrap();
        let mut saved = load_design(&path).unwrap();
        saved.version = "1.0.0".to_string();
        let json = serde_json::to_string_pretty(&saved).unwrap();
        fs::write(&path, json).unwrap();

        let err = load_design(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_design_path("lock_check");

        save_design(&sample_record(), &path).unwrap();

        let (saved, lock_info) = load_design_with_lock_check(&path).unwrap();
        assert!(saved.record.is_adequate());
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }
}
