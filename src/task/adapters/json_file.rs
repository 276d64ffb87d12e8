//! File-backed task store holding the snapshot as a JSON array.
//!
//! The file layout matches the browser client's storage entry, so a list
//! exported from the browser can be used directly. Access is scoped to a
//! single directory through a `cap-std` capability.

use crate::task::{
    domain::{SnapshotRevision, Task, TaskSnapshot},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default file name inside the store directory.
pub const DEFAULT_TASKS_FILE: &str = "dailyflow-tasks.json";

/// Task store persisted as one JSON file.
///
/// The revision of a snapshot is a fingerprint of the file bytes, so edits
/// made outside this process are detected as conflicts as well. File access
/// runs on the blocking thread pool.
pub struct JsonFileTaskStore {
    file: Arc<TaskFile>,
    write_guard: Mutex<()>,
}

/// Directory capability and file name shared with blocking tasks.
struct TaskFile {
    dir: Dir,
    file_name: String,
}

impl std::fmt::Debug for JsonFileTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileTaskStore")
            .field("file_name", &self.file.file_name)
            .finish_non_exhaustive()
    }
}

impl JsonFileTaskStore {
    /// Opens a store for `file_name` inside `dir_path`, creating the
    /// directory when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(dir_path: &Utf8Path, file_name: impl Into<String>) -> TaskStoreResult<Self> {
        std::fs::create_dir_all(dir_path).map_err(TaskStoreError::persistence)?;
        let dir =
            Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(TaskStoreError::persistence)?;
        Ok(Self {
            file: Arc::new(TaskFile {
                dir,
                file_name: file_name.into(),
            }),
            write_guard: Mutex::new(()),
        })
    }

    /// Opens a store from a full file path.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the path has no file name
    /// or its directory cannot be opened.
    pub fn open_path(path: &Utf8Path) -> TaskStoreResult<Self> {
        let file_name = path.file_name().ok_or_else(|| {
            TaskStoreError::persistence(std::io::Error::other("path must include a file name"))
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
            _ => Utf8PathBuf::from("."),
        };
        Self::open(&parent, file_name)
    }

    /// Runs a blocking file operation on the blocking thread pool.
    async fn run_blocking<F, T>(&self, operation: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&TaskFile) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || operation(&file))
            .await
            .map_err(TaskStoreError::persistence)?
    }
}

impl TaskFile {
    fn read_raw(&self) -> TaskStoreResult<Option<Vec<u8>>> {
        match self.dir.read(&self.file_name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(TaskStoreError::persistence(err)),
        }
    }

    fn read_snapshot(&self) -> TaskStoreResult<TaskSnapshot> {
        let Some(bytes) = self.read_raw()? else {
            return Ok(TaskSnapshot::new(SnapshotRevision::INITIAL, Vec::new()));
        };
        let revision = fingerprint(&bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(TaskSnapshot::new(revision, Vec::new()));
        }
        let tasks: Vec<Task> =
            serde_json::from_slice(&bytes).map_err(TaskStoreError::persistence)?;
        Ok(TaskSnapshot::new(revision, tasks))
    }

    fn replace(
        &self,
        expected: SnapshotRevision,
        encoded: &[u8],
    ) -> TaskStoreResult<SnapshotRevision> {
        let actual = self
            .read_raw()?
            .map_or(SnapshotRevision::INITIAL, |bytes| fingerprint(&bytes));
        if actual != expected {
            return Err(TaskStoreError::RevisionConflict { expected, actual });
        }

        let staging = format!("{}.tmp", self.file_name);
        self.dir
            .write(&staging, encoded)
            .map_err(TaskStoreError::persistence)?;
        self.dir
            .rename(&staging, &self.dir, &self.file_name)
            .map_err(TaskStoreError::persistence)?;
        Ok(fingerprint(encoded))
    }
}

/// Folds the leading SHA-256 bytes of the file contents into a revision.
fn fingerprint(bytes: &[u8]) -> SnapshotRevision {
    let digest = Sha256::digest(bytes);
    let value = digest
        .iter()
        .take(8)
        .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
    SnapshotRevision::new(value)
}

#[async_trait]
impl TaskStore for JsonFileTaskStore {
    async fn load(&self) -> TaskStoreResult<TaskSnapshot> {
        self.run_blocking(TaskFile::read_snapshot).await
    }

    async fn save(
        &self,
        expected: SnapshotRevision,
        tasks: Vec<Task>,
    ) -> TaskStoreResult<SnapshotRevision> {
        let encoded = serde_json::to_vec_pretty(&tasks).map_err(TaskStoreError::persistence)?;
        let _guard = self.write_guard.lock().await;
        let written = self
            .run_blocking(move |file| file.replace(expected, &encoded))
            .await?;
        tracing::debug!(
            file = %self.file.file_name,
            tasks = tasks.len(),
            revision = %written,
            "task snapshot written"
        );
        Ok(written)
    }
}
