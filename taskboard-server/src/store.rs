//! Storage for the task collection.
//!
//! The whole collection is read and written as one document. [`TaskStore`]
//! is the narrow seam the handlers depend on; [`JsonFileStore`] is the
//! on-disk implementation and [`MemoryStore`] an in-process one for tests
//! and embedding.
//!
//! There is no locking around a load/save pair. Two overlapping updates
//! race and the last writer wins.

use std::future::Future;
use std::path::{Path, PathBuf};

use taskboard_proto::task::TaskBoard;
use tokio::sync::RwLock;

/// Errors raised by a [`TaskStore`].
///
/// `Io` and `Parse` display the underlying error text unchanged, since that
/// text is what callers report back.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing document does not exist.
    #[error("task store {} does not exist", .0.display())]
    Missing(PathBuf),

    /// Reading or writing the document failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The document is not a valid task collection.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

/// Whole-collection storage used by the request handlers.
pub trait TaskStore: Send + Sync {
    /// Reads the full collection.
    ///
    /// Returns [`StoreError::Missing`] when there is no collection at all,
    /// which is distinct from an empty one.
    fn load(&self) -> impl Future<Output = Result<TaskBoard, StoreError>> + Send;

    /// Replaces the full collection.
    fn save(&self, board: &TaskBoard) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A task collection kept in a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`. The file is not touched
    /// until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    async fn load(&self) -> Result<TaskBoard, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    async fn save(&self, board: &TaskBoard) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(board)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!(path = %self.path.display(), tasks = board.tasks.len(), "task store written");
        Ok(())
    }
}

/// In-memory task collection.
///
/// Starts either empty-but-present ([`MemoryStore::new`]) or absent
/// ([`MemoryStore::missing`]), mirroring a file that does or does not exist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    board: RwLock<Option<TaskBoard>>,
}

impl MemoryStore {
    /// Creates a store holding `board`.
    #[must_use]
    pub fn new(board: TaskBoard) -> Self {
        Self {
            board: RwLock::new(Some(board)),
        }
    }

    /// Creates a store with no collection; loads fail with
    /// [`StoreError::Missing`] until something is saved.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    /// Returns a copy of the current collection, if any.
    pub async fn snapshot(&self) -> Option<TaskBoard> {
        self.board.read().await.clone()
    }
}

impl TaskStore for MemoryStore {
    async fn load(&self) -> Result<TaskBoard, StoreError> {
        self.board
            .read()
            .await
            .clone()
            .ok_or_else(|| StoreError::Missing(PathBuf::from("<memory>")))
    }

    async fn save(&self, board: &TaskBoard) -> Result<(), StoreError> {
        *self.board.write().await = Some(board.clone());
        Ok(())
    }
}
