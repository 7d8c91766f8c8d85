//! In-memory table repository for tests and embedding.
//!
//! This adapter provides a pure in-memory implementation of TableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// In-memory repository.
///
/// Snapshots are stored as their encoded bytes, so the same decode path (and
/// the same failure modes) apply as for files on disk.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::adapters::InMemoryRepository;
/// use tictactoe_rl::ports::TableRepository;
/// use tictactoe_rl::q_learning::{QTable, SavedQTable};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let snapshot = SavedQTable::new(&QTable::new(), 0.2);
///
/// repo.save(&snapshot, Path::new("test_table"))?;
/// let loaded = repo.load(Path::new("test_table"))?;
/// assert_eq!(loaded, snapshot);
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    /// Number of snapshots currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored snapshots.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a snapshot exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }

    /// Store raw bytes at `path`, bypassing encoding.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(Self::key(path), bytes);
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, snapshot: &SavedQTable, path: &Path) -> Result<()> {
        let bytes = snapshot.to_bytes()?;
        self.storage().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let key = Self::key(path);
        let storage = self.storage();
        let bytes = storage
            .get(&key)
            .ok_or_else(|| Error::MissingTable { path: key.clone() })?;
        SavedQTable::from_bytes(bytes)
    }
}
