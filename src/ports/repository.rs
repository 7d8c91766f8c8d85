//! Repository port for value-table persistence.
//!
//! This module defines the trait boundary between the learning agent and the
//! storage used for its value table.

use std::path::Path;

use crate::{Result, q_learning::SavedQTable};

/// Port for persisting and loading value-table snapshots.
///
/// This trait abstracts the storage mechanism, allowing different
/// implementations (MessagePack files, memory, ...) without coupling the
/// agent to a specific serialization format.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::ports::TableRepository;
/// use tictactoe_rl::q_learning::{QTable, SavedQTable};
/// use std::path::Path;
///
/// fn save_empty<R: TableRepository>(repo: &R, path: &Path) -> tictactoe_rl::Result<()> {
///     repo.save(&SavedQTable::new(&QTable::new(), 0.2), path)
/// }
/// ```
pub trait TableRepository {
    /// Save a complete snapshot, replacing whatever was stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The location cannot be created or written to
    /// - Serialization fails
    fn save(&self, snapshot: &SavedQTable, path: &Path) -> Result<()>;

    /// Load the snapshot stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is stored at `path` or it cannot be read
    /// - The stored bytes are corrupted or of another format version
    fn load(&self, path: &Path) -> Result<SavedQTable>;
}
