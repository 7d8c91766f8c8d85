//! MessagePack implementation of the table repository.
//!
//! This adapter implements the TableRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// MessagePack-based table repository.
///
/// Snapshots are first written to a sibling temporary file and then renamed
/// over the target, so a reader never observes a half-written table.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::adapters::MsgPackRepository;
/// use tictactoe_rl::ports::TableRepository;
/// use tictactoe_rl::q_learning::{QTable, SavedQTable};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let snapshot = SavedQTable::new(&QTable::new(), 0.2);
///
/// repo.save(&snapshot, Path::new("qtable.msgpack"))?;
/// let loaded = repo.load(Path::new("qtable.msgpack"))?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

/// Sibling of `path` named after its full file name plus `.tmp`.
fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| Error::Io {
        operation: format!("choose a staging file for {path:?}"),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let mut staged = OsString::from(name);
    staged.push(".tmp");
    Ok(path.with_file_name(staged))
}

fn write_staged(staging: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(staging).map_err(|source| Error::Io {
        operation: format!("create file {staging:?}"),
        source,
    })?;
    file.write_all(bytes).map_err(|source| Error::Io {
        operation: format!("write file {staging:?}"),
        source,
    })?;
    file.sync_all().map_err(|source| Error::Io {
        operation: format!("flush file {staging:?}"),
        source,
    })
}

impl TableRepository for MsgPackRepository {
    fn save(&self, snapshot: &SavedQTable, path: &Path) -> Result<()> {
        let bytes = snapshot.to_bytes()?;
        let staging = staging_path(path)?;

        let staged = write_staged(&staging, &bytes).and_then(|()| {
            fs::rename(&staging, path).map_err(|source| Error::Io {
                operation: format!("move {staging:?} into place at {path:?}"),
                source,
            })
        });
        if staged.is_err() {
            let _ = fs::remove_file(&staging);
        }
        staged
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        SavedQTable::from_bytes(&bytes)
    }
}
