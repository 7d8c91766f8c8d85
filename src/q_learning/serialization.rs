//! Versioned on-disk snapshot of a Q-learning agent's value table

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::q_table::{ActionValues, QTable},
    tictactoe::State,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TableEntry {
    state: State,
    values: ActionValues,
}

/// Whole-table snapshot plus the exploration rate at save time.
///
/// Entries are stored sorted by state so identical tables encode to
/// identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub epsilon: f64,
    entries: Vec<TableEntry>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn new(table: &QTable, epsilon: f64) -> Self {
        let mut entries: Vec<TableEntry> = table
            .iter()
            .map(|(state, values)| TableEntry {
                state: *state,
                values: *values,
            })
            .collect();
        entries.sort_by(|a, b| a.state.cmp(&b.state));

        Self {
            version: Self::VERSION,
            epsilon,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the table.
    ///
    /// # Errors
    ///
    /// Rejects snapshots written by another format version, and entries keyed
    /// by a state that is not canonical or has no empty cell.
    pub fn to_table(&self) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedFormatVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        self.entries
            .iter()
            .map(|entry| {
                let reason = if !entry.state.has_legal_action() {
                    "no empty cell"
                } else if entry.state.canonical() != entry.state {
                    "state is not canonical"
                } else {
                    return Ok((entry.state, entry.values));
                };
                Err(Error::InvalidTableEntry {
                    state: format!("{:?}", entry.state.values()),
                    reason,
                })
            })
            .collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| Error::SerializationContext {
            operation: "serialize value table to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize value table from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}
