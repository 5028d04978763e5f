// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Durable session storage backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `session`: key → value (see [`super::SESSION_KEYS`])

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{KeyValueStore, StorageResult};

/// Session table: storage key → string value.
const SESSION: TableDefinition<&str, &str> = TableDefinition::new("session");

/// Embedded ACID key-value store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SESSION)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION)?;
        match table.get(key)? {
            Some(v) => Ok(Some(v.value().to_string())),
            None => Ok(None),
        }
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION)?;
            for (key, value) in entries {
                table.insert(*key, *value)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION)?;
            for key in keys {
                table.remove(*key)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}
