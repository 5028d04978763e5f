// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Durable Session Storage
//!
//! Key-value persistence that survives process restarts, in the shape of
//! browser local storage: string keys, string values.
//!
//! ## Keys
//!
//! ```text
//! access_token   # bearer token
//! role           # "buyer" | "seller"
//! userId         # subject id
//! ```
//!
//! The three keys are written and removed together. Implementations MUST
//! apply `set_many` and `remove_many` atomically so that a reload never
//! observes `access_token` without `role`/`userId`.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

/// Storage key for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the role.
pub const ROLE_KEY: &str = "role";

/// Storage key for the subject id.
pub const USER_ID_KEY: &str = "userId";

/// Every key owned by the session, in write order.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, ROLE_KEY, USER_ID_KEY];

/// Error type for durable storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string key-value store.
pub trait KeyValueStore {
    /// Read one entry.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write all entries in one atomic step.
    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()>;

    /// Remove all keys in one atomic step. Absent keys are ignored.
    fn remove_many(&self, keys: &[&str]) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        (**self).set_many(entries)
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        (**self).remove_many(keys)
    }
}
