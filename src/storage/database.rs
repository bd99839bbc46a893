// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded social graph database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user id → serialized StoredUser
//! - `user_emails`: lowercase email → user id (one account per email)
//! - `followers`: `(user_id, follower_id)` → edge id
//! - `following`: `(follower_id, user_id)` → edge id (reverse index)
//! - `sequences`: sequence name → last issued value
//!
//! In `followers`, `follower_id` is the user doing the following and
//! `user_id` the user being followed. Both edge tables are always written in
//! the same write transaction.

use std::path::Path;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Unique index: normalized email → user id.
pub(crate) const USER_EMAILS: TableDefinition<&str, u64> = TableDefinition::new("user_emails");

/// Edges keyed by the followed user: `(user_id, follower_id)` → edge id.
pub(crate) const FOLLOWERS: TableDefinition<(u64, u64), u64> = TableDefinition::new("followers");

/// Edges keyed by the follower: `(follower_id, user_id)` → edge id.
pub(crate) const FOLLOWING: TableDefinition<(u64, u64), u64> = TableDefinition::new("following");

/// Monotonic id sequences.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub(crate) const USER_ID_SEQUENCE: &str = "user_id";
pub(crate) const EDGE_ID_SEQUENCE: &str = "follow_edge_id";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
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

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// SocialDatabase
// =============================================================================

/// Embedded ACID database holding accounts and the follow graph.
///
/// redb serializes write transactions, so every read-check-write sequence
/// performed inside one [`WriteTransaction`] is atomic with respect to
/// concurrent requests.
pub struct SocialDatabase {
    db: Database,
}

impl SocialDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(FOLLOWERS)?;
            let _ = write_txn.open_table(FOLLOWING)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Social database opened");
        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Cheap liveness probe: opens a read transaction and the users table.
    pub fn ping(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }
}

/// Advance the named sequence and return the new value (first value is 1).
///
/// Must be called inside the write transaction that consumes the id.
pub(crate) fn next_sequence(write_txn: &WriteTransaction, name: &str) -> StorageResult<u64> {
    let mut table = write_txn.open_table(SEQUENCES)?;
    let current = table.get(name)?.map(|v| v.value()).unwrap_or(0);
    let next = current + 1;
    table.insert(name, next)?;
    Ok(next)
}

#[cfg(test)]
pub(crate) fn temp_db() -> (SocialDatabase, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = SocialDatabase::open(&dir.path().join("test.redb")).unwrap();
    (db, dir)
}
