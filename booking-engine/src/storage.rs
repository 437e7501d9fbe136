//! redb-based persistence shim
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `current_draft` | `"current"` | `Draft` | Draft of the live session (reload-survival) |
//! | `draft_history` | `draft_id` | `Draft` | Every draft that reached the customer |
//! | `sms_log` | `u64` sequence | `SmsRecord` | Outbound message history |
//!
//! Values are JSON-serialized. The in-memory session is authoritative; this
//! store only lets a reloaded session pick up where it left off.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{Draft, DraftStatus};
use shared::sms::SmsRecord;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Current draft: key = CURRENT_KEY, value = JSON-serialized Draft
const CURRENT_DRAFT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("current_draft");

/// Draft history: key = draft id, value = JSON-serialized Draft
const DRAFT_HISTORY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("draft_history");

/// SMS history: key = sequence, value = JSON-serialized SmsRecord
const SMS_LOG_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("sms_log");

const CURRENT_KEY: &str = "current";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Draft storage backed by redb
#[derive(Clone)]
pub struct DraftStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for DraftStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStorage").finish_non_exhaustive()
    }
}

impl DraftStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Database::create(path)?)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CURRENT_DRAFT_TABLE)?;
            let _ = write_txn.open_table(DRAFT_HISTORY_TABLE)?;
            let _ = write_txn.open_table(SMS_LOG_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Current Draft ==========

    /// Store the session's draft and upsert it into the history, atomically
    pub fn save_current(&self, draft: &Draft) -> StorageResult<()> {
        let value = serde_json::to_vec(draft)?;
        let txn = self.db.begin_write()?;
        {
            let mut current = txn.open_table(CURRENT_DRAFT_TABLE)?;
            current.insert(CURRENT_KEY, value.as_slice())?;
            let mut history = txn.open_table(DRAFT_HISTORY_TABLE)?;
            history.insert(draft.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn load_current(&self) -> StorageResult<Option<Draft>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CURRENT_DRAFT_TABLE)?;
        match table.get(CURRENT_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Forget the session's draft (history is kept)
    pub fn clear_current(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CURRENT_DRAFT_TABLE)?;
            table.remove(CURRENT_KEY)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== History ==========

    pub fn get_draft(&self, draft_id: &str) -> StorageResult<Option<Draft>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRAFT_HISTORY_TABLE)?;
        match table.get(draft_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All drafts, oldest first
    pub fn list_history(&self) -> StorageResult<Vec<Draft>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRAFT_HISTORY_TABLE)?;

        let mut drafts = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let draft: Draft = serde_json::from_slice(value.value())?;
            drafts.push(draft);
        }

        drafts.sort_by_key(|d| d.created_at);
        Ok(drafts)
    }

    /// Cancel a confirmed draft after the fact.
    ///
    /// Rewrites the history entry, and the current draft when it is the same
    /// one, in a single transaction. Returns `false` when no confirmed draft
    /// has this id.
    pub fn cancel_confirmed(&self, draft_id: &str, now: i64) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let cancelled = {
            let mut history = txn.open_table(DRAFT_HISTORY_TABLE)?;
            let existing: Option<Draft> = match history.get(draft_id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            match existing.filter(|d| d.status == DraftStatus::Confirmed) {
                Some(mut draft) => {
                    draft.status = DraftStatus::Cancelled;
                    draft.cancelled_at = Some(now);
                    draft.updated_at = now;
                    let value = serde_json::to_vec(&draft)?;
                    history.insert(draft_id, value.as_slice())?;

                    let mut current = txn.open_table(CURRENT_DRAFT_TABLE)?;
                    let is_current = match current.get(CURRENT_KEY)? {
                        Some(saved) => serde_json::from_slice::<Draft>(saved.value())?.id == draft_id,
                        None => false,
                    };
                    if is_current {
                        current.insert(CURRENT_KEY, value.as_slice())?;
                    }
                    true
                }
                None => false,
            }
        };
        txn.commit()?;
        Ok(cancelled)
    }

    /// Confirmed drafts whose confirmation window has not yet passed
    pub fn active_confirmed(&self, now: i64) -> StorageResult<Vec<Draft>> {
        Ok(self
            .list_history()?
            .into_iter()
            .filter(|d| d.status == DraftStatus::Confirmed && d.expires_at.is_some_and(|at| at > now))
            .collect())
    }

    // ========== SMS Log ==========

    /// Append a message to the SMS history, returning its sequence number
    pub fn append_sms(&self, record: &SmsRecord) -> StorageResult<u64> {
        let value = serde_json::to_vec(record)?;
        let txn = self.db.begin_write()?;
        let seq = {
            let mut table = txn.open_table(SMS_LOG_TABLE)?;
            let next = table.last()?.map(|(k, _)| k.value() + 1).unwrap_or(1);
            table.insert(next, value.as_slice())?;
            next
        };
        txn.commit()?;
        Ok(seq)
    }

    /// SMS history, oldest first
    pub fn sms_history(&self) -> StorageResult<Vec<SmsRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SMS_LOG_TABLE)?;

        let mut records = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }
}
