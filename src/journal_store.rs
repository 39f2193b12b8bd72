//! Pluggable persistence for tasting-journal entries.
//!
//! Three backends are provided:
//!
//! - [`MemoryJournalStore`]: entries live for the session only.
//! - [`DiscardJournalStore`]: new entries are logged and dropped; only the
//!   seed entries are ever listed. This is how the journal screen behaved
//!   before it had storage.
//! - [`LmdbJournalStore`]: entries are written to an LMDB environment on disk
//!   and survive restarts.

use std::path::{Path, PathBuf};

use lmdb::{Cursor, Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::wine_model::JournalEntry;

const JOURNAL_DB: &str = "journal";
const MAP_SIZE: usize = 10 * 1024 * 1024;

pub trait JournalStore {
    /// Inserts or replaces the entry with `entry.id`.
    fn save(&mut self, entry: JournalEntry) -> Result<JournalEntry, AppResponse>;

    /// Returns `false` when no entry had that id.
    fn delete(&mut self, id: &str) -> Result<bool, AppResponse>;

    /// All entries, oldest id first.
    fn list(&self) -> Result<Vec<JournalEntry>, AppResponse>;

    fn clear(&mut self) -> Result<(), AppResponse>;

    /// Replaces every stored entry with `entries` as a single step.
    fn reseed(&mut self, entries: Vec<JournalEntry>) -> Result<(), AppResponse>;

    /// One past the highest numeric id currently stored.
    fn next_id(&self) -> Result<String, AppResponse> {
        let highest = self
            .list()?
            .iter()
            .filter_map(|entry| entry.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok((highest + 1).to_string())
    }
}

/// The three entries shown on a fresh journal screen.
pub fn sample_journal_entries() -> Vec<JournalEntry> {
    vec![
        JournalEntry {
            id: "1".to_string(),
            wine_id: "3".to_string(),
            date: "2023-05-15".to_string(),
            rating: 4.5,
            notes: "Excellent structure with rich tannins. Paired well with khachapuri.".to_string(),
            occasion: "Dinner with friends".to_string(),
            location: "Home".to_string(),
        },
        JournalEntry {
            id: "2".to_string(),
            wine_id: "7".to_string(),
            date: "2023-06-02".to_string(),
            rating: 3.8,
            notes: "Pleasant aroma, slightly bitter finish. Would try again.".to_string(),
            occasion: "Weekend tasting".to_string(),
            location: "Tbilisi Wine Bar".to_string(),
        },
        JournalEntry {
            id: "3".to_string(),
            wine_id: "12".to_string(),
            date: "2023-06-20".to_string(),
            rating: 5.0,
            notes: "Absolutely stunning complexity. One of the best Georgian wines I've tried.".to_string(),
            occasion: "Anniversary".to_string(),
            location: "Kakheti vineyard tour".to_string(),
        },
    ]
}

fn sort_by_id(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| match (a.id.parse::<u64>(), b.id.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.id.cmp(&b.id),
    });
}

#[derive(Debug, Default)]
pub struct MemoryJournalStore {
    entries: Vec<JournalEntry>,
}

impl MemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<JournalEntry>) -> Self {
        MemoryJournalStore { entries }
    }
}

impl JournalStore for MemoryJournalStore {
    fn save(&mut self, entry: JournalEntry) -> Result<JournalEntry, AppResponse> {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => self.entries.push(entry.clone()),
        }
        Ok(entry)
    }

    fn delete(&mut self, id: &str) -> Result<bool, AppResponse> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        Ok(self.entries.len() != before)
    }

    fn list(&self) -> Result<Vec<JournalEntry>, AppResponse> {
        let mut entries = self.entries.clone();
        sort_by_id(&mut entries);
        Ok(entries)
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        self.entries.clear();
        Ok(())
    }

    fn reseed(&mut self, entries: Vec<JournalEntry>) -> Result<(), AppResponse> {
        self.entries = entries;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DiscardJournalStore {
    seeded: MemoryJournalStore,
}

impl DiscardJournalStore {
    pub fn new(seed: Vec<JournalEntry>) -> Self {
        DiscardJournalStore { seeded: MemoryJournalStore::with_entries(seed) }
    }
}

impl JournalStore for DiscardJournalStore {
    fn save(&mut self, entry: JournalEntry) -> Result<JournalEntry, AppResponse> {
        info!("Discarding journal entry for wine {} dated {}", entry.wine_id, entry.date);
        Ok(entry)
    }

    fn delete(&mut self, id: &str) -> Result<bool, AppResponse> {
        self.seeded.delete(id)
    }

    fn list(&self) -> Result<Vec<JournalEntry>, AppResponse> {
        self.seeded.list()
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        self.seeded.clear()
    }

    /// The only way entries reach a discard store after construction.
    fn reseed(&mut self, entries: Vec<JournalEntry>) -> Result<(), AppResponse> {
        self.seeded.reseed(entries)
    }
}

/// Journal entries stored as JSON values keyed by entry id in an LMDB
/// environment at `<name>.lmdb`.
pub struct LmdbJournalStore {
    env: Option<Environment>,
    db: Database,
    path: PathBuf,
}

impl LmdbJournalStore {
    pub fn open(name: &str) -> Result<Self, AppResponse> {
        let path = PathBuf::from(format!("{name}.lmdb"));

        std::fs::create_dir_all(&path).map_err(|e| {
            AppResponse::DatabaseError(format!("Cannot create journal directory {}: {e}", path.display()))
        })?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(MAP_SIZE)
            .open(&path)?;
        let db = env.create_db(Some(JOURNAL_DB), DatabaseFlags::empty())?;

        info!("Journal store opened at {}", path.display());
        Ok(LmdbJournalStore { env: Some(env), db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drops the environment. Every later call fails with `DatabaseError`.
    pub fn close(&mut self) {
        if self.env.take().is_some() {
            info!("Journal store at {} closed", self.path.display());
        }
    }

    fn env(&self) -> Result<&Environment, AppResponse> {
        self.env
            .as_ref()
            .ok_or_else(|| AppResponse::DatabaseError("Journal store is closed".to_string()))
    }

    pub fn get(&self, id: &str) -> Result<Option<JournalEntry>, AppResponse> {
        let txn = self.env()?.begin_ro_txn()?;
        let entry = match txn.get(self.db, &id) {
            Ok(bytes) => Some(serde_json::from_slice(bytes)?),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(AppResponse::from(e)),
        };
        Ok(entry)
    }
}

impl JournalStore for LmdbJournalStore {
    fn save(&mut self, entry: JournalEntry) -> Result<JournalEntry, AppResponse> {
        let json = serde_json::to_vec(&entry)?;
        let mut txn = self.env()?.begin_rw_txn()?;
        txn.put(self.db, &entry.id, &json, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Journal entry {} written", entry.id);
        Ok(entry)
    }

    fn delete(&mut self, id: &str) -> Result<bool, AppResponse> {
        let mut txn = self.env()?.begin_rw_txn()?;
        match txn.del(self.db, &id, None) {
            Ok(()) => {
                txn.commit()?;
                Ok(true)
            }
            Err(lmdb::Error::NotFound) => Ok(false),
            Err(e) => Err(AppResponse::from(e)),
        }
    }

    fn list(&self) -> Result<Vec<JournalEntry>, AppResponse> {
        let txn = self.env()?.begin_ro_txn()?;
        let mut entries = Vec::new();
        {
            let mut cursor = txn.open_ro_cursor(self.db)?;
            for (key, value) in cursor.iter() {
                match serde_json::from_slice::<JournalEntry>(value) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!("Skipping unreadable journal record {:?}: {e}", String::from_utf8_lossy(key)),
                }
            }
        }
        sort_by_id(&mut entries);
        Ok(entries)
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        let mut txn = self.env()?.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;
        Ok(())
    }

    fn reseed(&mut self, entries: Vec<JournalEntry>) -> Result<(), AppResponse> {
        let mut records = Vec::with_capacity(entries.len());
        for entry in &entries {
            records.push((entry.id.as_str(), serde_json::to_vec(entry)?));
        }

        let mut txn = self.env()?.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        for (id, json) in &records {
            txn.put(self.db, id, json, WriteFlags::empty())?;
        }
        txn.commit()?;
        info!("Journal store at {} reseeded with {} entries", self.path.display(), records.len());
        Ok(())
    }
}
