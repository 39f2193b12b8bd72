//! Session configuration.
//!
//! Passed as JSON to [`crate::create_session`]; every field is optional:
//!
//! ```json
//! {
//!   "language": "ka",
//!   "journal": { "backend": "lmdb", "path": "wine_journal" },
//!   "seedSamples": false
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::journal_store::{
    sample_journal_entries, DiscardJournalStore, JournalStore, LmdbJournalStore, MemoryJournalStore,
};
use crate::localization::Language;
use crate::wine_model::JournalEntry;

/// Favorites a fresh session starts with. `15` is not in the catalog.
pub const SAMPLE_FAVORITES: [&str; 4] = ["1", "7", "12", "15"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "camelCase")]
pub enum JournalBackend {
    #[default]
    Memory,
    Discard,
    Lmdb { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub language: Language,
    pub journal: JournalBackend,
    /// Seed the sample journal entries and favorites.
    pub seed_samples: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            language: Language::En,
            journal: JournalBackend::Memory,
            seed_samples: true,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, AppResponse> {
        if json.trim().is_empty() {
            return Ok(SessionConfig::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn initial_favorites(&self) -> Vec<String> {
        if self.seed_samples {
            SAMPLE_FAVORITES.iter().map(|id| id.to_string()).collect()
        } else {
            Vec::new()
        }
    }

    pub fn seed_entries(&self) -> Vec<JournalEntry> {
        if self.seed_samples {
            sample_journal_entries()
        } else {
            Vec::new()
        }
    }

    /// Builds the configured journal backend.
    ///
    /// A durable store is only seeded when it is empty, so restarting never
    /// resurrects deleted sample entries on top of real ones.
    pub fn open_journal(&self) -> Result<Box<dyn JournalStore>, AppResponse> {
        let seed = self.seed_entries();

        match &self.journal {
            JournalBackend::Memory => Ok(Box::new(MemoryJournalStore::with_entries(seed))),
            JournalBackend::Discard => Ok(Box::new(DiscardJournalStore::new(seed))),
            JournalBackend::Lmdb { path } => {
                if path.trim().is_empty() {
                    return Err(AppResponse::BadRequest("LMDB journal path must not be empty".to_string()));
                }
                let mut store = LmdbJournalStore::open(path)?;
                if store.list()?.is_empty() && !seed.is_empty() {
                    store.reseed(seed)?;
                }
                Ok(Box::new(store))
            }
        }
    }
}
