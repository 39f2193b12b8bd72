use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info};

use crate::app_response::AppResponse;
use crate::catalog_query::{featured_wines, query_wines, WineFilter};
use crate::journal_store::JournalStore;
use crate::localization::{Language, LocalizationTable};
use crate::session_config::SessionConfig;
use crate::translator::Translator;
use crate::wine_dataset::Dataset;
use crate::wine_model::{JournalEntry, JournalEntryInput, JournalView, Wine};

/// Everything the presentation layer needs for one running app session.
///
/// The catalog and string tables are shared read-only; favorites, the journal
/// and the active language belong to the session and change only through its
/// methods.
pub struct AppSession {
    config: SessionConfig,
    dataset: Arc<Dataset>,
    translator: Translator,
    favorites: BTreeSet<String>,
    journal: Box<dyn JournalStore>,
}

impl AppSession {
    pub fn init(config: SessionConfig) -> Result<Self, AppResponse> {
        let dataset = Dataset::bundled()?;
        let table = LocalizationTable::bundled()?;
        Self::with_parts(config, dataset, table)
    }

    /// Builds a session over an explicit catalog and string table.
    pub fn with_parts(
        config: SessionConfig,
        dataset: Arc<Dataset>,
        table: Arc<LocalizationTable>,
    ) -> Result<Self, AppResponse> {
        let journal = config.open_journal()?;
        let favorites = config.initial_favorites().into_iter().collect();
        let translator = Translator::new(table, config.language);

        info!(
            "Session started (language '{}', journal backend {:?})",
            config.language, config.journal
        );

        Ok(AppSession { config, dataset, translator, favorites, journal })
    }

    /// Restores the seeded favorites and replaces the journal with its seed
    /// entries. The active language is kept.
    pub fn reset(&mut self) -> Result<(), AppResponse> {
        self.journal.reseed(self.config.seed_entries())?;
        self.favorites = self.config.initial_favorites().into_iter().collect();
        info!("Session reset");
        Ok(())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    // ---- translation ----

    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    pub fn current_language(&self) -> Language {
        self.translator.current_language()
    }

    pub fn change_language(&mut self, language: Language) {
        self.translator.change_language(language);
    }

    // ---- catalog ----

    pub fn query_wines(&self, filter: &WineFilter, search_text: Option<&str>) -> Vec<&Wine> {
        let wines = query_wines(&self.dataset, filter, search_text);
        debug!("Query {:?} / {:?} matched {} wines", filter, search_text, wines.len());
        wines
    }

    pub fn featured_wines(&self, limit: usize) -> Vec<&Wine> {
        featured_wines(&self.dataset, limit)
    }

    pub fn wine(&self, id: &str) -> Option<&Wine> {
        self.dataset.wine(id)
    }

    // ---- favorites ----

    /// Returns whether `wine_id` is a favorite after the toggle.
    pub fn toggle_favorite(&mut self, wine_id: &str) -> bool {
        if self.favorites.remove(wine_id) {
            false
        } else {
            self.favorites.insert(wine_id.to_string());
            true
        }
    }

    pub fn is_favorite(&self, wine_id: &str) -> bool {
        self.favorites.contains(wine_id)
    }

    /// Favorited wines in catalog order. Ids with no wine are skipped.
    pub fn favorite_wines(&self) -> Vec<&Wine> {
        self.dataset
            .wines
            .iter()
            .filter(|wine| self.favorites.contains(&wine.id))
            .collect()
    }

    // ---- journal ----

    /// Stores a new entry for a wine that exists in the catalog.
    pub fn add_journal_entry(&mut self, input: JournalEntryInput) -> Result<JournalEntry, AppResponse> {
        if self.dataset.wine(&input.wine_id).is_none() {
            return Err(AppResponse::NotFound(format!("No wine found with id: {}", input.wine_id)));
        }

        let id = self.journal.next_id()?;
        let entry = input.into_entry(id, today);
        let saved = self.journal.save(entry)?;
        info!("Journal entry {} added for wine {}", saved.id, saved.wine_id);
        Ok(saved)
    }

    /// Returns `false` when no entry had that id.
    pub fn delete_journal_entry(&mut self, id: &str) -> Result<bool, AppResponse> {
        let removed = self.journal.delete(id)?;
        if removed {
            info!("Journal entry {} deleted", id);
        }
        Ok(removed)
    }

    pub fn journal_entries(&self) -> Result<Vec<JournalEntry>, AppResponse> {
        self.journal.list()
    }

    /// Entries joined with their wine, filtered by a case-insensitive
    /// substring of the wine name, notes, occasion or location. Entries whose
    /// wine is not in the catalog are left out.
    pub fn search_journal(&self, query: &str) -> Result<Vec<JournalView<'_>>, AppResponse> {
        let needle = query.to_lowercase();
        let views = self
            .journal
            .list()?
            .into_iter()
            .filter_map(|entry| {
                let wine = self.dataset.wine(&entry.wine_id)?;
                let hit = [
                    wine.name.as_str(),
                    entry.notes.as_str(),
                    entry.occasion.as_str(),
                    entry.location.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
                hit.then_some(JournalView { entry, wine })
            })
            .collect();
        Ok(views)
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
