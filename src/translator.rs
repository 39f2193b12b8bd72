use std::fmt::Display;
use std::sync::Arc;

use log::info;

use crate::localization::{interpolate, Language, LocalizationTable};

/// Key-based string lookup for the active UI language.
///
/// A key missing from the active language resolves to the key itself.
#[derive(Debug, Clone)]
pub struct Translator {
    table: Arc<LocalizationTable>,
    current: Language,
}

impl Translator {
    pub fn new(table: Arc<LocalizationTable>, language: Language) -> Self {
        Translator { table, current: language }
    }

    pub fn current_language(&self) -> Language {
        self.current
    }

    pub fn change_language(&mut self, language: Language) {
        if self.current != language {
            info!("Language changed from '{}' to '{}'", self.current, language);
        }
        self.current = language;
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(key).to_string()
    }

    /// Looks up `key` and substitutes `{name}` placeholders from `params`.
    ///
    /// ```
    /// use georgian_wine_core::localization::{Language, LocalizationTable};
    /// use georgian_wine_core::translator::Translator;
    ///
    /// let table = LocalizationTable::bundled()?;
    /// let translator = Translator::new(table, Language::En);
    /// assert_eq!(translator.t_with("winesCount", [("count", 5)]), "Showing 5 wines");
    /// # Ok::<(), georgian_wine_core::AppResponse>(())
    /// ```
    pub fn t_with<I, K, V>(&self, key: &str, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        interpolate(self.lookup(key), params)
    }

    fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.template(self.current, key).unwrap_or(key)
    }

    /// "Showing {count} wines" in the active language.
    pub fn wine_count_label(&self, count: usize) -> String {
        self.t_with("winesCount", [("count", count)])
    }
}
