//! Static string tables for every supported UI language.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, OnceLock};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

static BUNDLED: OnceLock<Arc<LocalizationTable>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    #[default]
    En,
    #[serde(rename = "ka")]
    Ka,
    #[serde(rename = "ru")]
    Ru,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ka, Language::Ru];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ka => "ka",
            Language::Ru => "ru",
        }
    }

    /// Case-insensitive; `None` for anything outside the supported set.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "ka" => Some(Language::Ka),
            "ru" => Some(Language::Ru),
            _ => None,
        }
    }

    /// Key of this language's own display name ("english", "georgian", ...).
    pub fn name_key(&self) -> &'static str {
        match self {
            Language::En => "english",
            Language::Ka => "georgian",
            Language::Ru => "russian",
        }
    }

    fn bundled_source(&self) -> &'static str {
        match self {
            Language::En => include_str!("../locales/en.json"),
            Language::Ka => include_str!("../locales/ka.json"),
            Language::Ru => include_str!("../locales/ru.json"),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// `language -> (key -> template)`.
#[derive(Debug, Clone, Default)]
pub struct LocalizationTable {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl LocalizationTable {
    /// Process-wide table built from the embedded locale files.
    pub fn bundled() -> Result<Arc<LocalizationTable>, AppResponse> {
        if let Some(table) = BUNDLED.get() {
            return Ok(Arc::clone(table));
        }

        let mut table = LocalizationTable::default();
        for language in Language::ALL {
            let strings: HashMap<String, String> = serde_json::from_str(language.bundled_source())?;
            info!("Loaded {} strings for language '{}'", strings.len(), language);
            table.insert(language, strings);
        }

        for language in Language::ALL {
            let missing = table.missing_keys(language);
            if !missing.is_empty() {
                warn!("Language '{}' is missing {} keys: {:?}", language, missing.len(), missing);
            }
        }

        let table = Arc::new(table);
        Ok(Arc::clone(BUNDLED.get_or_init(|| table)))
    }

    pub fn insert(&mut self, language: Language, strings: HashMap<String, String>) {
        self.tables.insert(language, strings);
    }

    pub fn template(&self, language: Language, key: &str) -> Option<&str> {
        self.tables
            .get(&language)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
    }

    pub fn len(&self, language: Language) -> usize {
        self.tables.get(&language).map_or(0, HashMap::len)
    }

    /// Keys defined in English but absent for `language`, sorted.
    pub fn missing_keys(&self, language: Language) -> Vec<String> {
        let Some(reference) = self.tables.get(&Language::En) else {
            return Vec::new();
        };
        let mut missing: Vec<String> = reference
            .keys()
            .filter(|key| self.template(language, key).is_none())
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

/// Replaces every `{name}` in `template` with the matching parameter value.
///
/// Parameters the template does not mention are ignored; placeholders with no
/// parameter stay in the output as written.
pub fn interpolate<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut result = template.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{}}}", name.as_ref());
        if result.contains(&placeholder) {
            result = result.replace(&placeholder, &value.to_string());
        }
    }
    result
}
