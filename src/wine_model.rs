//! Data contracts for the wine catalog and the tasting journal.
//!
//! Catalog entities ([`Wine`], [`Region`], [`GrapeVariety`],
//! [`FermentationMethod`], [`WineType`]) are read-only and come from the
//! bundled dataset. [`JournalEntry`] is the only record the app writes.
//!
//! All structs serialize with the camelCase field names used by the
//! presentation layer, so the JSON crossing the FFI boundary looks like:
//!
//! ```json
//! {
//!   "id": "1",
//!   "name": "Saperavi Reserve",
//!   "winery": "Pheasant's Tears",
//!   "type": "Red",
//!   "region": "Kakheti",
//!   "grape": "Saperavi",
//!   "fermentation": "Qvevri",
//!   "vintage": "2019",
//!   "description": "...",
//!   "rating": 4.7,
//!   "price": "35-45 GEL",
//!   "alcohol": "13.5%"
//! }
//! ```

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Name of a [`Region`] as referenced from a [`Wine`].
///
/// Wines point at regions by name, so this wrapper keeps those references
/// from being mixed up with other free-text fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionName(pub String);

/// Name of a [`FermentationMethod`] as referenced from a [`Wine`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodName(pub String);

impl RegionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl MethodName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RegionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for MethodName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionName {
    fn from(value: &str) -> Self {
        RegionName(value.to_string())
    }
}

impl From<&str> for MethodName {
    fn from(value: &str) -> Self {
        MethodName(value.to_string())
    }
}

/// A single bottling in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wine {
    /// Unique across the dataset.
    pub id: String,
    pub name: String,
    pub winery: String,
    /// Red, White, Amber, Rosé, Sparkling, Semi-Sweet Red... Free text.
    #[serde(rename = "type")]
    pub wine_type: String,
    pub region: RegionName,
    /// Single variety or a blend description such as "Tsitska-Tsolikouri Blend".
    pub grape: String,
    pub fermentation: MethodName,
    pub vintage: String,
    pub description: String,
    /// 0.0 to 5.0. Not enforced, the dataset is read-only.
    pub rating: f32,
    pub price: String,
    pub alcohol: String,
}

/// Map anchor for a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    /// Join key for [`Wine::region`].
    pub name: String,
    pub description: String,
    pub grapes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<String>,
    #[serde(default)]
    pub key_vineyards: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrapeVariety {
    pub id: String,
    pub name: String,
    pub color: String,
    pub description: String,
    /// Region names. Not kept in sync with [`Region::grapes`].
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FermentationMethod {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "UNESCO", default)]
    pub unesco: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineType {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A stored tasting note.
///
/// `date` is kept as the user typed it (`YYYY-MM-DD` by convention) and is
/// never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub wine_id: String,
    pub date: String,
    pub rating: f32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub location: String,
}

/// What the add-entry form submits. The id is assigned by the journal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryInput {
    pub wine_id: String,
    /// Defaults to today's local date.
    #[serde(default)]
    pub date: Option<String>,
    /// Defaults to 5.0, the form's initial value.
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub location: String,
}

pub const DEFAULT_JOURNAL_RATING: f32 = 5.0;

impl JournalEntryInput {
    pub fn for_wine(wine_id: impl Into<String>) -> Self {
        JournalEntryInput {
            wine_id: wine_id.into(),
            ..Default::default()
        }
    }

    /// Turns the form input into a stored entry with the given id.
    pub fn into_entry(self, id: String, today: impl FnOnce() -> String) -> JournalEntry {
        JournalEntry {
            id,
            wine_id: self.wine_id,
            date: self.date.unwrap_or_else(today),
            rating: self.rating.unwrap_or(DEFAULT_JOURNAL_RATING),
            notes: self.notes,
            occasion: self.occasion,
            location: self.location,
        }
    }
}

/// A journal entry paired with the wine it refers to, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalView<'a> {
    pub entry: JournalEntry,
    pub wine: &'a Wine,
}
