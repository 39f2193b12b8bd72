//! Category and free-text filtering over the catalog.
//!
//! Filtering is a linear scan that keeps dataset order; there is no ranking.

use serde::Deserialize;

use crate::wine_dataset::Dataset;
use crate::wine_model::Wine;

/// Primary grouping used to narrow the wine list.
///
/// Deserializes from the shape the presentation layer sends:
/// `{"kind": "region", "value": "Kakheti"}` or
/// `{"kind": "search", "text": "qvevri"}`. Unknown kinds, and known kinds with
/// no value, become [`WineFilter::All`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawWineFilter")]
pub enum WineFilter {
    #[default]
    All,
    Region(String),
    Grape(String),
    Type(String),
    Method(String),
    /// No category constraint; the text feeds the free-text filter.
    Search(String),
}

#[derive(Deserialize)]
struct RawWineFilter {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<RawWineFilter> for WineFilter {
    fn from(raw: RawWineFilter) -> Self {
        let RawWineFilter { kind, value, text } = raw;
        match (kind.as_str(), value) {
            ("region", Some(v)) => WineFilter::Region(v),
            ("grape", Some(v)) => WineFilter::Grape(v),
            ("type", Some(v)) => WineFilter::Type(v),
            ("method", Some(v)) => WineFilter::Method(v),
            ("search", v) => WineFilter::Search(text.or(v).unwrap_or_default()),
            _ => WineFilter::All,
        }
    }
}

impl WineFilter {
    /// Category test only; the free-text filter is applied separately.
    pub fn matches(&self, wine: &Wine) -> bool {
        match self {
            WineFilter::All | WineFilter::Search(_) => true,
            WineFilter::Region(name) => wine.region.as_str() == name.as_str(),
            WineFilter::Grape(name) => wine.grape == *name || wine.grape.contains(name.as_str()),
            WineFilter::Type(name) => wine.wine_type == *name,
            WineFilter::Method(name) => wine.fermentation.as_str() == name.as_str(),
        }
    }

    fn search_text(&self) -> Option<&str> {
        match self {
            WineFilter::Search(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Case-insensitive substring test over name, winery, grape, region and
/// description. An empty query matches everything.
pub fn matches_text(wine: &Wine, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        wine.name.as_str(),
        wine.winery.as_str(),
        wine.grape.as_str(),
        wine.region.as_str(),
        wine.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Wines passing both the category filter and the free-text filter, in
/// dataset order.
///
/// `search_text` is what the user typed into the list's search box. For a
/// [`WineFilter::Search`] query it replaces the filter's own text when given.
pub fn query_wines<'a>(dataset: &'a Dataset, filter: &WineFilter, search_text: Option<&str>) -> Vec<&'a Wine> {
    let text = search_text.or_else(|| filter.search_text()).unwrap_or("");

    dataset
        .wines
        .iter()
        .filter(|wine| filter.matches(wine))
        .filter(|wine| matches_text(wine, text))
        .collect()
}

/// Top-rated wines for the home screen. Ties keep dataset order.
pub fn featured_wines(dataset: &Dataset, limit: usize) -> Vec<&Wine> {
    let mut wines: Vec<&Wine> = dataset.wines.iter().collect();
    wines.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    wines.truncate(limit);
    wines
}
