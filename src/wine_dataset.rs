//! The bundled, read-only catalog.
//!
//! The dataset is embedded at compile time, parsed on first use and shared
//! as an `Arc<Dataset>` by every session in the process.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, OnceLock};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::wine_model::{FermentationMethod, GrapeVariety, Region, Wine, WineType};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

static BUNDLED: OnceLock<Arc<Dataset>> = OnceLock::new();

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub regions: Vec<Region>,
    pub grape_varieties: Vec<GrapeVariety>,
    pub wines: Vec<Wine>,
    pub fermentation_methods: Vec<FermentationMethod>,
    pub wine_types: Vec<WineType>,
}

/// A wine field that names a catalog entity which does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReferenceIssue {
    UnknownRegion { wine_id: String, region: String },
    UnknownMethod { wine_id: String, method: String },
    UnknownWineType { wine_id: String, wine_type: String },
}

impl Display for ReferenceIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceIssue::UnknownRegion { wine_id, region } =>
                write!(f, "wine {} references unknown region '{}'", wine_id, region),
            ReferenceIssue::UnknownMethod { wine_id, method } =>
                write!(f, "wine {} references unknown fermentation method '{}'", wine_id, method),
            ReferenceIssue::UnknownWineType { wine_id, wine_type } =>
                write!(f, "wine {} references unknown wine type '{}'", wine_id, wine_type),
        }
    }
}

impl Dataset {
    /// Returns the process-wide bundled dataset, parsing it on first call.
    pub fn bundled() -> Result<Arc<Dataset>, AppResponse> {
        if let Some(dataset) = BUNDLED.get() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(Dataset::from_json(BUNDLED_CATALOG)?);
        info!(
            "Bundled catalog loaded: {} wines, {} regions, {} grapes",
            dataset.wines.len(),
            dataset.regions.len(),
            dataset.grape_varieties.len()
        );
        Ok(Arc::clone(BUNDLED.get_or_init(|| dataset)))
    }

    /// Parses a catalog and runs the reference check over it.
    ///
    /// Duplicate wine ids are rejected. Dangling region, method and type
    /// names are only logged.
    pub fn from_json(json: &str) -> Result<Dataset, AppResponse> {
        let dataset: Dataset = serde_json::from_str(json)?;

        let mut seen = HashSet::new();
        for wine in &dataset.wines {
            if !seen.insert(wine.id.as_str()) {
                return Err(AppResponse::ValidationError(format!("Duplicate wine id: {}", wine.id)));
            }
        }

        for issue in dataset.reference_issues() {
            warn!("Catalog reference mismatch: {issue}");
        }

        Ok(dataset)
    }

    /// Lists every wine whose region, fermentation or type does not match a
    /// canonical entity by exact name.
    pub fn reference_issues(&self) -> Vec<ReferenceIssue> {
        let mut issues = Vec::new();

        for wine in &self.wines {
            if self.region(wine.region.as_str()).is_none() {
                issues.push(ReferenceIssue::UnknownRegion {
                    wine_id: wine.id.clone(),
                    region: wine.region.to_string(),
                });
            }
            if self.method(wine.fermentation.as_str()).is_none() {
                issues.push(ReferenceIssue::UnknownMethod {
                    wine_id: wine.id.clone(),
                    method: wine.fermentation.to_string(),
                });
            }
            if self.wine_type(&wine.wine_type).is_none() {
                issues.push(ReferenceIssue::UnknownWineType {
                    wine_id: wine.id.clone(),
                    wine_type: wine.wine_type.clone(),
                });
            }
        }

        issues
    }

    pub fn wine(&self, id: &str) -> Option<&Wine> {
        self.wines.iter().find(|w| w.id == id)
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn grape(&self, name: &str) -> Option<&GrapeVariety> {
        self.grape_varieties.iter().find(|g| g.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&FermentationMethod> {
        self.fermentation_methods.iter().find(|m| m.name == name)
    }

    pub fn wine_type(&self, name: &str) -> Option<&WineType> {
        self.wine_types.iter().find(|t| t.name == name)
    }

    /// First `limit` regions in dataset order.
    pub fn featured_regions(&self, limit: usize) -> &[Region] {
        &self.regions[..limit.min(self.regions.len())]
    }
}
