//! Disease and symptom catalog
//!
//! The dashboard ships one built-in catalog; an alternative catalog in the
//! same JSON shape can be loaded from disk.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{CatalogError, CatalogResult},
    models::{Disease, DiseaseId, Symptom, SymptomCategory, SymptomId},
};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Static reference data the matcher runs over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub diseases: Vec<Disease>,
    pub symptoms: Vec<Symptom>,
}

impl Catalog {
    /// The catalog shipped with the dashboard
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::from_json(BUILTIN_CATALOG).expect("Failed to parse built-in catalog")
        })
    }

    /// Parse and check a catalog
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.check_ids()?;
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded catalog from {} ({} diseases, {} symptoms)",
            path.display(),
            catalog.diseases.len(),
            catalog.symptoms.len()
        );
        Ok(catalog)
    }

    fn check_ids(&self) -> CatalogResult<()> {
        let mut diseases = HashSet::new();
        for disease in &self.diseases {
            if !diseases.insert(disease.id) {
                return Err(CatalogError::DuplicateDisease(disease.id));
            }
        }

        let mut symptoms = HashSet::new();
        for symptom in &self.symptoms {
            if !symptoms.insert(symptom.id) {
                return Err(CatalogError::DuplicateSymptom(symptom.id));
            }
        }

        Ok(())
    }

    pub fn disease(&self, id: DiseaseId) -> Option<&Disease> {
        self.diseases.iter().find(|disease| disease.id == id)
    }

    pub fn symptom(&self, id: SymptomId) -> Option<&Symptom> {
        self.symptoms.iter().find(|symptom| symptom.id == id)
    }

    /// Ids of symptoms whose name equals `name`, ignoring case
    pub fn find_symptom_ids_by_name(&self, name: &str) -> Vec<SymptomId> {
        let name = name.trim().to_lowercase();
        self.symptoms
            .iter()
            .filter(|symptom| symptom.name.to_lowercase() == name)
            .map(|symptom| symptom.id)
            .collect()
    }

    /// Distinct crop types across all diseases, sorted, for the crop selector
    pub fn crop_types(&self) -> Vec<&str> {
        let crops: BTreeSet<&str> = self
            .diseases
            .iter()
            .flat_map(|disease| disease.crop_types.iter().map(String::as_str))
            .collect();
        crops.into_iter().collect()
    }

    /// Symptoms grouped by category, catalog order within a group
    pub fn symptoms_by_category(&self) -> BTreeMap<SymptomCategory, Vec<&Symptom>> {
        let mut groups: BTreeMap<SymptomCategory, Vec<&Symptom>> = BTreeMap::new();
        for symptom in &self.symptoms {
            groups.entry(symptom.category).or_default().push(symptom);
        }
        groups
    }
}
