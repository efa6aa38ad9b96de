//! Disease catalog models

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type DiseaseId = u32;
pub type SymptomId = u32;

/// Crop disease reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: DiseaseId,
    pub name: String,
    /// Crops the disease affects; matched by exact, case-sensitive containment
    pub crop_types: Vec<String>,
    /// Free-text symptom descriptions, in display order
    pub symptoms: Vec<String>,
    pub description: String,
    pub treatment: String,
    pub prevention: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Disease {
    /// Whether the disease affects the given crop (case-sensitive)
    pub fn affects(&self, crop_type: &str) -> bool {
        self.crop_types.iter().any(|crop| crop == crop_type)
    }

    /// Whether any symptom description contains `name`, ignoring case
    pub fn mentions_symptom(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.symptoms
            .iter()
            .any(|symptom| symptom.to_lowercase().contains(&needle))
    }
}

/// Part of the plant a symptom shows on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomCategory {
    Leaf,
    Stem,
    Root,
    Fruit,
    General,
}

impl fmt::Display for SymptomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymptomCategory::Leaf => "leaf",
            SymptomCategory::Stem => "stem",
            SymptomCategory::Root => "root",
            SymptomCategory::Fruit => "fruit",
            SymptomCategory::General => "general",
        };
        f.write_str(name)
    }
}

/// Selectable symptom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: SymptomId,
    pub name: String,
    pub category: SymptomCategory,
}

/// The farmer's current crop and symptom selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchQuery {
    pub crop_type: Option<String>,
    pub symptom_ids: BTreeSet<SymptomId>,
}

impl MatchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crop_type(mut self, crop_type: impl Into<String>) -> Self {
        self.crop_type = Some(crop_type.into());
        self
    }

    pub fn with_symptom(mut self, id: SymptomId) -> Self {
        self.symptom_ids.insert(id);
        self
    }

    pub fn with_symptoms(mut self, ids: impl IntoIterator<Item = SymptomId>) -> Self {
        self.symptom_ids.extend(ids);
        self
    }

    /// Nothing selected
    pub fn is_empty(&self) -> bool {
        self.crop_type.is_none() && self.symptom_ids.is_empty()
    }
}
