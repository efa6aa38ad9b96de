//! Catalog loading errors

use thiserror::Error;

use crate::models::{DiseaseId, SymptomId};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate disease id in catalog: {0}")]
    DuplicateDisease(DiseaseId),

    #[error("Duplicate symptom id in catalog: {0}")]
    DuplicateSymptom(SymptomId),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
