//! Crop disease diagnosis for the FarmSight dashboard
//!
//! A static catalog of diseases and symptoms, and the matcher that filters
//! it by the crop type and symptoms a farmer selects.

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod models;

pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use matcher::compute_matches;
pub use models::{Disease, DiseaseId, MatchQuery, Symptom, SymptomCategory, SymptomId};
