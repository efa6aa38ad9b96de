//! Symptom matcher
//!
//! A disease is a candidate when it affects the selected crop and at least
//! one selected symptom name appears in one of its symptom descriptions.
//! Results keep catalog order; they are not ranked by how much overlaps.

use tracing::debug;

use crate::{
    catalog::Catalog,
    models::{Disease, MatchQuery},
};

/// Diseases from `catalog` matching `query`, in catalog order
///
/// An empty query yields no diseases. Crop types compare exactly; symptom
/// names are case-insensitive substrings of the disease's descriptions.
/// Selected ids missing from the symptom catalog match nothing.
pub fn compute_matches<'a>(query: &MatchQuery, catalog: &'a Catalog) -> Vec<&'a Disease> {
    if query.is_empty() {
        return Vec::new();
    }

    let selected_names: Vec<&str> = query
        .symptom_ids
        .iter()
        .filter_map(|id| catalog.symptom(*id))
        .map(|symptom| symptom.name.as_str())
        .collect();

    let matches: Vec<&Disease> = catalog
        .diseases
        .iter()
        .filter(|disease| {
            let crop_match = query
                .crop_type
                .as_deref()
                .is_none_or(|crop| disease.affects(crop));

            let symptom_match = query.symptom_ids.is_empty()
                || selected_names
                    .iter()
                    .any(|name| disease.mentions_symptom(name));

            crop_match && symptom_match
        })
        .collect();

    debug!(
        "Matched {} of {} diseases for crop {:?} and {} symptoms",
        matches.len(),
        catalog.diseases.len(),
        query.crop_type,
        query.symptom_ids.len()
    );

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Symptom, SymptomCategory};

    fn names(diseases: &[&Disease]) -> Vec<String> {
        diseases.iter().map(|disease| disease.name.clone()).collect()
    }

    fn catalog() -> &'static Catalog {
        Catalog::builtin()
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(compute_matches(&MatchQuery::new(), catalog()).is_empty());
    }

    #[test]
    fn test_crop_only_returns_every_disease_of_that_crop() {
        let query = MatchQuery::new().with_crop_type("Rice");
        assert_eq!(
            names(&compute_matches(&query, catalog())),
            vec!["Bacterial Blight", "Rice Blast"]
        );
    }

    #[test]
    fn test_crop_match_is_case_sensitive() {
        let query = MatchQuery::new().with_crop_type("rice");
        assert!(compute_matches(&query, catalog()).is_empty());
    }

    #[test]
    fn test_symptom_match_is_case_insensitive() {
        // "Wilting" matches "Rapid wilting of foliage" despite the case difference
        let query = MatchQuery::new().with_symptom(4);
        assert_eq!(
            names(&compute_matches(&query, catalog())),
            vec!["Late Blight", "Bacterial Blight", "Fusarium Wilt", "Root Rot"]
        );
    }

    #[test]
    fn test_symptom_name_must_be_contained_in_description() {
        let mut catalog = Catalog {
            diseases: vec![catalog().disease(2).unwrap().clone()],
            symptoms: vec![Symptom {
                id: 1,
                name: "White powdery coating".to_string(),
                category: SymptomCategory::Leaf,
            }],
        };
        catalog.diseases[0].symptoms = vec!["White powdery spots on leaves".to_string()];

        let query = MatchQuery::new().with_symptom(1);
        assert!(compute_matches(&query, &catalog).is_empty());

        catalog.diseases[0].symptoms = vec!["White powdery coating on leaves".to_string()];
        assert_eq!(names(&compute_matches(&query, &catalog)), vec!["Powdery Mildew"]);
    }

    #[test]
    fn test_builtin_powdery_coating_does_not_match_powdery_spots() {
        // "White powdery coating" is not a substring of "White powdery spots on leaves"
        let query = MatchQuery::new().with_symptom(3);
        assert!(compute_matches(&query, catalog()).is_empty());
    }

    #[test]
    fn test_single_overlapping_symptom_is_enough() {
        // Powdery Mildew has no "Root rot" but does have "Leaf curl"
        let query = MatchQuery::new().with_symptoms([5, 8]);
        assert_eq!(
            names(&compute_matches(&query, catalog())),
            vec!["Powdery Mildew", "Root Rot", "Downy Mildew"]
        );
    }

    #[test]
    fn test_crop_and_symptoms_must_both_hold() {
        let query = MatchQuery::new().with_crop_type("Rice").with_symptom(2);
        assert_eq!(names(&compute_matches(&query, catalog())), vec!["Rice Blast"]);

        let query = MatchQuery::new().with_crop_type("Cotton").with_symptom(4);
        assert_eq!(
            names(&compute_matches(&query, catalog())),
            vec!["Bacterial Blight", "Fusarium Wilt"]
        );
    }

    #[test]
    fn test_symptom_absent_from_every_description_matches_nothing() {
        let query = MatchQuery::new().with_symptom(11);
        assert!(compute_matches(&query, catalog()).is_empty());
    }

    #[test]
    fn test_unknown_symptom_id_matches_nothing() {
        let query = MatchQuery::new().with_symptom(999);
        assert!(compute_matches(&query, catalog()).is_empty());

        let query = MatchQuery::new().with_crop_type("Rice").with_symptom(999);
        assert!(compute_matches(&query, catalog()).is_empty());
    }

    #[test]
    fn test_results_follow_catalog_order() {
        let query = MatchQuery::new().with_symptoms([6, 1]);
        let ids: Vec<u32> = compute_matches(&query, catalog())
            .iter()
            .map(|disease| disease.id)
            .collect();

        assert_eq!(ids, vec![2, 3, 5, 6, 7, 10]);
    }
}
