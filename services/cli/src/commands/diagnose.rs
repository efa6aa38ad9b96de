use std::borrow::Cow;

use anyhow::{Context, Result, bail};
use common::settings::Settings;
use diagnosis::{Catalog, MatchQuery, SymptomId, compute_matches};

fn load_catalog(settings: &Settings) -> Result<Cow<'static, Catalog>> {
    match &settings.catalog_path {
        Some(path) => {
            let catalog = Catalog::from_path(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            Ok(Cow::Owned(catalog))
        }
        None => Ok(Cow::Borrowed(Catalog::builtin())),
    }
}

/// Resolve each argument as a symptom id or, failing that, a symptom name
fn resolve_symptoms(catalog: &Catalog, symptoms: &[String]) -> Result<Vec<SymptomId>> {
    let mut ids = Vec::new();
    for symptom in symptoms {
        if let Ok(id) = symptom.trim().parse::<SymptomId>() {
            ids.push(id);
            continue;
        }

        let found = catalog.find_symptom_ids_by_name(symptom);
        if found.is_empty() {
            bail!("Unknown symptom '{}'; see `farmsight catalog symptoms`", symptom);
        }
        ids.extend(found);
    }
    Ok(ids)
}

pub fn diagnose(settings: &Settings, crop: Option<String>, symptoms: &[String]) -> Result<()> {
    let catalog = load_catalog(settings)?;

    let mut query = MatchQuery::new().with_symptoms(resolve_symptoms(&catalog, symptoms)?);
    if let Some(crop) = crop {
        query = query.with_crop_type(crop);
    }

    if query.is_empty() {
        println!("Select a crop type and/or at least one symptom");
        return Ok(());
    }

    let matches = compute_matches(&query, &catalog);
    if matches.is_empty() {
        println!("No matching diseases");
        return Ok(());
    }

    for disease in matches {
        println!("[{}] {} ({})", disease.id, disease.name, disease.crop_types.join(", "));
        println!("    {}", disease.description);
    }
    Ok(())
}

pub fn crops(settings: &Settings) -> Result<()> {
    for crop in load_catalog(settings)?.crop_types() {
        println!("{}", crop);
    }
    Ok(())
}

pub fn symptoms(settings: &Settings) -> Result<()> {
    let catalog = load_catalog(settings)?;
    for (category, symptoms) in catalog.symptoms_by_category() {
        println!("{}:", category);
        for symptom in symptoms {
            println!("  [{}] {}", symptom.id, symptom.name);
        }
    }
    Ok(())
}

pub fn disease(settings: &Settings, id: u32) -> Result<()> {
    let catalog = load_catalog(settings)?;
    let disease = catalog
        .disease(id)
        .with_context(|| format!("No disease with id {}", id))?;

    println!("{}", disease.name);
    println!("Crops: {}", disease.crop_types.join(", "));
    println!("{}", disease.description);
    println!("Symptoms:");
    for symptom in &disease.symptoms {
        println!("  - {}", symptom);
    }
    println!("Treatment: {}", disease.treatment);
    println!("Prevention: {}", disease.prevention);
    Ok(())
}
