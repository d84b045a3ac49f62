//! # Imports en masse
//!
//! Chaque importeur transforme une source brute en un ou plusieurs lots
//! (`ImportBatch`): un nouveau problème avec ses labels, et la suite ordonnée
//! des éléments `(entity_id, free_text)` extraits. Tous les lots d'une même
//! commande sont enregistrés dans une seule transaction.
//!
//! - `gutenberg.rs`: livres du projet Gutenberg (extraction par regex)
//! - `atom.rs`: export CSV des risques ATOM

pub mod gutenberg;
pub mod atom;

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::dataset::ExtractedItem,
    domain::problem::NewProblem,
    infrastructure::database::ProblemRepository,
    infrastructure::error::{validation_error, AppResult},
};

/// Un problème à créer et les éléments qui lui seront rattachés
#[derive(Debug, Clone)]
pub struct ImportBatch {
    pub problem: NewProblem,
    pub items: Vec<ExtractedItem>,
}

impl ImportBatch {
    pub fn new(problem: NewProblem, items: Vec<ExtractedItem>) -> Self {
        Self { problem, items }
    }

    /// Vérifie le problème et l'unicité de `(table_name, entity_id)` dans le lot
    pub fn validate(&self) -> AppResult<()> {
        self.problem.validate()?;

        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert((item.table_name.as_str(), item.entity_id.as_str())) {
                return Err(validation_error(format!(
                    "Élément dupliqué dans '{}': ({}, {})",
                    self.problem.name, item.table_name, item.entity_id
                )));
            }
        }

        Ok(())
    }
}

/// Résultat de l'enregistrement d'un lot
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub problem_id: Uuid,
    pub problem_name: String,
    pub inserted: u64,
}

/// Enregistre tous les lots dans une seule transaction: soit tout est
/// committé, soit rien.
pub async fn persist_batches(pool: &PgPool, batches: &[ImportBatch]) -> AppResult<Vec<ImportReport>> {
    for batch in batches {
        batch.validate()?;
    }

    let mut tx = pool.begin().await?;
    let mut reports = Vec::with_capacity(batches.len());

    for batch in batches {
        let (problem, labels) = ProblemRepository::insert_with_labels(&mut tx, &batch.problem).await?;
        let inserted = ProblemRepository::insert_datasets(&mut tx, &problem.id, &batch.items).await?;

        info!(
            problem_id = %problem.id,
            labels = labels.len(),
            inserted,
            "📥 Problème '{}' importé",
            problem.name
        );

        reports.push(ImportReport {
            problem_id: problem.id,
            problem_name: problem.name,
            inserted,
        });
    }

    tx.commit().await?;
    Ok(reports)
}

/// Numérote les textes extraits: `<prefix><index>`, à partir de 0
pub(crate) fn numbered_items(
    table_name: &str,
    prefix: &str,
    texts: impl IntoIterator<Item = String>,
) -> Vec<ExtractedItem> {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| ExtractedItem::new(table_name, format!("{}{}", prefix, i), text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::ClassificationType;

    fn binary_problem() -> NewProblem {
        NewProblem::with_labels("Quotes", ClassificationType::Binary, &["Good quote"])
    }

    #[test]
    fn numbered_items_follow_extraction_order() {
        let items = numbered_items("src", "quote", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(items[0], ExtractedItem::new("src", "quote0", "a"));
        assert_eq!(items[1], ExtractedItem::new("src", "quote1", "b"));
    }

    #[test]
    fn empty_batch_is_valid() {
        let batch = ImportBatch::new(binary_problem(), Vec::new());
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn duplicate_entities_in_batch_are_rejected() {
        let batch = ImportBatch::new(
            binary_problem(),
            vec![
                ExtractedItem::new("src", "q1", "Great quote"),
                ExtractedItem::new("src", "q1", "Same id again"),
            ],
        );
        assert!(batch.validate().is_err());
    }

    #[test]
    fn same_entity_in_other_table_is_allowed() {
        let batch = ImportBatch::new(
            binary_problem(),
            vec![
                ExtractedItem::new("src", "q1", "Great quote"),
                ExtractedItem::new("other", "q1", "Great quote"),
            ],
        );
        assert!(batch.validate().is_ok());
    }
}
