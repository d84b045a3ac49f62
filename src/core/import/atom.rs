//! Import des déclarations de risques ATOM depuis un export CSV.
//!
//! Le fichier n'a pas d'en-tête; chaque ligne contient exactement trois
//! colonnes: `identifier, table_name, free_text`. La variante historique
//! (`import-atom`) ignore la deuxième colonne et range tout sous `ATOM_risk`.

use std::io::Read;

use sqlx::PgPool;
use tracing::info;

use super::{persist_batches, ImportBatch, ImportReport};
use crate::{
    domain::dataset::ExtractedItem,
    domain::problem::{ClassificationType, NewProblem},
    infrastructure::error::{AppError, AppResult},
    infrastructure::sources::TextSource,
};

pub const ATOM_TABLE: &str = "ATOM_risk";
pub const ATOM_COLUMNS: usize = 3;

const RISK_CONTROL_LABELS: &[&str] = &[
    "Risk Positive",
    "Risk Neutral",
    "Risk Negative",
    "Control Positive",
    "Control Neutral",
    "Control Negative",
];

/// Une ligne de l'export ATOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomRecord {
    pub identifier: String,
    pub table_name: String,
    pub free_text: String,
}

/// Variantes de la commande d'import ATOM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomVariant {
    /// `import-atom`
    Legacy,
    /// `import-atom-ml`
    MultiLabel,
    /// `import-atom-mc`
    MultiClass,
    /// `import-atom-b`
    Binary,
}

impl AtomVariant {
    pub fn problem(&self) -> NewProblem {
        match self {
            AtomVariant::Legacy => NewProblem::with_labels(
                "ATOM_reports",
                ClassificationType::MultiLabel,
                RISK_CONTROL_LABELS,
            ),
            AtomVariant::MultiLabel => NewProblem::with_labels(
                "ATOM_reports (Multi-label)",
                ClassificationType::MultiLabel,
                RISK_CONTROL_LABELS,
            ),
            AtomVariant::MultiClass => NewProblem::with_labels(
                "ATOM_reports (Multi-class)",
                ClassificationType::MultiClass,
                &["Risk", "Control", "Neither"],
            ),
            AtomVariant::Binary => NewProblem::with_labels(
                "ATOM_reports (Binary)",
                ClassificationType::Binary,
                &["Risk statement"],
            ),
        }
    }

    /// Tag de provenance d'une ligne selon la variante
    fn table_name<'a>(&self, record: &'a AtomRecord) -> &'a str {
        match self {
            AtomVariant::Legacy => ATOM_TABLE,
            _ => &record.table_name,
        }
    }
}

/// Lit l'export CSV; une ligne qui n'a pas exactement trois colonnes fait
/// échouer tout l'import.
pub fn parse_atom_csv<R: Read>(reader: R) -> AppResult<Vec<AtomRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(index as u64 + 1);

        if row.len() != ATOM_COLUMNS {
            return Err(AppError::CsvError(format!(
                "ligne {}: {} colonne(s) au lieu de {}",
                line,
                row.len(),
                ATOM_COLUMNS
            )));
        }

        if row[0].trim().is_empty() {
            return Err(AppError::CsvError(format!("ligne {}: identifiant vide", line)));
        }

        // Identifiant et tag de provenance conservés tels quels
        records.push(AtomRecord {
            identifier: row[0].to_string(),
            table_name: row[1].to_string(),
            free_text: row[2].to_string(),
        });
    }

    Ok(records)
}

/// Construit le lot d'import pour une variante
pub fn atom_batch(records: &[AtomRecord], variant: AtomVariant) -> AppResult<ImportBatch> {
    let items = records
        .iter()
        .map(|record| {
            let table_name = variant.table_name(record);
            if table_name.trim().is_empty() {
                return Err(AppError::CsvError(format!(
                    "{}: colonne table_name vide",
                    record.identifier
                )));
            }
            Ok(ExtractedItem::new(table_name, &record.identifier, &record.free_text))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ImportBatch::new(variant.problem(), items))
}

/// `import-atom`, `import-atom-ml`, `import-atom-mc`, `import-atom-b`
pub async fn import_atom(
    pool: &PgPool,
    source: &dyn TextSource,
    variant: AtomVariant,
) -> AppResult<ImportReport> {
    let content = source.fetch().await?;
    let records = parse_atom_csv(content.as_bytes())?;
    let batch = atom_batch(&records, variant)?;

    let mut reports = persist_batches(pool, &[batch]).await?;
    info!(
        variant = ?variant,
        "✅ {} déclarations de risque insérées depuis {}",
        records.len(),
        source.describe()
    );

    reports
        .pop()
        .ok_or_else(|| AppError::InternalError("aucun rapport d'import".to_string()))
}
