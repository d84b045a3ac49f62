//! Imports depuis des livres du projet Gutenberg.

use regex::Regex;
use sqlx::PgPool;
use tracing::info;

use super::{numbered_items, persist_batches, ImportBatch, ImportReport};
use crate::{
    domain::dataset::ExtractedItem,
    domain::problem::{ClassificationType, NewProblem},
    infrastructure::error::{AppError, AppResult},
    infrastructure::sources::TextSource,
};

pub const WISE_SAYINGS_TABLE: &str = "gutenberg.book_of_wise_sayings";
pub const PRIDE_TABLE: &str = "gutenberg.pride_and_prejudice_by_jane_austen";

/// Numéro, ligne vide, texte de la citation puis `_Auteur_`
const WISE_SAYING_PATTERN: &str = r"(?s)([0-9]+)\.\n\n(.+?)_(.+?)_";

fn normalize(text: &str) -> String {
    text.replace('\r', "")
}

/// Extrait les citations du "Book of Wise Sayings", sous la forme
/// `"<citation> (<auteur>)"`, identifiées `quote<i>`.
pub fn extract_wise_sayings(text: &str) -> AppResult<Vec<ExtractedItem>> {
    let pattern = Regex::new(WISE_SAYING_PATTERN)
        .map_err(|e| AppError::InternalError(format!("Regex invalide: {}", e)))?;

    let normalized = normalize(text);
    let quotes = pattern
        .captures_iter(&normalized)
        .map(|caps| format!("{} ({})", caps[2].trim(), &caps[3]));

    Ok(numbered_items(WISE_SAYINGS_TABLE, "quote", quotes))
}

/// Extrait les paragraphes du plus long segment délimité par `***`
/// (le corps du livre, sans l'en-tête ni la licence), identifiés
/// `paragraph<i>`.
pub fn extract_paragraphs(text: &str) -> Vec<ExtractedItem> {
    // Longueur en caractères; le premier segment le plus long l'emporte
    let (body, _) = text
        .split("***")
        .fold(("", 0), |(longest, longest_len), segment| {
            let len = segment.chars().count();
            if len > longest_len {
                (segment, len)
            } else {
                (longest, longest_len)
            }
        });

    let paragraphs = normalize(body)
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();

    numbered_items(PRIDE_TABLE, "paragraph", paragraphs)
}

/// Les trois problèmes de démonstration construits sur les mêmes citations
pub fn wise_sayings_batches(items: Vec<ExtractedItem>) -> Vec<ImportBatch> {
    vec![
        ImportBatch::new(
            NewProblem::with_labels(
                "Book of Wise sayings (Binary label)",
                ClassificationType::Binary,
                &["Good quote"],
            ),
            items.clone(),
        ),
        ImportBatch::new(
            NewProblem::with_labels(
                "Book of Wise sayings (Multi-label)",
                ClassificationType::MultiLabel,
                &["Motivational", "Love", "Inspiration", "Relationships"],
            ),
            items.clone(),
        ),
        ImportBatch::new(
            NewProblem::with_labels(
                "Book of Wise sayings (Multi-class)",
                ClassificationType::MultiClass,
                &["Excellent", "Good", "Okay", "Bad"],
            ),
            items,
        ),
    ]
}

pub fn pride_batch(items: Vec<ExtractedItem>) -> ImportBatch {
    ImportBatch::new(
        NewProblem::with_labels("Example", ClassificationType::Binary, &["Example"]),
        items,
    )
}

/// `import-fake-data`
pub async fn import_fake_data(pool: &PgPool, source: &dyn TextSource) -> AppResult<Vec<ImportReport>> {
    let text = source.fetch().await?;
    let quotes = extract_wise_sayings(&text)?;
    let count = quotes.len();

    let reports = persist_batches(pool, &wise_sayings_batches(quotes)).await?;
    info!("✅ {} citations insérées depuis {}", count, source.describe());

    Ok(reports)
}

/// `import-pride`
pub async fn import_pride(pool: &PgPool, source: &dyn TextSource) -> AppResult<ImportReport> {
    let text = source.fetch().await?;
    let paragraphs = extract_paragraphs(&text);
    let count = paragraphs.len();

    let mut reports = persist_batches(pool, &[pride_batch(paragraphs)]).await?;
    info!("✅ {} paragraphes insérés depuis {}", count, source.describe());

    reports
        .pop()
        .ok_or_else(|| AppError::InternalError("aucun rapport d'import".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAYINGS: &str = "THE BOOK OF WISE SAYINGS\r\n\r\n\
1.\r\n\r\nHe that is slow to anger is better than the mighty.\r\n_Proverbs_\r\n\r\n\
2.\r\n\r\nA soft answer turneth away wrath;\r\nbut grievous words stir up anger.  _Solomon_\r\n";

    #[test]
    fn sayings_are_extracted_with_author() {
        let items = extract_wise_sayings(SAYINGS).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].entity_id, "quote0");
        assert_eq!(items[0].table_name, WISE_SAYINGS_TABLE);
        assert_eq!(
            items[0].free_text,
            "He that is slow to anger is better than the mighty. (Proverbs)"
        );

        assert_eq!(items[1].entity_id, "quote1");
        assert_eq!(
            items[1].free_text,
            "A soft answer turneth away wrath;\nbut grievous words stir up anger. (Solomon)"
        );
    }

    #[test]
    fn text_without_sayings_yields_nothing() {
        assert!(extract_wise_sayings("no numbered quotes here").unwrap().is_empty());
    }

    #[test]
    fn paragraphs_come_from_longest_segment() {
        let text = "Header *** START ***\r\n\r\nIt is a truth universally acknowledged.\r\n\r\n\r\n   \r\n\r\nHowever little known the feelings.\r\n\r\n*** END ***license";
        let items = extract_paragraphs(text);

        let texts: Vec<&str> = items.iter().map(|i| i.free_text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "It is a truth universally acknowledged.",
                "However little known the feelings."
            ]
        );
        assert_eq!(items[1].entity_id, "paragraph1");
        assert_eq!(items[1].table_name, PRIDE_TABLE);
    }

    #[test]
    fn longest_segment_is_measured_in_characters() {
        let items = extract_paragraphs("aaaa***ééé");
        let texts: Vec<&str> = items.iter().map(|i| i.free_text.as_str()).collect();
        assert_eq!(texts, vec!["aaaa"]);
    }

    #[test]
    fn first_segment_wins_a_tie() {
        let items = extract_paragraphs("abc***xyz");
        assert_eq!(items[0].free_text, "abc");
    }

    #[test]
    fn three_problems_share_the_same_quotes() {
        let items = extract_wise_sayings(SAYINGS).unwrap();
        let batches = wise_sayings_batches(items.clone());

        assert_eq!(batches.len(), 3);
        for batch in &batches {
            assert_eq!(batch.items, items);
            assert!(batch.validate().is_ok());
        }
        assert_eq!(batches[0].problem.classification_type, ClassificationType::Binary);
        assert_eq!(batches[1].problem.labels.len(), 4);
        assert_eq!(batches[2].problem.classification_type, ClassificationType::MultiClass);
    }

    #[test]
    fn pride_problem_is_binary_example() {
        let batch = pride_batch(Vec::new());
        assert_eq!(batch.problem.name, "Example");
        assert_eq!(batch.problem.classification_type, ClassificationType::Binary);
        assert!(batch.validate().is_ok());
    }
}
