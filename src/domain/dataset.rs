use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Un élément textuel à annoter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Dataset {
    pub id: Uuid,
    /// Tag de provenance (corpus source)
    pub table_name: String,
    /// Identifiant dans la source, unique pour un `table_name` donné
    pub entity_id: String,
    pub free_text: String,
    pub problem_id: Uuid,
}

/// Paire `(entity_id, free_text)` produite par un extracteur, avant insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub table_name: String,
    pub entity_id: String,
    pub free_text: String,
}

impl ExtractedItem {
    pub fn new(
        table_name: impl Into<String>,
        entity_id: impl Into<String>,
        free_text: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            entity_id: entity_id.into(),
            free_text: free_text.into(),
        }
    }
}
