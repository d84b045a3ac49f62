use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Décision d'annotation enregistrée (historique append-only)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabelEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dataset_id: Uuid,
    /// `None` enregistre explicitement "aucun label"
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Annotation soumise par un utilisateur
#[derive(Debug, Clone, Deserialize)]
pub struct NewLabelEvent {
    pub label: Option<String>,
}
