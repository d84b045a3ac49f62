use sqlx::PgPool;
use uuid::Uuid;
use chrono::Utc;

use crate::{domain::label_event::LabelEvent, infrastructure::error::AppResult};

/// Historique append-only des annotations
#[derive(Clone)]
pub struct LabelEventRepository {
    pool: PgPool,
}

impl LabelEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enregistre une décision d'annotation
    pub async fn record(
        &self,
        user_id: &Uuid,
        dataset_id: &Uuid,
        label: Option<&str>,
    ) -> AppResult<LabelEvent> {
        let event = sqlx::query_as::<_, LabelEvent>(
            r#"
            INSERT INTO label_events (id, user_id, dataset_id, label, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, dataset_id, label, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(dataset_id)
        .bind(label)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Annotations d'un utilisateur sur un élément, les plus récentes d'abord
    pub async fn list_for_dataset(
        &self,
        user_id: &Uuid,
        dataset_id: &Uuid,
    ) -> AppResult<Vec<LabelEvent>> {
        let events = sqlx::query_as::<_, LabelEvent>(
            r#"
            SELECT id, user_id, dataset_id, label, created_at
            FROM label_events
            WHERE user_id = $1 AND dataset_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(dataset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
