use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use chrono::Utc;

use crate::{
    domain::dataset::{Dataset, ExtractedItem},
    domain::problem::{NewProblem, Problem, ProblemLabel},
    infrastructure::error::AppResult,
};

/// Repository pour les problèmes, leurs labels et leurs éléments à annoter
#[derive(Clone)]
pub struct ProblemRepository {
    pool: PgPool,
}

impl ProblemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insère un problème et son jeu de labels
    pub async fn insert_with_labels(
        conn: &mut PgConnection,
        new_problem: &NewProblem,
    ) -> AppResult<(Problem, Vec<ProblemLabel>)> {
        new_problem.validate()?;

        let problem = sqlx::query_as::<_, Problem>(
            r#"
            INSERT INTO problems (id, name, classification_type, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, classification_type, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_problem.name)
        .bind(new_problem.classification_type)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        let mut labels = Vec::with_capacity(new_problem.labels.len());
        for label in &new_problem.labels {
            let inserted = sqlx::query_as::<_, ProblemLabel>(
                r#"
                INSERT INTO problem_labels (id, problem_id, label, order_index)
                VALUES ($1, $2, $3, $4)
                RETURNING id, problem_id, label, order_index
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(problem.id)
            .bind(&label.label)
            .bind(label.order_index)
            .fetch_one(&mut *conn)
            .await?;
            labels.push(inserted);
        }

        Ok((problem, labels))
    }

    /// Insère les éléments extraits, rattachés au problème donné.
    /// Retourne le nombre de lignes insérées.
    pub async fn insert_datasets(
        conn: &mut PgConnection,
        problem_id: &Uuid,
        items: &[ExtractedItem],
    ) -> AppResult<u64> {
        let mut inserted = 0;
        for item in items {
            let result = sqlx::query(
                r#"
                INSERT INTO datasets (id, table_name, entity_id, free_text, problem_id)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&item.table_name)
            .bind(&item.entity_id)
            .bind(&item.free_text)
            .bind(problem_id)
            .execute(&mut *conn)
            .await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Vérifie l'existence d'un problème
    pub async fn exists(conn: &mut PgConnection, problem_id: &Uuid) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM problems WHERE id = $1)",
        )
        .bind(problem_id)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    /// Récupère un problème par son ID
    pub async fn get_by_id(&self, problem_id: &Uuid) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(
            "SELECT id, name, classification_type, created_at FROM problems WHERE id = $1",
        )
        .bind(problem_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(problem)
    }

    /// Labels d'un problème, dans l'ordre d'affichage
    pub async fn labels(&self, problem_id: &Uuid) -> AppResult<Vec<ProblemLabel>> {
        let labels = sqlx::query_as::<_, ProblemLabel>(
            r#"
            SELECT id, problem_id, label, order_index
            FROM problem_labels
            WHERE problem_id = $1
            ORDER BY order_index
            "#,
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(labels)
    }

    /// Éléments d'un problème, dans l'ordre des identifiants de source
    pub async fn datasets(&self, problem_id: &Uuid) -> AppResult<Vec<Dataset>> {
        let datasets = sqlx::query_as::<_, Dataset>(
            r#"
            SELECT id, table_name, entity_id, free_text, problem_id
            FROM datasets
            WHERE problem_id = $1
            ORDER BY table_name, entity_id
            "#,
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(datasets)
    }

    /// Récupère un élément s'il appartient bien au problème
    pub async fn get_dataset(
        &self,
        problem_id: &Uuid,
        dataset_id: &Uuid,
    ) -> AppResult<Option<Dataset>> {
        let dataset = sqlx::query_as::<_, Dataset>(
            r#"
            SELECT id, table_name, entity_id, free_text, problem_id
            FROM datasets
            WHERE id = $1 AND problem_id = $2
            "#,
        )
        .bind(dataset_id)
        .bind(problem_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dataset)
    }
}
