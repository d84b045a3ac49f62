//! Schéma relationnel de l'outil d'annotation.
//!
//! Les tables sont créées directement depuis les définitions ci-dessous, puis
//! l'historique des migrations est "tamponné" à la dernière révision sans
//! rejouer les migrations intermédiaires.

use sqlx::PgPool;
use tracing::info;

use crate::infrastructure::error::AppResult;

/// Dernière révision du schéma
pub const MIGRATION_HEAD: &str = "20240301_label_events";

/// Extension fournissant `uuid_generate_v4()`
const CREATE_EXTENSION: &str = r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#;

/// Définitions des tables, dans l'ordre des dépendances
pub const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            username VARCHAR(64) NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "problems",
        r#"
        CREATE TABLE IF NOT EXISTS problems (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            name TEXT NOT NULL,
            classification_type VARCHAR(32) NOT NULL DEFAULT 'binary'
                CHECK (classification_type IN ('binary', 'multi-label', 'multi-class')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "problem_labels",
        r#"
        CREATE TABLE IF NOT EXISTS problem_labels (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            problem_id UUID NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
            label TEXT NOT NULL,
            order_index INTEGER NOT NULL,
            UNIQUE (problem_id, order_index)
        )
        "#,
    ),
    (
        "datasets",
        r#"
        CREATE TABLE IF NOT EXISTS datasets (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            table_name TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            free_text TEXT NOT NULL,
            problem_id UUID NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
            UNIQUE (problem_id, table_name, entity_id)
        )
        "#,
    ),
    (
        "user_problems",
        r#"
        CREATE TABLE IF NOT EXISTS user_problems (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            problem_id UUID NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
            UNIQUE (user_id, problem_id)
        )
        "#,
    ),
    (
        "label_events",
        r#"
        CREATE TABLE IF NOT EXISTS label_events (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            dataset_id UUID NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
            label TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "schema_migrations",
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version VARCHAR(64) PRIMARY KEY,
            stamped_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_datasets_provenance ON datasets (table_name, entity_id)",
    "CREATE INDEX IF NOT EXISTS idx_label_events_dataset ON label_events (dataset_id, user_id)",
];

/// Crée l'extension, toutes les tables, et tamponne l'historique des
/// migrations à `MIGRATION_HEAD`.
pub async fn create_tables(pool: &PgPool) -> AppResult<()> {
    info!("🧱 Création des tables...");

    sqlx::query(CREATE_EXTENSION).execute(pool).await?;

    let mut tx = pool.begin().await?;
    for (name, ddl) in TABLES {
        sqlx::query(ddl).execute(&mut *tx).await?;
        info!(table = %name, "table prête");
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    stamp_head(pool).await?;

    info!("✅ Tables créées, migrations tamponnées à {}", MIGRATION_HEAD);
    Ok(())
}

/// Marque l'historique des migrations comme entièrement appliqué
pub async fn stamp_head(pool: &PgPool) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM schema_migrations")
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO schema_migrations (version) VALUES ($1)")
        .bind(MIGRATION_HEAD)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Révision actuellement tamponnée, si le schéma a été initialisé
pub async fn current_revision(pool: &PgPool) -> AppResult<Option<String>> {
    let version = sqlx::query_scalar::<_, String>(
        "SELECT version FROM schema_migrations ORDER BY stamped_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(version)
}
