//! Réinitialisation d'une base jetable sur le serveur de `DATABASE_URL`.

use sqlx::postgres::PgPoolOptions;
use sqlx::{ConnectOptions, Connection, PgPool};
use uuid::Uuid;

use annotator::{
    core::import::{persist_batches, ImportBatch},
    core::provisioning::add_user,
    domain::problem::{ClassificationType, NewProblem},
    infrastructure::database::lifecycle::{quote_identifier, reset_database_with},
    Database,
};

#[sqlx::test(migrations = false)]
async fn reset_database_then_insert_user_problem_and_label(pool: PgPool) {
    let scratch = format!("annotator_reset_{}", Uuid::new_v4().simple());
    let options = (*pool.connect_options()).clone().database(&scratch);

    // Deux passes: création puis suppression/recréation d'une base existante
    reset_database_with(options.clone()).await.unwrap();
    reset_database_with(options.clone()).await.unwrap();

    let scratch_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options.clone())
        .await
        .unwrap();

    let user = add_user(&scratch_pool, "admin", "admin").await.unwrap();
    let batch = ImportBatch::new(
        NewProblem::with_labels("After reset", ClassificationType::Binary, &["Yes"]),
        Vec::new(),
    );
    let reports = persist_batches(&scratch_pool, &[batch]).await.unwrap();
    let labels = Database::from_pool(scratch_pool.clone())
        .problems()
        .labels(&reports[0].problem_id)
        .await
        .unwrap();

    assert!(user.is_superuser);
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].label, "Yes");

    scratch_pool.close().await;
    let mut admin = options.database("postgres").connect().await.unwrap();
    sqlx::query(&format!("DROP DATABASE IF EXISTS {}", quote_identifier(&scratch)))
        .execute(&mut admin)
        .await
        .unwrap();
    admin.close().await.unwrap();
}
