//! Tests contre une vraie base PostgreSQL (`DATABASE_URL`).

use sqlx::PgPool;
use uuid::Uuid;

use annotator::{
    core::import::atom::{import_atom, AtomVariant},
    core::import::gutenberg::import_fake_data,
    core::import::{persist_batches, ImportBatch},
    core::provisioning::{add_user, create_standard_user},
    domain::dataset::ExtractedItem,
    domain::problem::{ClassificationType, NewProblem},
    infrastructure::database::schema::{create_tables, current_revision, MIGRATION_HEAD},
    infrastructure::sources::StaticSource,
    AppError, Database,
};

const SAYINGS: &str = "1.\n\nHe that is slow to anger is better than the mighty.\n_Proverbs_\n\n\
2.\n\nA soft answer turneth away wrath.\n_Solomon_\n\n\
3.\n\nPride goeth before destruction.\n_Proverbs_\n";

async fn setup(pool: &PgPool) -> Database {
    create_tables(pool).await.unwrap();
    Database::from_pool(pool.clone())
}

#[sqlx::test(migrations = false)]
async fn create_tables_is_idempotent_and_stamped(pool: PgPool) {
    create_tables(&pool).await.unwrap();
    create_tables(&pool).await.unwrap();

    assert_eq!(
        current_revision(&pool).await.unwrap().as_deref(),
        Some(MIGRATION_HEAD)
    );

    let user = add_user(&pool, "admin", "correct-horse").await.unwrap();
    let batch = ImportBatch::new(
        NewProblem::with_labels("Smoke", ClassificationType::Binary, &["Yes"]),
        Vec::new(),
    );
    let reports = persist_batches(&pool, &[batch]).await.unwrap();

    assert!(user.is_superuser);
    assert_eq!(reports[0].inserted, 0);
}

#[sqlx::test(migrations = false)]
async fn fake_data_creates_three_problems_with_all_quotes(pool: PgPool) {
    let db = setup(&pool).await;

    let reports = import_fake_data(&pool, &StaticSource(SAYINGS.to_string()))
        .await
        .unwrap();

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert_eq!(report.inserted, 3);
        let datasets = db.problems().datasets(&report.problem_id).await.unwrap();
        assert_eq!(datasets.len(), 3);
        assert!(datasets.iter().all(|d| d.problem_id == report.problem_id));
    }
}

#[sqlx::test(migrations = false)]
async fn atom_binary_import_keeps_identifiers(pool: PgPool) {
    let db = setup(&pool).await;
    let csv = StaticSource("q1,src,Great quote\nq2,src,Bad quote\n".to_string());

    let report = import_atom(&pool, &csv, AtomVariant::Binary).await.unwrap();
    let problem = db.problems().get_by_id(&report.problem_id).await.unwrap().unwrap();
    let datasets = db.problems().datasets(&problem.id).await.unwrap();

    assert_eq!(problem.classification_type, ClassificationType::Binary);
    assert_eq!(datasets.len(), 2);
    assert_eq!(datasets[0].entity_id, "q1");
    assert_eq!(datasets[1].entity_id, "q2");
    assert!(datasets.iter().all(|d| d.table_name == "src"));
}

#[sqlx::test(migrations = false)]
async fn labels_are_stored_in_display_order(pool: PgPool) {
    let db = setup(&pool).await;
    let batch = ImportBatch::new(
        NewProblem::with_labels(
            "Ordering",
            ClassificationType::MultiClass,
            &["Excellent", "Good", "Okay", "Bad"],
        ),
        vec![ExtractedItem::new("t", "e0", "text")],
    );

    let reports = persist_batches(&pool, &[batch]).await.unwrap();
    let labels = db.problems().labels(&reports[0].problem_id).await.unwrap();

    let indexes: Vec<i32> = labels.iter().map(|l| l.order_index).collect();
    assert_eq!(indexes, vec![1, 2, 3, 4]);
    assert_eq!(labels[0].label, "Excellent");
}

#[sqlx::test(migrations = false)]
async fn duplicate_items_abort_the_whole_import(pool: PgPool) {
    let db = setup(&pool).await;
    let csv = StaticSource("q1,src,one\nq1,src,again\n".to_string());

    let err = import_atom(&pool, &csv, AtomVariant::MultiClass).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM problems")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = false)]
async fn duplicate_username_is_a_conflict(pool: PgPool) {
    setup(&pool).await;

    add_user(&pool, "admin", "correct-horse").await.unwrap();
    let err = add_user(&pool, "admin", "another-pass").await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test(migrations = false)]
async fn standard_user_gets_configured_problems(pool: PgPool) {
    let db = setup(&pool).await;
    let reports = import_fake_data(&pool, &StaticSource(SAYINGS.to_string()))
        .await
        .unwrap();
    let ids = [reports[0].problem_id, reports[2].problem_id];

    let (user, grants) = create_standard_user(&pool, "annotator", "correct-horse", &ids)
        .await
        .unwrap();

    assert!(!user.is_superuser);
    assert_eq!(grants.len(), 2);
    assert_eq!(db.users().grants_for_user(&user.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = false)]
async fn unknown_problem_rolls_back_the_new_user(pool: PgPool) {
    let db = setup(&pool).await;

    let err = create_standard_user(&pool, "annotator", "correct-horse", &[Uuid::new_v4()])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(db.users().get_by_username("annotator").await.unwrap().is_none());
}
