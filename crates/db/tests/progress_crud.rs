//! Repository-level tests for the progress satellites.

use fixgo_db::models::lesson::CreateLesson;
use fixgo_db::models::level::CreateLevel;
use fixgo_db::models::module::CreateModule;
use fixgo_db::models::user::CreateUser;
use fixgo_db::repositories::{LessonRepo, LevelRepo, ModuleRepo, PaymentRepo, ProgressRepo, UserRepo};
use sqlx::PgPool;

async fn seed(pool: &PgPool) -> (i64, i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: "repo@test.mx".to_string(),
            password_hash: "hash".to_string(),
            display_name: "Repo".to_string(),
            country: None,
        },
    )
    .await
    .unwrap();
    let module = ModuleRepo::create(
        pool,
        &CreateModule {
            title: "M".to_string(),
            description: None,
            sort_order: 1,
        },
    )
    .await
    .unwrap();
    let level = LevelRepo::create(
        pool,
        &CreateLevel {
            module_id: module.id,
            title: "L".to_string(),
            sort_order: 1,
        },
    )
    .await
    .unwrap();
    let lesson = LessonRepo::create(
        pool,
        &CreateLesson {
            level_id: level.id,
            title: "Lx".to_string(),
            sort_order: 1,
            content: vec![],
        },
    )
    .await
    .unwrap();
    (user.id, level.id, lesson.id)
}

/// The correctness accumulator deduplicates question ids and leaves the
/// pass error flag untouched.
#[sqlx::test(migrations = "../../db/migrations")]
async fn accumulator_deduplicates(pool: PgPool) {
    let (user_id, level_id, lesson_id) = seed(&pool).await;

    ProgressRepo::record_incorrect_answer(&pool, user_id, level_id, lesson_id)
        .await
        .unwrap();

    for _ in 0..3 {
        ProgressRepo::record_correct_answer(&pool, user_id, level_id, lesson_id, "q1")
            .await
            .unwrap();
    }
    let row = ProgressRepo::record_correct_answer(&pool, user_id, level_id, lesson_id, "q2")
        .await
        .unwrap();

    assert_eq!(row.correctly_answered.0, vec!["q1", "q2"]);
    assert!(row.pass_had_errors, "earlier error must be preserved");
}

/// Finishing a lesson bumps attempts, writes the ledger, and resets the
/// transient pass state.
#[sqlx::test(migrations = "../../db/migrations")]
async fn finish_lesson_resets_pass_state(pool: PgPool) {
    let (user_id, level_id, lesson_id) = seed(&pool).await;

    ProgressRepo::record_incorrect_answer(&pool, user_id, level_id, lesson_id)
        .await
        .unwrap();
    ProgressRepo::record_correct_answer(&pool, user_id, level_id, lesson_id, "q1")
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    ProgressRepo::finish_lesson(&mut *tx, user_id, level_id, lesson_id, 1, true)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let row = ProgressRepo::get_for_lesson(&pool, user_id, lesson_id)
        .await
        .unwrap()
        .expect("ledger row should exist");
    assert_eq!(row.attempts, 1);
    assert_eq!(row.last_score, 1);
    assert!(row.had_errors, "ledger keeps the pass outcome");
    assert!(row.correctly_answered.0.is_empty());
    assert!(!row.pass_had_errors, "pass flag resets for the next pass");
}

/// Completed levels and modules have set semantics.
#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_sets_are_idempotent(pool: PgPool) {
    let (user_id, level_id, _lesson_id) = seed(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    ProgressRepo::record_completed_level(&mut *tx, user_id, level_id)
        .await
        .unwrap();
    ProgressRepo::record_completed_level(&mut *tx, user_id, level_id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let levels = ProgressRepo::list_completed_levels(&pool, user_id)
        .await
        .unwrap();
    assert_eq!(levels, vec![level_id]);
}

/// Adiamantada flags are unique per (user, key).
#[sqlx::test(migrations = "../../db/migrations")]
async fn adiamantadas_insert_once(pool: PgPool) {
    let (user_id, level_id, _lesson_id) = seed(&pool).await;
    let keys = vec![format!("nivel-{level_id}"), format!("nivel-{level_id}")];

    let mut tx = pool.begin().await.unwrap();
    ProgressRepo::insert_adiamantadas(&mut *tx, user_id, &keys)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let stored = ProgressRepo::list_adiamantada_keys(&pool, user_id)
        .await
        .unwrap();
    assert_eq!(stored, vec![format!("nivel-{level_id}")]);
}

/// Webhook events record once; duplicates are reported.
#[sqlx::test(migrations = "../../db/migrations")]
async fn payment_events_deduplicate(pool: PgPool) {
    assert!(PaymentRepo::try_record_event(&pool, "evt_1", "checkout.session.completed")
        .await
        .unwrap());
    assert!(!PaymentRepo::try_record_event(&pool, "evt_1", "checkout.session.completed")
        .await
        .unwrap());
}
