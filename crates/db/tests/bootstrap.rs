use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    fixgo_db::health_check(&pool).await.unwrap();

    // Verify every table exists and is queryable.
    let tables = [
        "users",
        "modules",
        "levels",
        "lessons",
        "completed_levels",
        "completed_modules",
        "lesson_progress",
        "adiamantadas",
        "payment_events",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The lives CHECK constraint rejects out-of-range values.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lives_range_is_enforced(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, display_name, lives) \
         VALUES ('x@y.z', 'hash', 'X', 6)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "lives above the maximum must be rejected");

    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, display_name, lives) \
         VALUES ('x@y.z', 'hash', 'X', -1)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "negative lives must be rejected");
}
