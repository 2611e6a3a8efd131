//! Repository for the `users` table.
//!
//! Currency and XP writes are additive increments, never absolute
//! overwrites: the completion engine and the payment webhook both credit
//! `tuerquitas` independently and must compose.

use fixgo_core::lives::MAX_LIVES;
use fixgo_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, User, SUBSCRIPTION_ACTIVE};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, display_name, country, role, lives, \
                       next_life_recovery_at, tuerquitas, xp, subscription_status, \
                       subscription_plan, created_at, updated_at";

/// Provides CRUD and progress-scalar operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with the registration defaults, returning the row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, display_name, country)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.display_name)
            .bind(&input.country)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Lock and fetch a user row inside a transaction.
    ///
    /// The completion engine takes this row lock for the whole
    /// read-compute-write sequence so concurrent completions serialize
    /// instead of silently overwriting each other.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Persist a new life count and recovery schedule in one statement.
    pub async fn set_life_state(
        pool: &PgPool,
        id: DbId,
        lives: i32,
        next_life_recovery_at: Option<Timestamp>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET lives = $2, next_life_recovery_at = $3 WHERE id = $1")
            .bind(id)
            .bind(lives)
            .bind(next_life_recovery_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Apply completion rewards as additive increments (transactional).
    pub async fn apply_rewards(
        conn: &mut PgConnection,
        id: DbId,
        xp_delta: i32,
        tuerquitas_delta: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET xp = xp + $2, tuerquitas = tuerquitas + $3 WHERE id = $1")
            .bind(id)
            .bind(xp_delta)
            .bind(tuerquitas_delta)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Credit purchased tuerquitas (webhook path). Additive increment.
    pub async fn credit_tuerquitas(
        pool: &PgPool,
        id: DbId,
        amount: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET tuerquitas = tuerquitas + $2 WHERE id = $1")
            .bind(id)
            .bind(amount)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Activate a subscription plan for the user (webhook path).
    pub async fn activate_subscription(
        pool: &PgPool,
        id: DbId,
        plan: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET subscription_status = $2, subscription_plan = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(SUBSCRIPTION_ACTIVE)
        .bind(plan)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Spend tuerquitas to refill lives to the maximum.
    ///
    /// The spend and the refill are one conditional statement, so the
    /// balance can never go negative. Returns the updated row, or `None`
    /// when the balance was insufficient.
    pub async fn purchase_life_refill(
        pool: &PgPool,
        id: DbId,
        cost: i32,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                tuerquitas = tuerquitas - $2,
                lives = $3,
                next_life_recovery_at = NULL
             WHERE id = $1 AND tuerquitas >= $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(cost)
            .bind(MAX_LIVES)
            .fetch_optional(pool)
            .await
    }
}
