//! Life persistence around the core regeneration math.
//!
//! All computation is absolute-time-based ([`fixgo_core::lives`]), so a
//! failed write is healed by the next invocation recomputing the same
//! result; nothing here retries.

use chrono::Utc;
use fixgo_core::lives::{self, LifeState, MAX_LIVES};
use fixgo_db::models::user::User;
use fixgo_db::repositories::UserRepo;
use fixgo_db::DbPool;
use serde::Serialize;

use crate::error::AppResult;

/// Snapshot returned by the lives endpoints.
#[derive(Debug, Serialize)]
pub struct LivesStatus {
    pub lives: i32,
    pub max_lives: i32,
    pub next_life_recovery_at: Option<fixgo_core::types::Timestamp>,
    /// Remaining wait as `m:ss`, present while a recovery is scheduled.
    pub recovery_countdown: Option<String>,
}

impl LivesStatus {
    fn from_state(state: LifeState, now: fixgo_core::types::Timestamp) -> Self {
        LivesStatus {
            lives: state.lives,
            max_lives: MAX_LIVES,
            next_life_recovery_at: state.next_recovery_at,
            recovery_countdown: state
                .next_recovery_at
                .map(|at| lives::countdown(at, now)),
        }
    }
}

/// Recover any lives due since the scheduled instant, persisting the result.
///
/// Safe to call on every poll: with no elapsed intervals it is a no-op.
pub async fn check_and_recover(pool: &DbPool, user: &User) -> AppResult<LivesStatus> {
    let now = Utc::now();
    let state = LifeState {
        lives: user.lives,
        next_recovery_at: user.next_life_recovery_at,
    };

    match lives::check_recovery(&state, now) {
        Some(recovery) => {
            UserRepo::set_life_state(pool, user.id, recovery.lives, recovery.next_recovery_at)
                .await?;
            tracing::info!(
                user_id = user.id,
                recovered = recovery.recovered,
                lives = recovery.lives,
                "Recovered lives",
            );
            Ok(LivesStatus::from_state(
                LifeState {
                    lives: recovery.lives,
                    next_recovery_at: recovery.next_recovery_at,
                },
                now,
            ))
        }
        None => Ok(LivesStatus::from_state(state, now)),
    }
}

/// Apply one life loss for an incorrect answer, persisting the result.
///
/// Returns the resulting state. Two cases deliberately leave the state
/// untouched:
/// - an active subscription (infinite lives) suppresses the loss;
/// - no lives left is a flow error on the client side: logged, no write.
pub async fn lose_life(pool: &DbPool, user: &User) -> AppResult<LifeState> {
    let state = LifeState {
        lives: user.lives,
        next_recovery_at: user.next_life_recovery_at,
    };

    if user.has_active_subscription() {
        tracing::debug!(user_id = user.id, "Subscriber life loss suppressed");
        return Ok(state);
    }

    let now = Utc::now();
    match lives::apply_loss(&state, now) {
        Ok(loss) => {
            UserRepo::set_life_state(pool, user.id, loss.lives, loss.next_recovery_at).await?;
            if loss.schedule_started {
                tracing::info!(
                    user_id = user.id,
                    lives = loss.lives,
                    next_recovery_at = ?loss.next_recovery_at,
                    "Life lost, recovery clock started",
                );
            }
            Ok(LifeState {
                lives: loss.lives,
                next_recovery_at: loss.next_recovery_at,
            })
        }
        Err(err) => {
            // Precondition failure (no lives to lose): logged, no state change.
            tracing::warn!(user_id = user.id, error = %err, "Life loss skipped");
            Ok(state)
        }
    }
}
