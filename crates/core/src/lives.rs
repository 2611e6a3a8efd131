//! Life regeneration clock.
//!
//! Lost lives come back one per fixed interval. The schedule is anchored to
//! an absolute instant (`next_recovery_at`), so recomputing recovery from
//! the same inputs is idempotent: a failed write is healed by the next poll
//! tick rather than retried.
//!
//! Scheduling rules:
//! - The timer starts on the first loss of a cycle (lives were full, or no
//!   timer was running). Further losses within the cycle neither reset nor
//!   stack it.
//! - Recovery counts whole elapsed intervals since the scheduled instant
//!   (the instant itself counts as one), capped at the missing lives.
//! - Reaching full lives clears the schedule; otherwise the anchor advances
//!   by exactly the recovered intervals.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum lives a user can hold.
pub const MAX_LIVES: i32 = 5;

/// Minutes between regenerated lives.
pub const RECOVERY_INTERVAL_MINS: i64 = 30;

/// The regeneration interval as a [`Duration`].
pub fn recovery_interval() -> Duration {
    Duration::minutes(RECOVERY_INTERVAL_MINS)
}

/// Snapshot of a user's life fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeState {
    pub lives: i32,
    /// When the next life regenerates; `None` while lives are full or no
    /// loss has started the clock.
    pub next_recovery_at: Option<Timestamp>,
}

/// Result of applying one life loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeLoss {
    pub lives: i32,
    pub next_recovery_at: Option<Timestamp>,
    /// True when this loss started a new regeneration cycle.
    pub schedule_started: bool,
}

/// Result of a recovery check that recovered at least one life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeRecovery {
    pub recovered: i32,
    pub lives: i32,
    pub next_recovery_at: Option<Timestamp>,
}

/// Apply one life loss at `now`.
///
/// Precondition: `lives > 0`. Violations are a flow error on the caller's
/// side and come back as [`CoreError::Validation`] with no state change.
pub fn apply_loss(state: &LifeState, now: Timestamp) -> Result<LifeLoss, CoreError> {
    if state.lives <= 0 {
        return Err(CoreError::Validation("No lives left to lose".into()));
    }

    let previous_lives = state.lives;
    let lives = previous_lives - 1;

    // Start the clock only on the first loss of a cycle. An existing
    // schedule is never reset by further losses.
    let starts_cycle =
        lives < MAX_LIVES && (previous_lives == MAX_LIVES || state.next_recovery_at.is_none());

    if starts_cycle {
        Ok(LifeLoss {
            lives,
            next_recovery_at: Some(now + recovery_interval()),
            schedule_started: true,
        })
    } else {
        Ok(LifeLoss {
            lives,
            next_recovery_at: state.next_recovery_at,
            schedule_started: false,
        })
    }
}

/// Check whether any lives have regenerated by `now`.
///
/// Returns `None` when there is nothing to do: lives already full, no
/// schedule running, or the scheduled instant has not arrived yet.
pub fn check_recovery(state: &LifeState, now: Timestamp) -> Option<LifeRecovery> {
    if state.lives >= MAX_LIVES {
        return None;
    }
    let scheduled = state.next_recovery_at?;
    if now < scheduled {
        return None;
    }

    // Whole intervals elapsed since the anchor; the anchor itself counts.
    let elapsed = now - scheduled;
    let intervals = elapsed.num_milliseconds() / recovery_interval().num_milliseconds() + 1;
    let missing = i64::from(MAX_LIVES - state.lives);
    let recovered = intervals.min(missing) as i32;

    let lives = state.lives + recovered;
    let next_recovery_at = if lives >= MAX_LIVES {
        None
    } else {
        Some(scheduled + recovery_interval() * recovered)
    };

    Some(LifeRecovery {
        recovered,
        lives,
        next_recovery_at,
    })
}

/// Remaining wait rendered as `m:ss`, clamped at `0:00`.
pub fn countdown(next_recovery_at: Timestamp, now: Timestamp) -> String {
    let remaining = (next_recovery_at - now).max(Duration::zero());
    let total_secs = remaining.num_seconds();
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
