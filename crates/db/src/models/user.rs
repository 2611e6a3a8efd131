//! User entity model and DTOs.

use fixgo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Subscription status value meaning the plan is currently active.
pub const SUBSCRIPTION_ACTIVE: &str = "active";

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub country: Option<String>,
    pub role: String,
    pub lives: i32,
    pub next_life_recovery_at: Option<Timestamp>,
    pub tuerquitas: i32,
    pub xp: i32,
    pub subscription_status: Option<String>,
    pub subscription_plan: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Whether an active subscription suppresses life loss.
    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status.as_deref() == Some(SUBSCRIPTION_ACTIVE)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub country: Option<String>,
    pub role: String,
    pub lives: i32,
    pub tuerquitas: i32,
    pub xp: i32,
    pub subscription_status: Option<String>,
    pub subscription_plan: Option<String>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            country: user.country,
            role: user.role,
            lives: user.lives,
            tuerquitas: user.tuerquitas,
            xp: user.xp,
            subscription_status: user.subscription_status,
            subscription_plan: user.subscription_plan,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user at registration.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub country: Option<String>,
}
