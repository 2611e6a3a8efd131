//! Role names stored in `users.role` and embedded in JWT claims.

/// Administrators manage the module/level/lesson catalog.
pub const ROLE_ADMIN: &str = "admin";

/// Regular learners.
pub const ROLE_USER: &str = "user";
