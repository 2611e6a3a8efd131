pub mod auth;
pub mod lessons;
pub mod levels;
pub mod modules;
pub mod play;
pub mod store;
pub mod users;
pub mod webhooks;
