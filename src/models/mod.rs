pub mod auth;
pub mod log;
pub mod message;
pub mod user;
