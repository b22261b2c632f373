pub mod api;
pub mod app;
pub mod authz;
pub mod client;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod pages;
pub mod session;
pub mod utils;

// Re-export commonly used items for tests
pub use app::{create_console, create_console_with_store, Console};
pub use config::ConsoleConfig;
pub use errors::{AppError, AppResult};
