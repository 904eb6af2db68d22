pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod readiness;

pub use config::CommonConfig;
pub use db::DbClient;
pub use errors::DbError;

/// Result type for the shared database layer
pub type Result<T> = std::result::Result<T, errors::DbError>;
