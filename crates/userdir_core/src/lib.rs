//! Paginated, filtered and sorted access to persisted user records.
//!
//! The crate owns the `users` schema and a SQLite adapter; callers build
//! `QueryParam`/`FilterParam` values and hand them to a `UserRepository`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::user::{UserDetails, UserId, UserValidationError};
pub use query::{FilterParam, QueryParam, QueryParamError, DEFAULT_SORT_PROPERTY};
pub use repo::error::{RepoError, RepoResult};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};

/// Minimal health-check API for linkage checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
