//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the paginated user data-access contract.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Repository writes must enforce `UserDetails::validate()` before persistence.
//! - Missing rows are `Ok(None)`; errors are reserved for failures.

pub mod error;
mod fields;
pub mod user_repo;
