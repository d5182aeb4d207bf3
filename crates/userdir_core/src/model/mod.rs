//! Domain model for the user directory.
//!
//! # Responsibility
//! - Define the record shape shared by repository and callers.
//!
//! # Invariants
//! - Identity is storage-assigned and immutable once set.

pub mod user;
