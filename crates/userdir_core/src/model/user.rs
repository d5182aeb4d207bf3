//! User domain model.
//!
//! # Responsibility
//! - Define the persisted user record queried by the repository layer.
//! - Validate user-supplied fields before they reach storage.
//!
//! # Invariants
//! - `id` is `None` until storage assigns it on insert, then never changes.
//! - `name` and `email` are unique ignoring case (enforced by schema).
//! - `email` has exactly one `@` separating non-blank parts.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned numeric identifier of a user row.
pub type UserId = i64;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern should compile"));

/// Validation failures raised before a user is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    InvalidEmail(String),
    EmptyFullName,
    /// The entity already carries a storage identifier.
    AlreadyPersisted(UserId),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name cannot be blank"),
            Self::EmptyEmail => write!(f, "user email cannot be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::EmptyFullName => write!(f, "full name cannot be blank when present"),
            Self::AlreadyPersisted(id) => write!(f, "user already persisted with id {id}"),
        }
    }
}

impl Error for UserValidationError {}

/// Persisted user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    /// Assigned by storage on insert.
    pub id: Option<UserId>,
    /// Login name, unique ignoring case.
    pub name: String,
    /// Contact address, unique ignoring case.
    pub email: String,
    pub full_name: Option<String>,
    /// Unix epoch milliseconds, filled in by storage.
    pub created_at: Option<i64>,
}

impl UserDetails {
    /// Creates an unsaved user with no optional attributes.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            full_name: None,
            created_at: None,
        }
    }

    /// Sets the display name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Returns whether storage has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks field-level invariants.
    ///
    /// Uniqueness is not checked here; it belongs to the storage schema.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }
        if matches!(self.full_name.as_deref(), Some(value) if value.trim().is_empty()) {
            return Err(UserValidationError::EmptyFullName);
        }
        Ok(())
    }
}
