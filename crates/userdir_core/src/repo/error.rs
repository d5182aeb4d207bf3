//! Repository error type shared by user queries and writes.

use crate::db::DbError;
use crate::model::user::UserValidationError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by user repository operations.
///
/// A lookup that matches nothing is `Ok(None)`, not an error.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    /// Unique or NOT NULL constraint rejected a write; nothing was stored.
    ConstraintViolation(String),
    /// Sort or filter field is not an attribute of the user record.
    InvalidField(String),
    /// A lookup on a unique attribute matched more than one row.
    NonUniqueResult {
        field: &'static str,
        matches: usize,
    },
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Connection or transaction failure; never retried here.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::InvalidField(field) => write!(f, "unknown user field `{field}`"),
            Self::NonUniqueResult { field, matches } => {
                write!(f, "expected at most one user by {field}, found {matches}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(message.unwrap_or_else(|| failure.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}
