//! SQL scalar functions registered on every store connection.
//!
//! # Invariants
//! - `casefold` must be registered before migrations run: the unique indexes
//!   on `users` are built from it.
//! - `casefold` is deterministic so SQLite accepts it in index expressions.

use super::DbResult;
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// Name of the Unicode lowercase folding function.
pub const CASEFOLD_FN: &str = "casefold";

/// Registers all store functions on `conn`.
pub fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8
            | FunctionFlags::SQLITE_DETERMINISTIC
            | FunctionFlags::SQLITE_INNOCUOUS,
        casefold,
    )?;
    Ok(())
}

/// Lowercases text with full Unicode mappings; NULL stays NULL and numbers
/// fold to their text form.
fn casefold(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    match ctx.get_raw(0) {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| Some(text.to_lowercase()))
            .map_err(|err| rusqlite::Error::UserFunctionError(Box::new(err))),
        ValueRef::Integer(value) => Ok(Some(value.to_string())),
        ValueRef::Real(value) => Ok(Some(value.to_string())),
        ValueRef::Blob(_) => Err(rusqlite::Error::UserFunctionError(
            "casefold() does not accept blobs".into(),
        )),
    }
}
