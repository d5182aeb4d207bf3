//! Mapping from public field names to `users` columns.
//!
//! Sort and filter names arrive as caller strings; only names resolved here
//! ever reach SQL text. Field names are matched ignoring ASCII case, with
//! camelCase aliases.

use crate::repo::error::{RepoError, RepoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserField {
    Id,
    Name,
    Email,
    FullName,
    CreatedAt,
}

impl UserField {
    pub(crate) fn resolve(name: &str) -> RepoResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "full_name" | "fullname" => Ok(Self::FullName),
            "created_at" | "createdat" => Ok(Self::CreatedAt),
            _ => Err(RepoError::InvalidField(name.to_string())),
        }
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::FullName => "full_name",
            Self::CreatedAt => "created_at",
        }
    }

    /// `ORDER BY` clause for this field.
    ///
    /// Text keys sort by byte order regardless of the column's declared
    /// collation. Ties fall back to `id` in the same direction.
    pub(crate) fn order_clause(self, ascending: bool) -> String {
        let dir = if ascending { "ASC" } else { "DESC" };
        match self {
            Self::Id => format!("ORDER BY id {dir}"),
            Self::Name | Self::Email | Self::FullName => {
                format!("ORDER BY {} COLLATE BINARY {dir}, id {dir}", self.column())
            }
            Self::CreatedAt => format!("ORDER BY created_at {dir}, id {dir}"),
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Email | Self::FullName)
    }

    /// `WHERE` predicate matching a bound LIKE pattern, ignoring case for
    /// text columns.
    pub(crate) fn contains_predicate(self) -> String {
        if self.is_text() {
            format!("casefold({}) LIKE casefold(?) ESCAPE '\\'", self.column())
        } else {
            format!("{} LIKE ? ESCAPE '\\'", self.column())
        }
    }

    /// `WHERE` predicate for a case-insensitive exact match on `?1`.
    pub(crate) fn equals_ignore_case_predicate(self) -> String {
        format!("casefold({}) = casefold(?1)", self.column())
    }
}

/// Wraps `value` as a LIKE pattern matching it anywhere, with `%`, `_` and
/// `\` taken literally.
pub(crate) fn like_contains(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
