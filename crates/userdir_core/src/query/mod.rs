//! Page and filter value objects passed into repository queries.
//!
//! # Responsibility
//! - Describe one offset-based page request (`QueryParam`).
//! - Describe one single-field match (`FilterParam`).
//!
//! # Invariants
//! - A `QueryParam` always has `first >= 0` and `count > 0`.
//! - Both types are immutable once built; combinators return new values.
//! - Field names are not checked here; storage adapters resolve them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sort field used when the caller does not name one.
pub const DEFAULT_SORT_PROPERTY: &str = "id";

/// Rejected page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParamError {
    NegativeOffset(i64),
    NonPositiveCount(i64),
}

impl Display for QueryParamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeOffset(first) => write!(f, "page offset must be >= 0, got {first}"),
            Self::NonPositiveCount(count) => write!(f, "page size must be > 0, got {count}"),
        }
    }
}

impl Error for QueryParamError {}

/// One page request: skip `first` rows, return at most `count`, ordered by
/// `property`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQueryParam", into = "RawQueryParam")]
pub struct QueryParam {
    first: i64,
    count: i64,
    property: Option<String>,
    ascending: bool,
}

impl QueryParam {
    /// Creates an ascending page ordered by the identifier.
    ///
    /// # Errors
    /// - `NegativeOffset` when `first < 0`.
    /// - `NonPositiveCount` when `count <= 0`.
    pub fn new(first: i64, count: i64) -> Result<Self, QueryParamError> {
        if first < 0 {
            return Err(QueryParamError::NegativeOffset(first));
        }
        if count <= 0 {
            return Err(QueryParamError::NonPositiveCount(count));
        }
        Ok(Self {
            first,
            count,
            property: None,
            ascending: true,
        })
    }

    /// Page covering every row, ascending by identifier.
    pub fn all() -> Self {
        Self {
            first: 0,
            count: i64::MAX,
            property: None,
            ascending: true,
        }
    }

    /// Returns a copy ordered by `property` in the given direction.
    ///
    /// An empty `property` falls back to the identifier.
    pub fn sorted_by(self, property: impl Into<String>, ascending: bool) -> Self {
        let property = property.into();
        Self {
            property: (!property.is_empty()).then_some(property),
            ascending,
            ..self
        }
    }

    pub fn first(&self) -> i64 {
        self.first
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Effective sort field, `id` when none was requested.
    pub fn property(&self) -> &str {
        self.property.as_deref().unwrap_or(DEFAULT_SORT_PROPERTY)
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }
}

/// Wire shape of `QueryParam`; deserialization goes through the same checks
/// as `QueryParam::new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQueryParam {
    first: i64,
    count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    property: Option<String>,
    #[serde(default = "default_ascending")]
    ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl TryFrom<RawQueryParam> for QueryParam {
    type Error = QueryParamError;

    fn try_from(raw: RawQueryParam) -> Result<Self, Self::Error> {
        let page = Self::new(raw.first, raw.count)?;
        Ok(match raw.property {
            Some(property) => page.sorted_by(property, raw.ascending),
            None => Self {
                ascending: raw.ascending,
                ..page
            },
        })
    }
}

impl From<QueryParam> for RawQueryParam {
    fn from(page: QueryParam) -> Self {
        Self {
            first: page.first,
            count: page.count,
            property: page.property,
            ascending: page.ascending,
        }
    }
}

/// A single-field match: `field` compared against `value`.
///
/// For string values repositories apply a case-insensitive substring match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParam<T> {
    field: String,
    value: T,
}

impl<T> FilterParam<T> {
    pub fn new(field: impl Into<String>, value: T) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }

    /// Attribute to filter by.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Literal value to match against.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_parts(self) -> (String, T) {
        (self.field, self.value)
    }
}

impl FilterParam<String> {
    /// An empty value matches everything, so callers treat it as no filter.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

/// Returns the filter when it actually restricts rows.
pub(crate) fn effective_filter(
    filter: Option<&FilterParam<String>>,
) -> Option<&FilterParam<String>> {
    filter.filter(|filter| !filter.is_blank())
}
