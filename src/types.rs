//! Common types used throughout anchor-pager
//!
//! This module contains shared type definitions, type aliases,
//! and the sort/filter vocabulary used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Sorting
// ============================================================================

/// Sort direction for a single ordered field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

/// One `(field, direction)` pair of a sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    /// Field to order by
    pub field: String,
    /// Direction to order in
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortEntry {
    /// Ascending order on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending order on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered sort specification. Entries are applied in sequence.
pub type SortSpec = Vec<SortEntry>;

// ============================================================================
// Filtering
// ============================================================================

/// Comparison operator of a filter entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "array-contains")]
    ArrayContains,
    #[serde(rename = "array-contains-any")]
    ArrayContainsAny,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not-in")]
    NotIn,
}

impl FilterOperator {
    /// Symbolic spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::GreaterThanOrEqual => ">=",
            Self::GreaterThan => ">",
            Self::ArrayContains => "array-contains",
            Self::ArrayContainsAny => "array-contains-any",
            Self::In => "in",
            Self::NotIn => "not-in",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessThanOrEqual),
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            ">=" => Ok(Self::GreaterThanOrEqual),
            ">" => Ok(Self::GreaterThan),
            "array-contains" => Ok(Self::ArrayContains),
            "array-contains-any" => Ok(Self::ArrayContainsAny),
            "in" => Ok(Self::In),
            "not-in" => Ok(Self::NotIn),
            other => Err(Error::invalid_value(
                "operator",
                format!("unknown filter operator '{other}'"),
            )),
        }
    }
}

/// One `(field, operator, value)` triple of a filter specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEntry {
    /// Field to compare
    pub field: String,
    /// Comparison operator
    pub operator: FilterOperator,
    /// Value compared against
    pub value: JsonValue,
}

impl FilterEntry {
    /// Create a filter entry
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value)
    }
}

/// Ordered filter specification. Entries are applied in sequence.
pub type FilterSpec = Vec<FilterEntry>;
