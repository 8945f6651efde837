//! # Value Matchers
//!
//! Small filter abstraction applied lazily to query result streams. Filters
//! run over the values coming out of a query, never over index keys.

use serde::{Deserialize, Serialize};

use crate::ScalarValue;

/// A match predicate over text values.
///
/// Non-text values never match; queries without a filter pass everything
/// through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueMatch {
    /// Exact equality.
    Exact(String),
    /// The value starts with the given part.
    Prefix(String),
    /// The value ends with the given part.
    Suffix(String),
    /// The value contains the given part.
    Contains(String),
}

impl ValueMatch {
    /// Test a single value against this matcher.
    #[must_use]
    pub fn matches(&self, value: &ScalarValue) -> bool {
        let Some(text) = value.as_text() else {
            return false;
        };
        match self {
            Self::Exact(part) => text == part,
            Self::Prefix(part) => text.starts_with(part.as_str()),
            Self::Suffix(part) => text.ends_with(part.as_str()),
            Self::Contains(part) => text.contains(part.as_str()),
        }
    }

    /// Test a value against an optional matcher; `None` accepts everything.
    #[must_use]
    pub fn accepts(filter: Option<&Self>, value: &ScalarValue) -> bool {
        filter.is_none_or(|matcher| matcher.matches(value))
    }
}

// =============================================================================
// TESTS
// =============================================================================
