//! Typed IDs for type-safe entity references.
//!
//! Identifiers come from upstream records as free-form strings (numeric
//! database keys, composite keys, synthetic suffixed keys), so every ID wraps
//! a `String`. Using typed IDs prevents accidentally matching a `BudgetId`
//! against an `EntryId`.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates an ID from anything string-like.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Interprets the ID as an integer, tolerating padding and a
            /// trailing `.0` (e.g. `"0042"`, `"42.0"`).
            #[must_use]
            pub fn numeric_value(&self) -> Option<i64> {
                let trimmed = self.0.trim();
                let integral = trimmed.strip_suffix(".0").unwrap_or(trimmed);
                integral.parse::<i64>().ok()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

typed_id!(EntryId, "Unique identifier for a budget entry.");
typed_id!(BudgetId, "Identifier linking an entry to realized budget records.");
typed_id!(
    BudgetDetailId,
    "Identifier of the budget detail line an entry was produced from."
);
typed_id!(CategoryId, "Unique identifier for a category.");
typed_id!(TransactionId, "Unique identifier for an actual transaction.");
typed_id!(AccountId, "Unique identifier for a cash account.");
