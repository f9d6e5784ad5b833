//! Actual (realized) data sources.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::{BudgetId, CategoryId, EntryId, TransactionId};

use crate::entry::Direction;

/// One settlement of an actual transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionPayment {
    /// Settlement date.
    pub payment_date: NaiveDate,
    /// Settled amount.
    pub paid_amount: Decimal,
}

/// A realized cash movement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActualTransaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Entry this transaction realizes. Upstream calls it `budgetId` but it
    /// holds the entry ID.
    pub budget_id: Option<EntryId>,
    /// Settlements.
    pub payments: Vec<TransactionPayment>,
    /// Category, used by tax base filters.
    pub category_id: Option<CategoryId>,
    /// Cash direction, used by tax base types.
    pub direction: Option<Direction>,
}

impl ActualTransaction {
    /// Sum of settlements dated in `[start, end)`.
    #[must_use]
    pub fn paid_between(&self, start: NaiveDate, end: NaiveDate) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.payment_date >= start && p.payment_date < end)
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.paid_amount))
    }
}

/// A collection recorded against a budget line.
///
/// Takes precedence over transaction payments when it matches an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealBudgetItem {
    /// Budget line this collection belongs to.
    pub budget_id: BudgetId,
    /// Collection date.
    pub collection_date: NaiveDate,
    /// Collected amount.
    pub collection_amount: Decimal,
}

/// Every actual source the reconciler consults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActualSources {
    /// Collections per budget line.
    pub real_budget_items: Vec<RealBudgetItem>,
    /// Transactions and their payments.
    pub transactions: Vec<ActualTransaction>,
}

impl ActualSources {
    /// Creates a source set.
    #[must_use]
    pub fn new(real_budget_items: Vec<RealBudgetItem>, transactions: Vec<ActualTransaction>) -> Self {
        Self {
            real_budget_items,
            transactions,
        }
    }
}
