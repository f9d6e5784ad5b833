//! Ordered strategies linking actual records to an entry.
//!
//! A strategy answers `None` when it has no record linked to the entry at
//! all, and `Some(total)` (possibly zero) once it does. The first strategy
//! answering `Some` decides the actual amount of the entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{ActualSources, ActualTransaction, RealBudgetItem};
use crate::entry::Entry;

/// One way of linking actual records to an entry.
pub trait ActualMatcher: Send + Sync {
    /// Stable strategy name.
    fn name(&self) -> &'static str;

    /// Realized amount in `[start, end)`, or `None` when nothing links the
    /// entry to this source.
    fn matched_amount(
        &self,
        entry: &Entry,
        start: NaiveDate,
        end: NaiveDate,
        sources: &ActualSources,
    ) -> Option<Decimal>;
}

/// Realized amount already attached to the entry, booked in the period
/// holding the entry's start date.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachedRealAmount;

impl ActualMatcher for AttachedRealAmount {
    fn name(&self) -> &'static str {
        "attached_real_amount"
    }

    fn matched_amount(
        &self,
        entry: &Entry,
        start: NaiveDate,
        end: NaiveDate,
        _sources: &ActualSources,
    ) -> Option<Decimal> {
        let amount = entry.real_amount?;
        let in_period = entry.start_date.is_some_and(|d| d >= start && d < end);
        Some(if in_period { amount } else { Decimal::ZERO })
    }
}

/// Collections of `items` dated in `[start, end)`, or `None` when `items` is
/// empty.
///
/// The end stays exclusive like every other period test, so a collection
/// dated on a boundary is counted once, in the period that starts there.
fn sum_items<'a>(
    items: impl Iterator<Item = &'a RealBudgetItem>,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<Decimal> {
    let mut matched = false;
    let mut total = Decimal::ZERO;
    for item in items {
        matched = true;
        if item.collection_date >= start && item.collection_date < end {
            total = total.saturating_add(item.collection_amount);
        }
    }
    matched.then_some(total)
}

/// Budget-line collections whose key equals the entry's budget key, dated in
/// `[start, end)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealBudgetItemExact;

impl ActualMatcher for RealBudgetItemExact {
    fn name(&self) -> &'static str {
        "real_budget_item_exact"
    }

    fn matched_amount(
        &self,
        entry: &Entry,
        start: NaiveDate,
        end: NaiveDate,
        sources: &ActualSources,
    ) -> Option<Decimal> {
        let budget_id = entry.budget_id.as_ref()?;
        sum_items(
            sources
                .real_budget_items
                .iter()
                .filter(|item| &item.budget_id == budget_id),
            start,
            end,
        )
    }
}

/// Budget-line collections whose key has the same integer value as the
/// entry's budget key (`"42"` and `"0042"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RealBudgetItemNumeric;

impl ActualMatcher for RealBudgetItemNumeric {
    fn name(&self) -> &'static str {
        "real_budget_item_numeric"
    }

    fn matched_amount(
        &self,
        entry: &Entry,
        start: NaiveDate,
        end: NaiveDate,
        sources: &ActualSources,
    ) -> Option<Decimal> {
        let key = entry.budget_id.as_ref()?.numeric_value()?;
        sum_items(
            sources
                .real_budget_items
                .iter()
                .filter(|item| item.budget_id.numeric_value() == Some(key)),
            start,
            end,
        )
    }
}

/// Collections fetched from the collection API and attached to the entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionData;

impl ActualMatcher for CollectionData {
    fn name(&self) -> &'static str {
        "collection_data"
    }

    fn matched_amount(
        &self,
        entry: &Entry,
        start: NaiveDate,
        end: NaiveDate,
        _sources: &ActualSources,
    ) -> Option<Decimal> {
        if entry.collections.is_empty() {
            return None;
        }
        Some(
            entry
                .collections
                .iter()
                .filter(|c| c.date >= start && c.date < end)
                .fold(Decimal::ZERO, |total, c| total.saturating_add(c.amount)),
        )
    }
}

/// Payments of transactions that reference the entry. A VAT child with no
/// transaction of its own uses its parent's.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionPayments;

impl TransactionPayments {
    fn linked<'a>(
        transactions: &'a [ActualTransaction],
        entry: &Entry,
    ) -> Vec<&'a ActualTransaction> {
        let own: Vec<_> = transactions
            .iter()
            .filter(|tx| tx.budget_id.as_ref() == Some(&entry.id))
            .collect();
        match entry.parent_id() {
            Some(parent) if own.is_empty() => transactions
                .iter()
                .filter(|tx| tx.budget_id.as_ref() == Some(parent))
                .collect(),
            _ => own,
        }
    }
}

impl ActualMatcher for TransactionPayments {
    fn name(&self) -> &'static str {
        "transaction_payments"
    }

    fn matched_amount(
        &self,
        entry: &Entry,
        start: NaiveDate,
        end: NaiveDate,
        sources: &ActualSources,
    ) -> Option<Decimal> {
        let linked = Self::linked(&sources.transactions, entry);
        if linked.is_empty() {
            return None;
        }
        Some(
            linked
                .iter()
                .map(|tx| tx.paid_between(start, end))
                .fold(Decimal::ZERO, Decimal::saturating_add),
        )
    }
}

/// Strategies in priority order.
pub const DEFAULT_MATCHERS: &[&dyn ActualMatcher] = &[
    &AttachedRealAmount,
    &RealBudgetItemExact,
    &RealBudgetItemNumeric,
    &CollectionData,
    &TransactionPayments,
];
