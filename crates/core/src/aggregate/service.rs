//! Aggregation of budget and actual amounts per period.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use treso_shared::types::CategoryId;

use super::types::{CategoryTotals, GeneralTotals, Totals};
use crate::cache::{CacheKey, OperationKind, ResultCache, cached, fingerprint};
use crate::entry::{CategoryCatalog, Direction, Entry};
use crate::frequency::{AmountPolicy, FrequencyResolver};
use crate::period::Period;
use crate::reconcile::{ActualReconciler, ActualSources};

/// Sums resolver and reconciler results over sets of entries.
///
/// Every per-entry amount goes through the result cache, keyed on the
/// entry's contents and, for actuals, on the sources too.
pub struct Aggregator<'a> {
    cache: &'a dyn ResultCache,
    sources: &'a ActualSources,
    sources_fingerprint: u64,
    policy: AmountPolicy,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator resolving budgets under `policy`.
    #[must_use]
    pub fn new(cache: &'a dyn ResultCache, sources: &'a ActualSources, policy: AmountPolicy) -> Self {
        Self {
            cache,
            sources,
            sources_fingerprint: fingerprint(sources),
            policy,
        }
    }

    /// Budget and actual of one entry.
    #[must_use]
    pub fn entry_totals(&self, entry: &Entry, period: &Period) -> Totals {
        Totals::new(self.budget(entry, period), self.actual(entry, period))
    }

    /// Budgeted amount of one entry, cached.
    #[must_use]
    pub fn budget(&self, entry: &Entry, period: &Period) -> Decimal {
        let key = Self::key(OperationKind::Budget { policy: self.policy }, entry, period)
            .with_fingerprint(fingerprint(entry));
        cached(self.cache, key, || {
            FrequencyResolver::amount_for_period(
                entry,
                period.start_date,
                period.end_date,
                self.policy,
            )
        })
    }

    /// Realized amount of one entry, cached.
    #[must_use]
    pub fn actual(&self, entry: &Entry, period: &Period) -> Decimal {
        let key = Self::key(OperationKind::Actual, entry, period)
            .with_fingerprint(fingerprint(&(entry, self.sources_fingerprint)));
        cached(self.cache, key, || {
            ActualReconciler::actual_amount_for_period(
                entry,
                period.start_date,
                period.end_date,
                self.sources,
            )
        })
    }

    /// Totals of a group of entries.
    #[must_use]
    pub fn totals_for_group<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e Entry>,
        period: &Period,
    ) -> Totals {
        entries
            .into_iter()
            .map(|entry| self.entry_totals(entry, period))
            .sum()
    }

    /// Totals per side and main category, sorted by side then category.
    #[must_use]
    pub fn category_totals<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e Entry>,
        catalog: &CategoryCatalog,
        period: &Period,
    ) -> Vec<CategoryTotals> {
        let mut groups: BTreeMap<(Direction, CategoryId), Totals> = BTreeMap::new();
        for entry in entries {
            let main = catalog.main_category(&entry.category);
            *groups.entry((entry.direction, main)).or_default() += self.entry_totals(entry, period);
        }
        groups
            .into_iter()
            .map(|((direction, category), totals)| CategoryTotals {
                direction,
                category,
                totals,
            })
            .collect()
    }

    /// Inflow and outflow totals.
    #[must_use]
    pub fn general_totals<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e Entry>,
        period: &Period,
    ) -> GeneralTotals {
        let mut general = GeneralTotals::default();
        for entry in entries {
            let totals = self.entry_totals(entry, period);
            match entry.direction {
                Direction::Inflow => general.inflow += totals,
                Direction::Outflow => general.outflow += totals,
            }
        }
        general
    }

    fn key(kind: OperationKind, entry: &Entry, period: &Period) -> CacheKey {
        CacheKey::new(kind, entry.id.clone(), period.start_date, period.end_date)
    }
}
