//! End-to-end forecast pipeline.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;
use treso_shared::AppConfig;

use super::types::{EntryRow, ForecastReport, ForecastRequest, PeriodReport};
use crate::aggregate::{Aggregator, VisibilityFilter};
use crate::cache::{MokaResultCache, NoopCache, ResultCache};
use crate::entry::{
    CategoryCatalog, Entry, normalize_entries, normalize_real_budget_items, normalize_transactions,
};
use crate::expansion::{EntryExpander, ExpansionInput};
use crate::period::{Period, PeriodCalendar};
use crate::position::{
    CashPositionPropagator, PeriodFlows, normalize_cash_accounts, starting_balance,
};
use crate::reconcile::ActualSources;

/// Engine defaults that requests do not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Horizon used when a request has none.
    pub default_horizon: u32,
    /// Placeholder balance ignored on unconfigured accounts.
    pub placeholder_balance: Decimal,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_horizon: 12,
            placeholder_balance: Decimal::ZERO,
        }
    }
}

/// Runs forecasts against a shared result cache.
///
/// The cache is shared across runs. Its keys fingerprint entry contents and
/// actual sources, so a run never reads values computed from other inputs.
#[derive(Clone)]
pub struct ForecastEngine {
    cache: Arc<dyn ResultCache>,
    settings: EngineSettings,
}

impl ForecastEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(cache: Arc<dyn ResultCache>, settings: EngineSettings) -> Self {
        Self { cache, settings }
    }

    /// Creates an engine from application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let cache: Arc<dyn ResultCache> = if config.cache.enabled {
            Arc::new(MokaResultCache::with_config(
                config.cache.max_capacity,
                config.cache.ttl_secs,
            ))
        } else {
            Arc::new(NoopCache)
        };
        Self::new(
            cache,
            EngineSettings {
                default_horizon: config.calendar.horizon,
                placeholder_balance: config.position.placeholder_balance,
            },
        )
    }

    /// Drops every cached result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Computes a forecast.
    ///
    /// Periods are generated, raw records normalized, entries expanded and
    /// aggregated, and both cash position series propagated. Category
    /// totals and rows cover the entries visible under the request's
    /// frequency filter; general totals and positions cover every entry.
    #[must_use]
    pub fn run(&self, request: &ForecastRequest) -> ForecastReport {
        let horizon = request.horizon.unwrap_or(self.settings.default_horizon);
        let periods =
            PeriodCalendar::generate_named(&request.view, request.anchor, request.offset, horizon);

        let entries = normalize_entries(&request.entries);
        let transactions = normalize_transactions(&request.transactions);
        let items = normalize_real_budget_items(&request.real_budget_items);
        let accounts = normalize_cash_accounts(&request.cash_accounts);
        let issues: Vec<String> = entries
            .issues
            .iter()
            .chain(&transactions.issues)
            .chain(&items.issues)
            .chain(&accounts.issues)
            .map(ToString::to_string)
            .collect();

        let catalog = CategoryCatalog::new(request.categories.iter().cloned());
        let sources = ActualSources::new(items.records, transactions.records);
        let expanded = EntryExpander::expand(
            &entries.records,
            &ExpansionInput {
                categories: &catalog,
                periods: &periods,
                vat_regime: request.vat_regime.as_ref(),
                taxes: &request.taxes,
                transactions: &sources.transactions,
                mode: request.mode,
                cache: self.cache.as_ref(),
            },
        );
        let filter = VisibilityFilter::only(request.visible_frequencies.iter().copied());
        let visible = filter.apply(&expanded);

        let totals = Aggregator::new(self.cache.as_ref(), &sources, request.policy);
        let row_totals = Aggregator::new(self.cache.as_ref(), &sources, request.row_policy);

        let mut categories = Vec::with_capacity(periods.len());
        let mut generals = Vec::with_capacity(periods.len());
        for period in &periods {
            categories.push(totals.category_totals(visible.iter().copied(), &catalog, period));
            generals.push(totals.general_totals(&expanded, period));
        }
        let budget_flows: Vec<PeriodFlows> = generals
            .iter()
            .map(|g| PeriodFlows::new(g.inflow.budget, g.outflow.budget))
            .collect();
        let actual_flows: Vec<PeriodFlows> = generals
            .iter()
            .map(|g| PeriodFlows::new(g.inflow.actual, g.outflow.actual))
            .collect();

        let opening = starting_balance(&accounts.records, self.settings.placeholder_balance);
        let series = CashPositionPropagator::propagate_series(
            &periods,
            opening,
            &budget_flows,
            &actual_flows,
        );

        let rows = entry_rows(&row_totals, &visible, &periods);

        let period_reports = periods
            .into_iter()
            .zip(categories)
            .zip(generals)
            .zip(series.budget.iter().zip(&series.actual).zip(&series.reste))
            .map(
                |(((period, categories), general), ((budget, actual), reste))| PeriodReport {
                    period,
                    categories,
                    general,
                    budget_position: *budget,
                    actual_position: *actual,
                    reste: *reste,
                },
            )
            .collect();

        debug!(
            view = %request.view,
            entries = expanded.len(),
            visible = visible.len(),
            issues = issues.len(),
            "Forecast computed"
        );

        ForecastReport {
            starting_balance: opening,
            periods: period_reports,
            rows,
            issues,
        }
    }
}

fn entry_rows(aggregator: &Aggregator<'_>, visible: &[&Entry], periods: &[Period]) -> Vec<EntryRow> {
    visible
        .iter()
        .map(|entry| EntryRow {
            id: entry.id.clone(),
            category: entry.category.clone(),
            direction: entry.direction,
            frequency: entry.frequency,
            third_party: entry.third_party.clone(),
            derived: entry.is_derived(),
            parent_id: entry.parent_id().cloned(),
            cells: periods
                .iter()
                .map(|period| aggregator.entry_totals(entry, period))
                .collect(),
        })
        .collect()
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(Arc::new(MokaResultCache::new()), EngineSettings::default())
    }
}
