//! Forecast request and report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::{CategoryId, EntryId};

use crate::aggregate::{CategoryTotals, GeneralTotals, Totals};
use crate::entry::{
    Category, Direction, FrequencyClass, RawActualTransaction, RawEntry, RawRealBudgetItem,
};
use crate::expansion::{ExpansionMode, TaxConfig, VatRegime};
use crate::frequency::AmountPolicy;
use crate::period::Period;
use crate::position::{PeriodPosition, RawCashAccount};

fn default_view() -> String {
    "month".to_string()
}

/// Everything one forecast computation needs, as supplied upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    /// Calendar view name (`month`, `quarter_half_month`, `5_years`, ...).
    #[serde(default = "default_view")]
    pub view: String,
    /// Date the calendar is anchored on.
    pub anchor: NaiveDate,
    /// Navigation offset, in units of the view.
    #[serde(default)]
    pub offset: i32,
    /// Number of top-level units. Falls back to the configured horizon.
    #[serde(default)]
    pub horizon: Option<u32>,
    /// Policy for totals and cash positions.
    #[serde(default)]
    pub policy: AmountPolicy,
    /// Policy for per-entry rows.
    #[serde(default)]
    pub row_policy: AmountPolicy,
    /// Display mode.
    #[serde(default)]
    pub mode: ExpansionMode,
    /// Frequencies shown. Empty shows everything.
    #[serde(default)]
    pub visible_frequencies: Vec<FrequencyClass>,
    /// Budget lines.
    #[serde(default)]
    pub entries: Vec<RawEntry>,
    /// Category catalog.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// VAT regime of the project.
    #[serde(default)]
    pub vat_regime: Option<VatRegime>,
    /// Configured taxes.
    #[serde(default)]
    pub taxes: Vec<TaxConfig>,
    /// Actual transactions.
    #[serde(default)]
    pub transactions: Vec<RawActualTransaction>,
    /// Budget-line collections.
    #[serde(default)]
    pub real_budget_items: Vec<RawRealBudgetItem>,
    /// Cash accounts.
    #[serde(default)]
    pub cash_accounts: Vec<RawCashAccount>,
}

impl ForecastRequest {
    /// A request with no data for `view` around `anchor`.
    #[must_use]
    pub fn new(view: impl Into<String>, anchor: NaiveDate) -> Self {
        Self {
            view: view.into(),
            anchor,
            offset: 0,
            horizon: None,
            policy: AmountPolicy::default(),
            row_policy: AmountPolicy::default(),
            mode: ExpansionMode::default(),
            visible_frequencies: Vec::new(),
            entries: Vec::new(),
            categories: Vec::new(),
            vat_regime: None,
            taxes: Vec::new(),
            transactions: Vec::new(),
            real_budget_items: Vec::new(),
            cash_accounts: Vec::new(),
        }
    }
}

/// One visible entry across every period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    /// Entry ID.
    pub id: EntryId,
    /// Category.
    pub category: CategoryId,
    /// Side of the table.
    pub direction: Direction,
    /// Frequency.
    pub frequency: FrequencyClass,
    /// Counterparty.
    pub third_party: Option<String>,
    /// Synthesized by expansion.
    pub derived: bool,
    /// Entry this one derives from, for VAT children.
    pub parent_id: Option<EntryId>,
    /// Totals per period, aligned on the report periods.
    pub cells: Vec<Totals>,
}

/// Everything computed for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    /// The period.
    pub period: Period,
    /// Totals per side and main category of the visible entries.
    pub categories: Vec<CategoryTotals>,
    /// Inflow and outflow totals of every entry.
    pub general: GeneralTotals,
    /// Forecast cash position.
    pub budget_position: PeriodPosition,
    /// Realized cash position.
    pub actual_position: PeriodPosition,
    /// Budget final minus actual final.
    pub reste: Decimal,
}

/// Result of a forecast computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Opening balance of the first period.
    pub starting_balance: Decimal,
    /// Per-period results, in calendar order.
    pub periods: Vec<PeriodReport>,
    /// Per-entry rows.
    pub rows: Vec<EntryRow>,
    /// Upstream fields that could not be read.
    pub issues: Vec<String>,
}
