//! VAT and tax configuration consumed by the expander.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::CategoryId;

use crate::cache::{NoopCache, ResultCache};
use crate::entry::CategoryCatalog;
use crate::period::Period;
use crate::reconcile::ActualTransaction;

/// How often VAT is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegimeType {
    /// Monthly declaration.
    #[serde(alias = "mensuel")]
    Monthly,
    /// Quarterly declaration.
    #[serde(alias = "trimestriel")]
    Quarterly,
    /// Yearly declaration.
    #[serde(alias = "annuel")]
    Annual,
    /// Not liable for VAT. No VAT payment is due.
    #[serde(alias = "franchise", alias = "franchise_en_base")]
    Exempt,
    /// Unrecognized upstream value.
    #[serde(other)]
    Unknown,
}

/// VAT regime of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatRegime {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Declaration regime.
    #[serde(alias = "regime_type")]
    pub regime_type: RegimeType,
    /// Months between the start of a declaration window and the payment.
    #[serde(default, alias = "payment_delay_months")]
    pub payment_delay_months: u32,
}

/// How often a tax is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// Monthly declaration.
    #[serde(alias = "mensuel")]
    Monthly,
    /// Quarterly declaration.
    #[serde(alias = "trimestriel")]
    Quarterly,
    /// Yearly declaration.
    #[serde(alias = "annuel", alias = "yearly")]
    Annual,
    /// Unrecognized upstream value.
    #[serde(other)]
    Unknown,
}

impl Periodicity {
    /// Length of a declaration window in months.
    #[must_use]
    pub const fn months(self) -> Option<u32> {
        match self {
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Annual => Some(12),
            Self::Unknown => None,
        }
    }
}

/// What a tax is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxBase {
    /// Inflow transactions.
    #[serde(alias = "turnover", alias = "chiffre_affaires")]
    Revenue,
    /// Outflow transactions (salaries).
    #[serde(alias = "salaries", alias = "masse_salariale")]
    Payroll,
    /// Outflow transactions.
    #[serde(alias = "expenses", alias = "charges")]
    Expense,
    /// Inflows minus outflows.
    #[serde(alias = "benefice", alias = "resultat")]
    Profit,
    /// Unrecognized upstream value. The base is zero.
    #[serde(other)]
    Unknown,
}

/// One configured tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    /// Stable tax discriminator, used in synthetic IDs.
    #[serde(alias = "tax_type")]
    pub tax_type: String,
    /// Display name.
    #[serde(default, alias = "tax_name")]
    pub tax_name: String,
    /// Rate in percent.
    pub rate: Decimal,
    /// Base the rate applies to.
    #[serde(alias = "base_type")]
    pub base_type: TaxBase,
    /// Declaration window length.
    #[serde(alias = "declaration_periodicity")]
    pub declaration_periodicity: Periodicity,
    /// Months between the start of a declaration window and the payment.
    #[serde(default, alias = "payment_delay_months")]
    pub payment_delay_months: u32,
    /// Transaction categories counted in the base. Empty means all.
    #[serde(default, alias = "category_ids")]
    pub category_ids: Vec<CategoryId>,
}

/// Display mode of the forecast table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionMode {
    /// Period by period. Payment-due entries are generated.
    #[default]
    Detailed,
    /// All periods collapsed. Only the VAT split runs.
    Consolidated,
}

/// Everything the expander reads besides the entries.
#[derive(Clone, Copy)]
pub struct ExpansionInput<'a> {
    /// Category catalog, for VAT child categories.
    pub categories: &'a CategoryCatalog,
    /// Display periods.
    pub periods: &'a [Period],
    /// VAT regime of the project, if any.
    pub vat_regime: Option<&'a VatRegime>,
    /// Configured taxes.
    pub taxes: &'a [TaxConfig],
    /// Actual transactions forming tax bases.
    pub transactions: &'a [ActualTransaction],
    /// Display mode.
    pub mode: ExpansionMode,
    /// Cache for per-period VAT of each VAT child.
    pub cache: &'a dyn ResultCache,
}

impl<'a> ExpansionInput<'a> {
    /// Input with no VAT regime, no taxes, no transactions and no cache.
    #[must_use]
    pub fn new(categories: &'a CategoryCatalog, periods: &'a [Period]) -> Self {
        Self {
            categories,
            periods,
            vat_regime: None,
            taxes: &[],
            transactions: &[],
            mode: ExpansionMode::Detailed,
            cache: &NoopCache,
        }
    }
}
