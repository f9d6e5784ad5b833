//! Canonical budget entry types.
//!
//! The core only ever sees these shapes; heterogeneous upstream records are
//! mapped onto them by `entry::ingest`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::{BudgetDetailId, BudgetId, CategoryId, EntryId, TransactionId};

/// Cash direction of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money coming in.
    Inflow,
    /// Money going out.
    Outflow,
}

impl Direction {
    /// Sign applied to an amount of this direction in a net cash flow.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::Inflow => Decimal::ONE,
            Self::Outflow => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Recurrence class of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyClass {
    /// Happens once, on the start date.
    OneTime,
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every two weeks.
    Biweekly,
    /// Every month.
    Monthly,
    /// Every two months.
    Bimonthly,
    /// Every three months.
    Quarterly,
    /// Every six months.
    Semiannual,
    /// Every year.
    Annual,
    /// Discrete payments listed on the entry.
    Irregular,
    /// Unrecognized upstream value. Contributes nothing.
    #[serde(other)]
    Unknown,
}

/// Fixed increment between two occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A number of days.
    Days(i64),
    /// A number of months, day of month clamped.
    Months(i32),
}

impl FrequencyClass {
    /// Parses an upstream frequency label, English or French.
    ///
    /// Unrecognized labels map to `Unknown`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let key = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "one_time" | "onetime" | "once" | "ponctuel" | "ponctuelle" | "unique" => {
                Self::OneTime
            }
            "daily" | "quotidien" | "journalier" => Self::Daily,
            "weekly" | "hebdomadaire" => Self::Weekly,
            "biweekly" | "bi_weekly" | "fortnightly" | "bimensuel" | "quinzaine" => {
                Self::Biweekly
            }
            "monthly" | "mensuel" => Self::Monthly,
            "bimonthly" | "bi_monthly" | "bimestriel" => Self::Bimonthly,
            "quarterly" | "trimestriel" => Self::Quarterly,
            "semiannual" | "semi_annual" | "semestriel" => Self::Semiannual,
            "annual" | "yearly" | "annuel" => Self::Annual,
            "irregular" | "irregulier" | "provision" => Self::Irregular,
            _ => Self::Unknown,
        }
    }

    /// Increment between occurrences for recurring classes.
    #[must_use]
    pub const fn step(self) -> Option<Step> {
        match self {
            Self::Daily => Some(Step::Days(1)),
            Self::Weekly => Some(Step::Days(7)),
            Self::Biweekly => Some(Step::Days(14)),
            Self::Monthly => Some(Step::Months(1)),
            Self::Bimonthly => Some(Step::Months(2)),
            Self::Quarterly => Some(Step::Months(3)),
            Self::Semiannual => Some(Step::Months(6)),
            Self::Annual => Some(Step::Months(12)),
            Self::OneTime | Self::Irregular | Self::Unknown => None,
        }
    }

    /// Returns true for classes walked with a fixed increment.
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        self.step().is_some()
    }
}

/// Whether the entry amount includes VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    /// Amount excludes VAT.
    #[default]
    Net,
    /// Amount includes VAT; the entry is split during expansion.
    Gross,
}

/// A discrete scheduled payment of an irregular entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payment {
    /// Due date.
    pub date: NaiveDate,
    /// Amount due.
    pub amount: Decimal,
}

/// A collection record attached to an entry by the collection API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collection {
    /// Date the money was collected.
    pub date: NaiveDate,
    /// Amount collected.
    pub amount: Decimal,
}

/// Why a synthetic entry exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Derivation {
    /// VAT portion split out of a gross parent entry.
    VatChild {
        /// Entry the VAT was split from.
        parent_id: EntryId,
    },
    /// Net VAT due to (or from) the State for one declaration window.
    VatPayment {
        /// Entries whose VAT contributed to the amount.
        associated_entry_ids: Vec<EntryId>,
    },
    /// Tax due for one declaration window.
    TaxPayment {
        /// Configured tax type.
        tax_type: String,
        /// Transactions that formed the tax base.
        associated_transaction_ids: Vec<TransactionId>,
    },
}

/// One budget line, either supplied upstream or synthesized by expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Entry ID.
    pub id: EntryId,
    /// Amount per occurrence. `None` when the upstream value was missing or
    /// not a finite number; such entries contribute zero.
    pub amount: Option<Decimal>,
    /// Cash direction.
    pub direction: Direction,
    /// Recurrence class.
    pub frequency: FrequencyClass,
    /// First occurrence, or the anchor date of a one-time entry.
    pub start_date: Option<NaiveDate>,
    /// Last day the entry is active (inclusive). Open-ended when absent.
    pub end_date: Option<NaiveDate>,
    /// Discrete payments, the only source of truth for irregular entries.
    pub payments: Vec<Payment>,
    /// Category the entry belongs to.
    pub category: CategoryId,
    /// Counterparty name.
    pub third_party: Option<String>,
    /// Link to realized budget records.
    pub budget_id: Option<BudgetId>,
    /// Link to the budget detail line.
    pub budget_detail_id: Option<BudgetDetailId>,
    /// Whether `amount` includes VAT.
    pub amount_type: AmountType,
    /// VAT rate in percent.
    pub vat_rate: Option<Decimal>,
    /// Amount excluding VAT, for gross entries.
    pub amount_ht: Option<Decimal>,
    /// Amount including VAT, for gross entries.
    pub amount_ttc: Option<Decimal>,
    /// Realized amount already attached upstream.
    pub real_amount: Option<Decimal>,
    /// Collection API records attached upstream.
    pub collections: Vec<Collection>,
    /// Set on synthetic entries.
    pub derivation: Option<Derivation>,
}

impl Entry {
    /// Creates a net, non-derived entry with empty optional fields.
    #[must_use]
    pub fn new(
        id: impl Into<EntryId>,
        amount: Decimal,
        direction: Direction,
        frequency: FrequencyClass,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            amount: Some(amount),
            direction,
            frequency,
            start_date: Some(start_date),
            end_date: None,
            payments: Vec::new(),
            category: CategoryId::new(super::ingest::UNCATEGORIZED),
            third_party: None,
            budget_id: None,
            budget_detail_id: None,
            amount_type: AmountType::Net,
            vat_rate: None,
            amount_ht: None,
            amount_ttc: None,
            real_amount: None,
            collections: Vec::new(),
            derivation: None,
        }
    }

    /// Returns true if this entry is a VAT child.
    #[must_use]
    pub fn is_vat_child(&self) -> bool {
        matches!(self.derivation, Some(Derivation::VatChild { .. }))
    }

    /// Returns true if this entry is a synthesized VAT or tax payment.
    #[must_use]
    pub fn is_payment_due(&self) -> bool {
        matches!(
            self.derivation,
            Some(Derivation::VatPayment { .. } | Derivation::TaxPayment { .. })
        )
    }

    /// Returns true if this entry was synthesized by expansion.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.derivation.is_some()
    }

    /// Parent of a VAT child.
    #[must_use]
    pub fn parent_id(&self) -> Option<&EntryId> {
        match &self.derivation {
            Some(Derivation::VatChild { parent_id }) => Some(parent_id),
            _ => None,
        }
    }

    /// Entries a derived entry depends on for visibility.
    #[must_use]
    pub fn associated_entry_ids(&self) -> Vec<&EntryId> {
        match &self.derivation {
            Some(Derivation::VatChild { parent_id }) => vec![parent_id],
            Some(Derivation::VatPayment {
                associated_entry_ids,
            }) => associated_entry_ids.iter().collect(),
            Some(Derivation::TaxPayment { .. }) | None => Vec::new(),
        }
    }

    /// Returns true if the entry still carries gross VAT markers and would be
    /// split by expansion.
    #[must_use]
    pub fn has_gross_markers(&self) -> bool {
        self.amount_type == AmountType::Gross
            && self.vat_rate.is_some()
            && self.amount_ht.is_some()
            && self.amount_ttc.is_some()
    }

    /// Last active day as an exclusive bound, `None` when open-ended.
    #[must_use]
    pub fn end_exclusive(&self) -> Option<NaiveDate> {
        self.end_date.and_then(|end| end.succ_opt())
    }
}
