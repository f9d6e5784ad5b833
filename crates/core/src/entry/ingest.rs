//! Normalization of upstream records into canonical types.
//!
//! Upstream payloads name the same field several ways and mix numbers with
//! numeric strings. Every raw record is mapped here, once, before any
//! computation runs. Unreadable fields degrade to their safe default and are
//! reported as [`IngestError`] issues.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use treso_shared::types::{
    BudgetDetailId, BudgetId, CategoryId, EntryId, TransactionId, parse_amount, parse_date,
};

use super::error::IngestError;
use super::types::{AmountType, Collection, Direction, Entry, FrequencyClass, Payment};
use crate::reconcile::{ActualTransaction, RealBudgetItem, TransactionPayment};

/// Category assigned to entries that carry none.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Normalized records plus the issues met along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    /// Canonical records.
    pub records: Vec<T>,
    /// Fields that were unreadable.
    pub issues: Vec<IngestError>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// A budget line as emitted upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEntry {
    /// Entry ID, string or number.
    #[serde(alias = "_id", alias = "entryId")]
    pub id: Value,
    /// Per-occurrence amount.
    pub amount: Value,
    /// `inflow`/`outflow` or one of their aliases.
    #[serde(alias = "type", alias = "flowType", alias = "flow_type")]
    pub direction: Option<String>,
    /// Frequency label.
    #[serde(alias = "frequencyClass", alias = "frequencyName", alias = "frequency_name")]
    pub frequency: Option<String>,
    /// First occurrence.
    #[serde(alias = "start_date", alias = "date")]
    pub start_date: Option<String>,
    /// Last active day.
    #[serde(alias = "end_date")]
    pub end_date: Option<String>,
    /// Scheduled payments of an irregular entry.
    pub payments: Vec<RawPayment>,
    /// Category ID.
    #[serde(alias = "categoryId", alias = "category_id")]
    pub category: Value,
    /// Counterparty.
    #[serde(alias = "third_party", alias = "supplier")]
    pub third_party: Option<String>,
    /// Budget line key used by collections.
    #[serde(alias = "budget_id")]
    pub budget_id: Value,
    /// Budget detail key.
    #[serde(alias = "budget_detail_id")]
    pub budget_detail_id: Value,
    /// `gross`/`net` (`ttc`/`ht` accepted).
    #[serde(alias = "amount_type")]
    pub amount_type: Option<String>,
    /// VAT rate in percent.
    #[serde(alias = "vat_rate")]
    pub vat_rate: Value,
    /// Amount excluding VAT.
    #[serde(alias = "amount_ht", alias = "amountHT")]
    pub amount_ht: Value,
    /// Amount including VAT.
    #[serde(alias = "amount_ttc", alias = "amountTTC")]
    pub amount_ttc: Value,
    /// Realized amount already attached upstream.
    #[serde(alias = "real_amount")]
    pub real_amount: Value,
    /// Collections fetched from the collection API.
    #[serde(alias = "collection_data")]
    pub collection_data: Option<RawCollectionData>,
}

/// A dated amount (scheduled payment or settlement).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPayment {
    /// Payment date.
    #[serde(alias = "paymentDate", alias = "payment_date")]
    pub date: Option<String>,
    /// Amount.
    #[serde(alias = "paidAmount", alias = "paid_amount")]
    pub amount: Value,
}

/// Wrapper of the collection API payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCollectionData {
    /// Collections.
    pub collection: Vec<RawCollection>,
}

/// One collection from the collection API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCollection {
    /// Collection date.
    #[serde(alias = "collectionDate", alias = "collection_date")]
    pub date: Option<String>,
    /// Collected amount.
    #[serde(alias = "collectionAmount", alias = "collection_amount")]
    pub amount: Value,
}

/// An actual transaction as emitted upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawActualTransaction {
    /// Transaction ID.
    pub id: Value,
    /// Entry ID this transaction realizes.
    #[serde(alias = "budget_id")]
    pub budget_id: Value,
    /// Settlements.
    pub payments: Vec<RawPayment>,
    /// Category ID.
    #[serde(alias = "category_id", alias = "category")]
    pub category_id: Value,
    /// Cash direction.
    #[serde(alias = "type")]
    pub direction: Option<String>,
}

/// A budget-line collection as emitted upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRealBudgetItem {
    /// Budget line key.
    #[serde(alias = "budget_id")]
    pub budget_id: Value,
    /// Collection date.
    #[serde(alias = "collection_date")]
    pub collection_date: Option<String>,
    /// Collected amount.
    #[serde(alias = "collection_amount")]
    pub collection_amount: Value,
}

/// Reads an identifier that may be a string or a number.
#[must_use]
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses a direction label, English or French.
#[must_use]
pub fn parse_direction(raw: &str) -> Option<Direction> {
    match raw.trim().to_lowercase().as_str() {
        "inflow" | "in" | "income" | "revenue" | "receipt" | "entree" | "entrée" | "encaissement"
        | "recette" => Some(Direction::Inflow),
        "outflow" | "out" | "expense" | "payment" | "sortie" | "decaissement" | "décaissement"
        | "depense" | "dépense" => Some(Direction::Outflow),
        _ => None,
    }
}

fn parse_amount_type(raw: Option<&str>) -> AmountType {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("gross" | "ttc") => AmountType::Gross,
        _ => AmountType::Net,
    }
}

/// Collects issues for one record.
struct RecordContext<'a> {
    record: &'a str,
    issues: &'a mut Vec<IngestError>,
}

impl RecordContext<'_> {
    /// Optional amount: `null` is silently absent, anything unreadable is
    /// reported.
    fn optional_amount(&mut self, value: &Value, field: &'static str) -> Option<Decimal> {
        if value.is_null() {
            return None;
        }
        let parsed = parse_amount(value);
        if parsed.is_none() {
            self.issues.push(IngestError::InvalidAmount {
                record: self.record.to_string(),
                field,
            });
        }
        parsed
    }

    /// Required amount: `null` is reported too.
    fn required_amount(&mut self, value: &Value, field: &'static str) -> Option<Decimal> {
        let parsed = parse_amount(value);
        if parsed.is_none() {
            self.issues.push(IngestError::InvalidAmount {
                record: self.record.to_string(),
                field,
            });
        }
        parsed
    }

    fn date(&mut self, raw: Option<&str>, field: &'static str) -> Option<NaiveDate> {
        let raw = raw.filter(|s| !s.trim().is_empty())?;
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.issues.push(IngestError::InvalidDate {
                record: self.record.to_string(),
                field,
                value: raw.to_string(),
            });
        }
        parsed
    }

    fn direction(&mut self, raw: Option<&str>) -> Direction {
        raw.and_then(parse_direction).unwrap_or_else(|| {
            self.issues.push(IngestError::UnknownDirection {
                record: self.record.to_string(),
                value: raw.unwrap_or_default().to_string(),
            });
            Direction::Outflow
        })
    }

    fn dated_amounts(&mut self, payments: &[RawPayment], field: &'static str) -> Vec<Payment> {
        payments
            .iter()
            .filter_map(|p| {
                let date = self.date(p.date.as_deref(), field)?;
                let amount = self.required_amount(&p.amount, field)?;
                Some(Payment { date, amount })
            })
            .collect()
    }
}

/// Maps raw budget lines onto canonical entries.
///
/// An entry without an ID gets `entry_{index}`.
#[must_use]
pub fn normalize_entries(raw: &[RawEntry]) -> Normalized<Entry> {
    let mut out = Normalized::default();
    for (index, item) in raw.iter().enumerate() {
        let id = id_string(&item.id).unwrap_or_else(|| format!("entry_{index}"));
        let mut ctx = RecordContext {
            record: &id,
            issues: &mut out.issues,
        };

        let frequency_label = item.frequency.as_deref().unwrap_or_default();
        let frequency = FrequencyClass::parse_lenient(frequency_label);
        if frequency == FrequencyClass::Unknown {
            ctx.issues.push(IngestError::UnknownFrequency {
                record: id.clone(),
                value: frequency_label.to_string(),
            });
        }

        let entry = Entry {
            amount: ctx.required_amount(&item.amount, "amount"),
            direction: ctx.direction(item.direction.as_deref()),
            frequency,
            start_date: ctx.date(item.start_date.as_deref(), "startDate"),
            end_date: ctx.date(item.end_date.as_deref(), "endDate"),
            payments: ctx.dated_amounts(&item.payments, "payments"),
            category: CategoryId::new(
                id_string(&item.category).unwrap_or_else(|| UNCATEGORIZED.to_string()),
            ),
            third_party: item.third_party.clone().filter(|s| !s.trim().is_empty()),
            budget_id: id_string(&item.budget_id).map(BudgetId::new),
            budget_detail_id: id_string(&item.budget_detail_id).map(BudgetDetailId::new),
            amount_type: parse_amount_type(item.amount_type.as_deref()),
            vat_rate: ctx.optional_amount(&item.vat_rate, "vatRate"),
            amount_ht: ctx.optional_amount(&item.amount_ht, "amountHt"),
            amount_ttc: ctx.optional_amount(&item.amount_ttc, "amountTtc"),
            real_amount: ctx.optional_amount(&item.real_amount, "realAmount"),
            collections: item
                .collection_data
                .as_ref()
                .map(|data| {
                    data.collection
                        .iter()
                        .filter_map(|c| {
                            let date = ctx.date(c.date.as_deref(), "collectionDate")?;
                            let amount = ctx.required_amount(&c.amount, "collectionAmount")?;
                            Some(Collection { date, amount })
                        })
                        .collect()
                })
                .unwrap_or_default(),
            derivation: None,
            id: EntryId::new(id.clone()),
        };
        out.records.push(entry);
    }
    out
}

/// Maps raw transactions onto canonical ones.
///
/// Transactions without an ID get `transaction_{index}`. Unreadable
/// settlements are dropped.
#[must_use]
pub fn normalize_transactions(raw: &[RawActualTransaction]) -> Normalized<ActualTransaction> {
    let mut out = Normalized::default();
    for (index, item) in raw.iter().enumerate() {
        let id = id_string(&item.id).unwrap_or_else(|| format!("transaction_{index}"));
        let mut ctx = RecordContext {
            record: &id,
            issues: &mut out.issues,
        };
        let payments = ctx
            .dated_amounts(&item.payments, "payments")
            .into_iter()
            .map(|p| TransactionPayment {
                payment_date: p.date,
                paid_amount: p.amount,
            })
            .collect();
        let direction = match item.direction.as_deref() {
            None => None,
            Some(raw) => Some(ctx.direction(Some(raw))),
        };
        out.records.push(ActualTransaction {
            budget_id: id_string(&item.budget_id).map(EntryId::new),
            payments,
            category_id: id_string(&item.category_id).map(CategoryId::new),
            direction,
            id: TransactionId::new(id.clone()),
        });
    }
    out
}

/// Maps raw budget-line collections onto canonical ones.
///
/// Records missing their budget key, date or amount are dropped.
#[must_use]
pub fn normalize_real_budget_items(raw: &[RawRealBudgetItem]) -> Normalized<RealBudgetItem> {
    let mut out = Normalized::default();
    for (index, item) in raw.iter().enumerate() {
        let Some(budget_id) = id_string(&item.budget_id) else {
            out.issues.push(IngestError::MissingKey {
                record: format!("real_budget_item_{index}"),
                field: "budgetId",
            });
            continue;
        };
        let mut ctx = RecordContext {
            record: &budget_id,
            issues: &mut out.issues,
        };
        let date = ctx.date(item.collection_date.as_deref(), "collectionDate");
        let amount = ctx.required_amount(&item.collection_amount, "collectionAmount");
        if let (Some(collection_date), Some(collection_amount)) = (date, amount) {
            out.records.push(RealBudgetItem {
                budget_id: BudgetId::new(budget_id.clone()),
                collection_date,
                collection_amount,
            });
        }
    }
    out
}
