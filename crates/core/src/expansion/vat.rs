//! VAT split and VAT payment generation.

use rust_decimal::Decimal;
use treso_shared::types::{CENT, EntryId, round_cents};

use super::due::{VAT_PAYMENT_CATEGORY, due_date, payment_due_entry};
use super::error::ExpansionError;
use super::types::{RegimeType, VatRegime};
use crate::cache::{CacheKey, OperationKind, ResultCache, cached, fingerprint};
use crate::entry::{AmountType, CategoryCatalog, Derivation, Direction, Entry, Payment};
use crate::frequency::FrequencyResolver;
use crate::period::Period;

/// Suffix of a VAT child ID.
pub const VAT_CHILD_SUFFIX: &str = "_vat";

/// Prefix of a VAT payment ID.
pub const VAT_DUE_PREFIX: &str = "vat_due_";

/// Splits a gross entry into its net entry and VAT child.
///
/// Returns `None` when the entry has no gross markers or when the VAT part
/// is within one cent of zero. Scheduled payments are shared between both
/// entries pro rata of `ht / ttc`.
#[must_use]
pub fn split_gross(entry: &Entry, categories: &CategoryCatalog) -> Option<(Entry, Entry)> {
    if !entry.has_gross_markers() {
        return None;
    }
    let (ht, ttc) = (entry.amount_ht?, entry.amount_ttc?);
    let vat = ttc.checked_sub(ht)?;
    if vat.abs() <= CENT {
        return None;
    }

    let net_payments: Vec<Payment> = ht
        .checked_div(ttc)
        .and_then(|share| {
            entry
                .payments
                .iter()
                .map(|p| {
                    p.amount.checked_mul(share).map(|amount| Payment {
                        date: p.date,
                        amount: round_cents(amount),
                    })
                })
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_else(|| entry.payments.clone());
    let vat_payments = entry
        .payments
        .iter()
        .zip(&net_payments)
        .map(|(gross, net)| Payment {
            date: gross.date,
            amount: gross.amount.saturating_sub(net.amount),
        })
        .filter(|p| !p.amount.is_zero())
        .collect();

    let net = Entry {
        amount: Some(ht),
        amount_type: AmountType::Net,
        payments: net_payments,
        ..entry.clone()
    };
    let child = Entry {
        id: EntryId::new(format!("{}{VAT_CHILD_SUFFIX}", entry.id)),
        amount: Some(vat),
        payments: vat_payments,
        category: categories.vat_category(entry.direction),
        budget_id: None,
        budget_detail_id: None,
        amount_type: AmountType::Net,
        real_amount: None,
        collections: Vec::new(),
        derivation: Some(Derivation::VatChild {
            parent_id: entry.id.clone(),
        }),
        ..entry.clone()
    };
    Some((net, child))
}

/// One VAT payment per display period with a non-zero VAT balance.
///
/// The balance is collected VAT minus deductible VAT, prorated per period.
/// A positive balance is paid to the State, a negative one is a credit
/// received from it. Per-child VAT goes through `cache`.
pub fn vat_payments(
    entries: &[Entry],
    periods: &[Period],
    regime: &VatRegime,
    cache: &dyn ResultCache,
) -> Result<Vec<Entry>, ExpansionError> {
    match regime.regime_type {
        RegimeType::Exempt => return Ok(Vec::new()),
        RegimeType::Unknown => return Err(ExpansionError::UnknownRegime(regime.name.clone())),
        RegimeType::Monthly | RegimeType::Quarterly | RegimeType::Annual => {}
    }

    let children: Vec<&Entry> = entries.iter().filter(|e| e.is_vat_child()).collect();
    let mut payments = Vec::new();
    for period in periods {
        let mut balance = Decimal::ZERO;
        let mut associated: Vec<EntryId> = Vec::new();
        for child in &children {
            let key = CacheKey::new(
                OperationKind::VatDue,
                child.id.clone(),
                period.start_date,
                period.end_date,
            )
            .with_fingerprint(fingerprint(*child));
            let vat = cached(cache, key, || {
                FrequencyResolver::vat_for_period(child, period.start_date, period.end_date)
            });
            if vat.is_zero() {
                continue;
            }
            balance = balance
                .checked_add(child.direction.sign() * vat)
                .ok_or_else(|| ExpansionError::AmountOverflow(regime.name.clone()))?;
            let parent = child.parent_id().unwrap_or(&child.id);
            if !associated.contains(parent) {
                associated.push(parent.clone());
            }
        }

        let balance = round_cents(balance);
        if balance.is_zero() {
            continue;
        }
        let direction = if balance.is_sign_positive() {
            Direction::Outflow
        } else {
            Direction::Inflow
        };
        let due = due_date(period.start_date, regime.payment_delay_months)?;
        payments.push(payment_due_entry(
            format!("{VAT_DUE_PREFIX}{}", period.start_date.format("%Y-%m-%d")),
            balance.abs(),
            direction,
            due,
            VAT_PAYMENT_CATEGORY,
            Derivation::VatPayment {
                associated_entry_ids: associated,
            },
        ));
    }
    Ok(payments)
}
