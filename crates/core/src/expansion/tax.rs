//! Tax payment generation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use treso_shared::types::{TransactionId, round_cents};

use super::due::{TAX_PAYMENT_CATEGORY, due_date, payment_due_entry};
use super::error::ExpansionError;
use super::types::{TaxBase, TaxConfig};
use crate::entry::{Derivation, Direction, Entry};
use crate::period::Period;
use crate::period::dates::{add_months, start_of_year};
use crate::reconcile::ActualTransaction;

/// Prefix of a tax payment ID.
pub const TAX_DUE_PREFIX: &str = "tax_";

/// Declaration windows of `months` months, aligned on the fiscal year of
/// the first period, that overlap at least one period.
#[must_use]
pub fn declaration_windows(months: u32, periods: &[Period]) -> Vec<(NaiveDate, NaiveDate)> {
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return Vec::new();
    };
    let Ok(step) = i32::try_from(months.max(1)) else {
        return Vec::new();
    };
    let fiscal_start = start_of_year(first.start_date);
    let horizon_end = last.end_date;

    let mut windows = Vec::new();
    let mut index = 0;
    loop {
        let Some(start) = add_months(fiscal_start, index * step) else {
            break;
        };
        if start >= horizon_end {
            break;
        }
        let Some(end) = add_months(fiscal_start, (index + 1) * step) else {
            break;
        };
        if periods.iter().any(|p| p.overlaps(start, end)) {
            windows.push((start, end));
        }
        index += 1;
    }
    windows
}

/// Base of `tax` over `[start, end)` and the transactions that formed it.
pub fn tax_base(
    tax: &TaxConfig,
    transactions: &[ActualTransaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(Decimal, Vec<TransactionId>), ExpansionError> {
    let mut base = Decimal::ZERO;
    let mut ids = Vec::new();
    for tx in transactions {
        if !tax.category_ids.is_empty()
            && !tx
                .category_id
                .as_ref()
                .is_some_and(|c| tax.category_ids.contains(c))
        {
            continue;
        }
        let sign = match (tax.base_type, tx.direction) {
            (TaxBase::Revenue | TaxBase::Profit, Some(Direction::Inflow))
            | (TaxBase::Payroll | TaxBase::Expense, Some(Direction::Outflow)) => Decimal::ONE,
            (TaxBase::Profit, Some(Direction::Outflow)) => Decimal::NEGATIVE_ONE,
            _ => continue,
        };
        let paid = tx.paid_between(start, end);
        if paid.is_zero() {
            continue;
        }
        base = base
            .checked_add(sign * paid)
            .ok_or_else(|| ExpansionError::AmountOverflow(tax.tax_type.clone()))?;
        ids.push(tx.id.clone());
    }
    Ok((base, ids))
}

/// One payment per declaration window where `tax` is positive.
pub fn tax_payments(
    tax: &TaxConfig,
    periods: &[Period],
    transactions: &[ActualTransaction],
) -> Result<Vec<Entry>, ExpansionError> {
    let months = tax
        .declaration_periodicity
        .months()
        .ok_or_else(|| ExpansionError::UnknownPeriodicity(tax.tax_type.clone()))?;
    if tax.rate.is_sign_negative() {
        return Err(ExpansionError::NegativeRate {
            tax_type: tax.tax_type.clone(),
            rate: tax.rate,
        });
    }

    let mut payments = Vec::new();
    for (start, end) in declaration_windows(months, periods) {
        let (base, ids) = tax_base(tax, transactions, start, end)?;
        let amount = base
            .checked_mul(tax.rate)
            .map(|owed| round_cents(owed / Decimal::ONE_HUNDRED))
            .ok_or_else(|| ExpansionError::AmountOverflow(tax.tax_type.clone()))?;
        if amount <= Decimal::ZERO {
            continue;
        }
        payments.push(payment_due_entry(
            format!("{TAX_DUE_PREFIX}{}_{}", tax.tax_type, start.format("%Y-%m-%d")),
            amount,
            Direction::Outflow,
            due_date(start, tax.payment_delay_months)?,
            TAX_PAYMENT_CATEGORY,
            Derivation::TaxPayment {
                tax_type: tax.tax_type.clone(),
                associated_transaction_ids: ids,
            },
        ));
    }
    Ok(payments)
}
