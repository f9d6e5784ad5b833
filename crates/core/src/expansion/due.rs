//! Construction of payment-due entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use treso_shared::types::{CategoryId, EntryId};

use super::error::ExpansionError;
use crate::entry::{AmountType, Derivation, Direction, Entry, FrequencyClass};
use crate::period::dates::add_months;

/// Category of synthesized VAT payments.
pub const VAT_PAYMENT_CATEGORY: &str = "VAT payment";

/// Category of synthesized tax payments.
pub const TAX_PAYMENT_CATEGORY: &str = "Taxes";

/// Counterparty of every payment-due entry.
pub const STATE: &str = "State";

/// Due date of a declaration window: its start plus the payment delay,
/// day clamped to the target month.
pub fn due_date(window_start: NaiveDate, delay_months: u32) -> Result<NaiveDate, ExpansionError> {
    i32::try_from(delay_months)
        .ok()
        .and_then(|months| add_months(window_start, months))
        .ok_or(ExpansionError::DueDateOutOfRange(window_start))
}

/// A one-time entry representing an obligation.
pub fn payment_due_entry(
    id: String,
    amount: Decimal,
    direction: Direction,
    due: NaiveDate,
    category: &str,
    derivation: Derivation,
) -> Entry {
    Entry {
        id: EntryId::new(id),
        amount: Some(amount),
        direction,
        frequency: FrequencyClass::OneTime,
        start_date: Some(due),
        end_date: None,
        payments: Vec::new(),
        category: CategoryId::new(category),
        third_party: Some(STATE.to_string()),
        budget_id: None,
        budget_detail_id: None,
        amount_type: AmountType::Net,
        vat_rate: None,
        amount_ht: None,
        amount_ttc: None,
        real_amount: None,
        collections: Vec::new(),
        derivation: Some(derivation),
    }
}
