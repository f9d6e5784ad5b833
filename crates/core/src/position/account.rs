//! Cash accounts and the opening balance of a forecast.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use treso_shared::types::{AccountId, parse_amount};

use crate::entry::ingest::id_string;
use crate::entry::{IngestError, Normalized};

/// A cash account as emitted upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCashAccount {
    /// Account ID.
    pub id: Value,
    /// Display name.
    #[serde(alias = "accountName", alias = "account_name")]
    pub name: Option<String>,
    /// Opening balance.
    #[serde(alias = "initial_amount", alias = "initialAmount", alias = "initial_balance")]
    pub initial_balance: Value,
    /// Whether the account is in use.
    #[serde(alias = "is_active")]
    pub is_active: Option<bool>,
    /// Whether the user has set the account up.
    #[serde(alias = "is_configured")]
    pub is_configured: Option<bool>,
}

/// A cash account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAccount {
    /// Account ID.
    pub id: AccountId,
    /// Display name.
    pub name: Option<String>,
    /// Opening balance, if readable.
    pub initial_balance: Option<Decimal>,
    /// Whether the account is in use.
    pub is_active: bool,
    /// Whether the user has set the account up.
    pub is_configured: bool,
}

impl CashAccount {
    /// Balance this account contributes to the opening position.
    ///
    /// An inactive or unconfigured account still showing the placeholder
    /// balance contributes nothing.
    #[must_use]
    pub fn counted_balance(&self, placeholder: Decimal) -> Decimal {
        let balance = self.initial_balance.unwrap_or_default();
        if (!self.is_active || !self.is_configured) && balance == placeholder {
            Decimal::ZERO
        } else {
            balance
        }
    }
}

/// Maps raw cash accounts onto canonical ones.
///
/// Missing flags default to true. An account without an ID gets
/// `account_{index}`.
#[must_use]
pub fn normalize_cash_accounts(raw: &[RawCashAccount]) -> Normalized<CashAccount> {
    let mut out = Normalized::default();
    for (index, item) in raw.iter().enumerate() {
        let id = id_string(&item.id).unwrap_or_else(|| format!("account_{index}"));
        let initial_balance = parse_amount(&item.initial_balance);
        if initial_balance.is_none() && !item.initial_balance.is_null() {
            out.issues.push(IngestError::InvalidAmount {
                record: id.clone(),
                field: "initialBalance",
            });
        }
        out.records.push(CashAccount {
            id: AccountId::new(id),
            name: item.name.clone(),
            initial_balance,
            is_active: item.is_active.unwrap_or(true),
            is_configured: item.is_configured.unwrap_or(true),
        });
    }
    out
}

/// Sum of the counted balances of `accounts`.
#[must_use]
pub fn starting_balance(accounts: &[CashAccount], placeholder: Decimal) -> Decimal {
    accounts
        .iter()
        .map(|account| account.counted_balance(placeholder))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
