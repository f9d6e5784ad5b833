//! Cash position propagation across periods.

pub mod account;
pub mod service;
pub mod types;


pub use account::{CashAccount, RawCashAccount, normalize_cash_accounts, starting_balance};
pub use service::CashPositionPropagator;
pub use types::{PeriodFlows, PeriodPosition, PositionSeries};
