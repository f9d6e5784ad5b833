//! Actual reconciliation: realized amounts of an entry per period.

pub mod matcher;
pub mod service;
pub mod types;


pub use matcher::{
    ActualMatcher, AttachedRealAmount, CollectionData, DEFAULT_MATCHERS, RealBudgetItemExact,
    RealBudgetItemNumeric, TransactionPayments,
};
pub use service::ActualReconciler;
pub use types::{ActualSources, ActualTransaction, RealBudgetItem, TransactionPayment};
