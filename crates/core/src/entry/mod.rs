//! Canonical budget entries, categories, and ingestion of upstream records.

pub mod category;
pub mod error;
pub mod ingest;
pub mod types;

pub use category::{Category, CategoryCatalog, VAT_COLLECTED, VAT_DEDUCTIBLE};
pub use error::IngestError;
pub use ingest::{
    Normalized, RawActualTransaction, RawCollection, RawCollectionData, RawEntry, RawPayment,
    RawRealBudgetItem, normalize_entries, normalize_real_budget_items, normalize_transactions,
};
pub use types::{
    AmountType, Collection, Derivation, Direction, Entry, FrequencyClass, Payment, Step,
};
