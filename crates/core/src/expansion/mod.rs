//! Entry expansion: VAT split and synthetic VAT/tax payment entries.

pub mod due;
pub mod error;
pub mod service;
pub mod tax;
pub mod types;
pub mod vat;

#[cfg(test)]
mod tests;

pub use due::{STATE, TAX_PAYMENT_CATEGORY, VAT_PAYMENT_CATEGORY};
pub use error::ExpansionError;
pub use service::EntryExpander;
pub use types::{
    ExpansionInput, ExpansionMode, Periodicity, RegimeType, TaxBase, TaxConfig, VatRegime,
};
pub use vat::{VAT_CHILD_SUFFIX, split_gross};
