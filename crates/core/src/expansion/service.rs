//! Entry expander service.

use tracing::{debug, warn};

use super::tax::tax_payments;
use super::types::{ExpansionInput, ExpansionMode};
use super::vat::{split_gross, vat_payments};
use crate::entry::Entry;

/// Stateless entry expander.
pub struct EntryExpander;

impl EntryExpander {
    /// Expands `entries` with VAT children and payment-due entries.
    ///
    /// 1. Every gross entry whose VAT part exceeds one cent is replaced by
    ///    its net entry followed by its VAT child.
    /// 2. One VAT payment per display period with a VAT balance.
    /// 3. One tax payment per declaration window and configured tax.
    ///
    /// Steps 2 and 3 are skipped in consolidated mode or when there is at
    /// most one period. Payment-due entries already present in `entries` are
    /// dropped and regenerated, so expanding twice equals expanding once. A
    /// failing step produces no entries and is logged; the rest of the
    /// expansion goes on.
    #[must_use]
    pub fn expand(entries: &[Entry], input: &ExpansionInput<'_>) -> Vec<Entry> {
        let mut expanded = Vec::with_capacity(entries.len());
        for entry in entries.iter().filter(|e| !e.is_payment_due()) {
            match split_gross(entry, input.categories) {
                Some((net, child)) => {
                    expanded.push(net);
                    expanded.push(child);
                }
                None => expanded.push(entry.clone()),
            }
        }

        if input.mode == ExpansionMode::Consolidated || input.periods.len() <= 1 {
            return expanded;
        }

        let mut synthetic = Vec::new();
        if let Some(regime) = input.vat_regime {
            match vat_payments(&expanded, input.periods, regime, input.cache) {
                Ok(payments) => synthetic.extend(payments),
                Err(err) => warn!(regime = %regime.name, error = %err, "VAT payments skipped"),
            }
        }
        for tax in input.taxes {
            match tax_payments(tax, input.periods, input.transactions) {
                Ok(payments) => synthetic.extend(payments),
                Err(err) => warn!(tax = %tax.tax_type, error = %err, "Tax payments skipped"),
            }
        }

        debug!(
            base = entries.len(),
            expanded = expanded.len(),
            synthetic = synthetic.len(),
            "Entries expanded"
        );
        expanded.extend(synthetic);
        expanded
    }
}
