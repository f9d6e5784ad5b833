//! Visibility of entries under a frequency filter.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use treso_shared::types::EntryId;

use crate::entry::{Derivation, Entry, FrequencyClass};

/// Frequency filter of the forecast table.
///
/// Base entries are visible when their frequency is selected. A derived
/// entry is visible only through the entries it derives from: a VAT child
/// with its parent, a VAT payment with any of its associated entries. Tax
/// payments derive from transactions and are filtered as one-time entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityFilter {
    /// Selected frequencies. Empty selects everything.
    #[serde(default)]
    pub frequencies: HashSet<FrequencyClass>,
}

impl VisibilityFilter {
    /// A filter that hides nothing.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter selecting `frequencies`.
    #[must_use]
    pub fn only(frequencies: impl IntoIterator<Item = FrequencyClass>) -> Self {
        Self {
            frequencies: frequencies.into_iter().collect(),
        }
    }

    /// Returns true if `frequency` is selected.
    #[must_use]
    pub fn admits(&self, frequency: FrequencyClass) -> bool {
        self.frequencies.is_empty() || self.frequencies.contains(&frequency)
    }

    /// Visible entries, in input order.
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        if self.frequencies.is_empty() {
            return entries.iter().collect();
        }
        let visible_bases: HashSet<&EntryId> = entries
            .iter()
            .filter(|e| !e.is_derived() && self.admits(e.frequency))
            .map(|e| &e.id)
            .collect();
        entries
            .iter()
            .filter(|e| match &e.derivation {
                None => visible_bases.contains(&e.id),
                Some(Derivation::VatChild { parent_id }) => visible_bases.contains(parent_id),
                Some(Derivation::VatPayment {
                    associated_entry_ids,
                }) => associated_entry_ids
                    .iter()
                    .any(|id| visible_bases.contains(id)),
                Some(Derivation::TaxPayment { .. }) => self.admits(e.frequency),
            })
            .collect()
    }
}
