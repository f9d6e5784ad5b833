//! Category catalog used for grouping and VAT child categorization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use treso_shared::types::CategoryId;

use super::types::Direction;

/// Category receiving the VAT split out of gross inflows.
pub const VAT_COLLECTED: &str = "VAT collected";

/// Category receiving the VAT split out of gross outflows.
pub const VAT_DEDUCTIBLE: &str = "VAT deductible";

/// A budget category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Main category this one belongs to. `None` for main categories.
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<CategoryId>,
}

/// Lookup over the configured categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    by_id: HashMap<CategoryId, Category>,
}

impl CategoryCatalog {
    /// Builds a catalog. Later duplicates replace earlier ones.
    #[must_use]
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            by_id: categories
                .into_iter()
                .map(|category| (category.id.clone(), category))
                .collect(),
        }
    }

    /// Returns a category by ID.
    #[must_use]
    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.by_id.get(id)
    }

    /// Main category of `id`. Unknown categories are their own main category.
    #[must_use]
    pub fn main_category(&self, id: &CategoryId) -> CategoryId {
        let mut current = id;
        // Bounded walk so a cyclic catalog cannot loop forever.
        for _ in 0..=self.by_id.len() {
            match self.by_id.get(current).and_then(|c| c.parent_id.as_ref()) {
                Some(parent) if parent != current => current = parent,
                _ => break,
            }
        }
        current.clone()
    }

    /// Category receiving the VAT of a gross entry of the given direction.
    ///
    /// Uses a configured category with the conventional name when there is
    /// one, otherwise the conventional name itself.
    #[must_use]
    pub fn vat_category(&self, direction: Direction) -> CategoryId {
        let name = match direction {
            Direction::Inflow => VAT_COLLECTED,
            Direction::Outflow => VAT_DEDUCTIBLE,
        };
        self.by_id
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map_or_else(|| CategoryId::new(name), |c| c.id.clone())
    }
}
