//! Stock registry for filter cartridges and other consumables.

use thiserror::Error;
use tracing::instrument;

use zhunan_crm_core::{InventoryItem, InventoryItemId};

/// Inventory operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("庫存項目不存在")]
    NotFound(InventoryItemId),
}

/// The store's stock list, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct InventoryRegistry {
    items: Vec<InventoryItem>,
}

impl InventoryRegistry {
    #[must_use]
    pub const fn with_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn all(&self) -> &[InventoryItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: InventoryItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items whose name or item code contains `term`, ignoring case.
    ///
    /// An absent or empty term matches everything.
    #[must_use]
    pub fn search(&self, term: Option<&str>) -> Vec<&InventoryItem> {
        match term.filter(|t| !t.is_empty()) {
            None => self.items.iter().collect(),
            Some(term) => {
                let needle = term.to_lowercase();
                self.items.iter().filter(|item| item.matches(&needle)).collect()
            }
        }
    }

    /// Set the counted stock of one item.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub fn update_stock(
        &mut self,
        id: InventoryItemId,
        stock_quantity: u32,
    ) -> Result<InventoryItem, InventoryError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(InventoryError::NotFound(id))?;

        tracing::debug!(previous = item.stock_quantity, "Stock quantity set");
        item.stock_quantity = stock_quantity;
        Ok(item.clone())
    }
}
