//! Consumable stock kept in the store.

use serde::{Deserialize, Serialize};

use super::id::InventoryItemId;

/// One stocked part, e.g. a filter cartridge for a specific purifier series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    /// Supplier part code, e.g. `E009` or `Y100(五代)`.
    pub item_code: String,
    /// Sales unit, e.g. `1組` or `1支`.
    pub specification: String,
    /// Unit price in NTD.
    pub price: u32,
    pub stock_quantity: u32,
}

impl InventoryItem {
    /// Returns true if `needle` (already lower-cased) occurs in the name or
    /// item code, ignoring case.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.item_code.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_name_or_code() {
        let item = InventoryItem {
            id: InventoryItemId::new(1),
            name: "R-RO膜 贈廢水比".to_string(),
            item_code: "Y008(五代)/Z013-1廢水比400".to_string(),
            specification: "1支".to_string(),
            price: 2250,
            stock_quantity: 100,
        };

        assert!(item.matches("r-ro"));
        assert!(item.matches("y008"));
        assert!(item.matches("廢水比"));
        assert!(!item.matches("e009"));
    }
}
