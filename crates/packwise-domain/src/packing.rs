//! Packing list types

use serde::{Deserialize, Serialize};

/// One line of a packing list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
    /// Item name
    pub item: String,
    /// How many to bring; always at least 1
    pub quantity: u32,
}

impl PackingItem {
    /// Create an item
    ///
    /// Returns `None` if the name is blank or the quantity is zero.
    pub fn new(item: impl Into<String>, quantity: u32) -> Option<Self> {
        let item = item.into();
        if item.trim().is_empty() || quantity == 0 {
            return None;
        }
        Some(Self { item, quantity })
    }
}

/// Terminal artifact of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingListResult {
    /// Destination as requested
    pub destination: String,
    /// Trip length in days
    pub days: u32,
    /// Answer-engine summary the list was grounded on
    pub summary: String,
    /// Items in model order
    pub items: Vec<PackingItem>,
}

impl PackingListResult {
    /// Look up an item by exact name
    pub fn find(&self, item: &str) -> Option<&PackingItem> {
        self.items.iter().find(|i| i.item == item)
    }

    /// Check the structural invariants every returned list must hold
    pub fn is_well_formed(&self) -> bool {
        !self.summary.trim().is_empty()
            && !self.items.is_empty()
            && self.items.iter().all(|i| i.quantity >= 1 && !i.item.trim().is_empty())
    }
}
