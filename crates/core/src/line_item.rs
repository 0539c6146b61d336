//! Line-item total rules.
//!
//! Reads and writes share one multiplication rule: a missing quantity or
//! unit price counts as zero. The write path bakes the product into
//! `total_price`; the read path only uses it when no total is stored.

/// The three amount fields of a line item.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemAmounts {
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
}

impl ItemAmounts {
    pub fn new(quantity: Option<f64>, unit_price: Option<f64>, total_price: Option<f64>) -> Self {
        Self {
            quantity,
            unit_price,
            total_price,
        }
    }

    /// `quantity * unit_price`, missing operands as 0.
    pub fn extended(&self) -> f64 {
        self.quantity.unwrap_or(0.0) * self.unit_price.unwrap_or(0.0)
    }

    /// The item's contribution to a roll-up: the stored total if present,
    /// otherwise the extended amount.
    pub fn line_total(&self) -> f64 {
        self.total_price.unwrap_or_else(|| self.extended())
    }
}

/// Total to persist when adding an item. Always concrete and finite; a
/// product that overflows is stored as 0.
pub fn total_for_insert(input: &ItemAmounts) -> f64 {
    Some(input.line_total())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Total to persist for a partial update, or `None` to leave the stored
/// total untouched.
///
/// An explicit total always wins. Otherwise, when quantity or unit price
/// changes, the total is recomputed from the patched values merged over
/// the stored ones.
pub fn total_for_update(patch: &ItemAmounts, stored: &ItemAmounts) -> Option<f64> {
    if patch.total_price.is_some() {
        return patch.total_price;
    }
    if patch.quantity.is_none() && patch.unit_price.is_none() {
        return None;
    }
    let merged = ItemAmounts {
        quantity: patch.quantity.or(stored.quantity),
        unit_price: patch.unit_price.or(stored.unit_price),
        total_price: None,
    };
    Some(merged.extended()).filter(|v| v.is_finite())
}
