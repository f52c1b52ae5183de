//! Per-symbol open order lookup fed to the tracker.

use std::collections::HashMap;

use sentinel_core::RestingOrder;

/// Source of already-fetched resting orders for a cycle.
///
/// `None` means the orders for that symbol could not be read this cycle,
/// which is different from an empty list (no orders resting).
pub trait OrderLookup {
    fn orders_for(&self, symbol: &str) -> Option<&[RestingOrder]>;
}

impl OrderLookup for HashMap<String, Vec<RestingOrder>> {
    fn orders_for(&self, symbol: &str) -> Option<&[RestingOrder]> {
        self.get(symbol).map(Vec::as_slice)
    }
}

/// Lookup with no data for any symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOrders;

impl OrderLookup for NoOrders {
    fn orders_for(&self, _symbol: &str) -> Option<&[RestingOrder]> {
        None
    }
}
