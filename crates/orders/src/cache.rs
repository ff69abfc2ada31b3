//! Display-model cache.
//!
//! Cached reads are invalidated after a successful mutation, never patched in
//! place — callers re-fetch from the store rather than reapplying deltas and
//! drifting from the authoritative state.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::display::OrderDisplay;
use crate::order::OrderId;

/// In-memory cache of normalized aggregates, keyed by order header id.
#[derive(Debug, Default)]
pub struct AggregateCache {
    entries: RwLock<HashMap<OrderId, OrderDisplay>>,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, order_id: OrderId) -> Option<OrderDisplay> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&order_id)
            .cloned()
    }

    pub fn put(&self, order_id: OrderId, display: OrderDisplay) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(order_id, display);
    }

    /// Drop one aggregate after a mutation touched it.
    pub fn invalidate(&self, order_id: OrderId) {
        tracing::debug!(%order_id, "invalidating cached aggregate");
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&order_id);
    }

    /// Drop everything (e.g. after creating a new order shifts the list view).
    pub fn clear(&self) {
        tracing::debug!("clearing aggregate cache");
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerId;
    use crate::display::CustomerDisplay;
    use bloomframe_core::RecordId;

    fn display() -> OrderDisplay {
        OrderDisplay {
            customer: CustomerDisplay {
                customer_id: CustomerId::new(RecordId::new()),
                display_name: "Ann Price".into(),
                title: None,
                first_name: "Ann".into(),
                surname: "Price".into(),
                email: "ann@example.com".into(),
                telephone: "0123".into(),
                how_recommended: None,
            },
            order: None,
            frames: Vec::new(),
            paperweight: None,
        }
    }

    #[test]
    fn invalidate_removes_only_that_order() {
        let cache = AggregateCache::new();
        let a = OrderId::new(RecordId::new());
        let b = OrderId::new(RecordId::new());
        cache.put(a, display());
        cache.put(b, display());

        cache.invalidate(a);
        assert!(cache.get(a).is_none());
        assert!(cache.get(b).is_some());

        cache.clear();
        assert!(cache.get(b).is_none());
    }
}
