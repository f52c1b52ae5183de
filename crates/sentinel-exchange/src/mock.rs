//! In-memory [`ExchangeClient`] for tests and dry runs against canned data.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use sentinel_core::{PositionSnapshot, RestingOrder};

use crate::client::{BoxFuture, ExchangeClient};
use crate::error::{SourceError, SourceResult};

#[derive(Default)]
struct MockState {
    positions: Option<SourceResult<Vec<PositionSnapshot>>>,
    orders: HashMap<String, SourceResult<Vec<RestingOrder>>>,
    position_calls: usize,
    order_calls: Vec<String>,
}

/// Scriptable exchange.
///
/// Clones share state, so a test can keep a handle while the scheduler owns
/// another. Symbols with no scripted orders return an empty list.
#[derive(Clone, Default)]
pub struct MockExchange {
    state: Arc<Mutex<MockState>>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_positions(&self, positions: Vec<PositionSnapshot>) {
        self.state.lock().positions = Some(Ok(positions));
    }

    pub fn fail_positions(&self, error: SourceError) {
        self.state.lock().positions = Some(Err(error));
    }

    pub fn set_orders(&self, symbol: &str, orders: Vec<RestingOrder>) {
        self.state.lock().orders.insert(symbol.to_string(), Ok(orders));
    }

    pub fn fail_orders(&self, symbol: &str, error: SourceError) {
        self.state.lock().orders.insert(symbol.to_string(), Err(error));
    }

    pub fn clear_orders(&self, symbol: &str) {
        self.state.lock().orders.remove(symbol);
    }

    pub fn position_calls(&self) -> usize {
        self.state.lock().position_calls
    }

    /// Symbols queried for open orders, in call order.
    pub fn order_calls(&self) -> Vec<String> {
        self.state.lock().order_calls.clone()
    }
}

impl ExchangeClient for MockExchange {
    fn positions(&self) -> BoxFuture<'_, SourceResult<Vec<PositionSnapshot>>> {
        let result = {
            let mut state = self.state.lock();
            state.position_calls += 1;
            state.positions.clone().unwrap_or_else(|| Ok(Vec::new()))
        };
        Box::pin(async move { result })
    }

    fn open_orders<'a>(
        &'a self,
        symbol: &'a str,
    ) -> BoxFuture<'a, SourceResult<Vec<RestingOrder>>> {
        let result = {
            let mut state = self.state.lock();
            state.order_calls.push(symbol.to_string());
            state
                .orders
                .get(symbol)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        };
        Box::pin(async move { result })
    }
}
