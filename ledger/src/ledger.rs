use core_types::{OrderId, StakingOrder, Tier};
use serde::{Deserialize, Serialize};

/// Deposits in insertion order.
///
/// The ledger alone never touches the pool; inserts go through
/// [`SimulationState::with_order`](crate::state::SimulationState::with_order)
/// so the deposit and the pool update land together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLedger {
    orders: Vec<StakingOrder>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_orders(orders: Vec<StakingOrder>) -> Self {
        Self { orders }
    }

    pub fn list(&self) -> &[StakingOrder] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&StakingOrder> {
        self.orders.iter().find(|order| order.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_deposited(&self) -> f64 {
        self.orders.iter().map(|order| order.amount).sum()
    }

    pub fn orders_for_tier(&self, tier: Tier) -> impl Iterator<Item = &StakingOrder> {
        self.orders
            .iter()
            .filter(move |order| order.package_tier == Some(tier))
    }

    pub fn ids(&self) -> impl Iterator<Item = &OrderId> {
        self.orders.iter().map(|order| &order.id)
    }

    pub(crate) fn push(&mut self, order: StakingOrder) {
        self.orders.push(order);
    }

    /// Removes the order with `id`; absent ids are ignored.
    pub(crate) fn remove(&mut self, id: &str) -> Option<StakingOrder> {
        let idx = self.orders.iter().position(|order| order.id == id)?;
        Some(self.orders.remove(idx))
    }

    pub(crate) fn clear(&mut self) {
        self.orders.clear();
    }
}
