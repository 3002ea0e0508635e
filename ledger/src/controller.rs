use aam_engine::DepositOutcome;
use core_types::{
    uid::{OrderIdGenerator, OrderUidInput},
    AamPool, OrderId, SimulationConfig, StakingOrder, Tier,
};
use log::{error, info, warn};
use parking_lot::{Mutex, RwLock, RwLockWriteGuard};

use crate::{
    error::Result,
    reconcile::reconcile,
    state::{ConfigChange, ConfigPatch, OrderRequest, PackagePatch, SimulationState},
    storage::StateStore,
};

/// Deposit accepted into the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub id: OrderId,
    pub outcome: DepositOutcome,
}

/// Single writer over [`SimulationState`].
///
/// Each mutation builds the successor state off to the side and swaps it in
/// under the write lock, so readers never observe a ledger/pool mismatch. The
/// save hook runs before the lock is released so snapshots are written in
/// mutation order.
pub struct SimulationController {
    defaults: SimulationConfig,
    state: RwLock<SimulationState>,
    ids: Mutex<OrderIdGenerator>,
    store: Box<dyn StateStore>,
}

impl SimulationController {
    pub fn bootstrap(defaults: SimulationConfig, store: Box<dyn StateStore>) -> Self {
        Self::bootstrap_with_ids(defaults, store, OrderIdGenerator::from_clock())
    }

    pub fn bootstrap_with_ids(
        defaults: SimulationConfig,
        store: Box<dyn StateStore>,
        ids: OrderIdGenerator,
    ) -> Self {
        let state = match store.load() {
            Some(persisted) => reconcile(persisted, &defaults).state,
            None => {
                info!("no prior simulation state; starting from defaults");
                SimulationState::initial(defaults.clone())
            }
        };
        Self {
            defaults,
            state: RwLock::new(state),
            ids: Mutex::new(ids),
            store,
        }
    }

    pub fn snapshot(&self) -> SimulationState {
        self.state.read().clone()
    }

    /// Runs `f` against a consistent view of the state.
    pub fn read<R>(&self, f: impl FnOnce(&SimulationState) -> R) -> R {
        f(&self.state.read())
    }

    pub fn config(&self) -> SimulationConfig {
        self.read(|state| state.config.clone())
    }

    pub fn pool(&self) -> AamPool {
        self.read(|state| state.pool.clone())
    }

    pub fn orders(&self) -> Vec<StakingOrder> {
        self.read(|state| state.orders.list().to_vec())
    }

    pub fn defaults(&self) -> &SimulationConfig {
        &self.defaults
    }

    pub fn insert_order(&self, request: OrderRequest) -> Result<OrderReceipt> {
        let guard = self.state.write();
        let id = match request.id.clone() {
            Some(id) => id,
            None => self.next_order_id(&guard, &request),
        };
        let (next, outcome) = guard.with_order(request.into_order(id.clone()))?;
        info!(
            "order {} accepted: lp +{:.4} USDC, bought {:.4} AF for {:.4} USDC, price {:.6}",
            id, outcome.to_lp, outcome.af_bought, outcome.buyback_usdc, outcome.pool.af_price
        );
        self.commit(guard, next);
        Ok(OrderReceipt { id, outcome })
    }

    /// Returns whether an order was removed; unknown ids are not an error.
    pub fn remove_order(&self, id: &str) -> bool {
        let guard = self.state.write();
        match guard.without_order(id) {
            Some(next) => {
                info!("order {} removed", id);
                self.commit(guard, next);
                true
            }
            None => false,
        }
    }

    pub fn clear_orders(&self) {
        let guard = self.state.write();
        let next = guard.cleared();
        info!("cleared {} orders", guard.orders.len());
        self.commit(guard, next);
    }

    pub fn update_config(&self, patch: &ConfigPatch) -> Result<ConfigChange> {
        let guard = self.state.write();
        let (next, change) = guard.with_config_patch(patch).inspect_err(|err| {
            warn!("config edit rejected: {err}");
        })?;
        self.log_config_change(&guard, change);
        self.commit(guard, next);
        Ok(change)
    }

    pub fn replace_config(&self, config: SimulationConfig) -> Result<ConfigChange> {
        let guard = self.state.write();
        let (next, change) = guard.with_config(config).inspect_err(|err| {
            warn!("config replacement rejected: {err}");
        })?;
        self.log_config_change(&guard, change);
        self.commit(guard, next);
        Ok(change)
    }

    pub fn update_package(&self, tier: Tier, patch: &PackagePatch) -> Result<()> {
        let guard = self.state.write();
        let next = guard.with_package_patch(tier, patch).inspect_err(|err| {
            warn!("package edit rejected: {err}");
        })?;
        self.commit(guard, next);
        Ok(())
    }

    /// Empty ledger and fresh pool; the current config is kept.
    pub fn reset(&self) {
        let guard = self.state.write();
        let next = guard.reset();
        info!("simulation reset");
        self.commit(guard, next);
    }

    /// Back to the built-in parameter table with an empty ledger.
    pub fn restore_defaults(&self) {
        let guard = self.state.write();
        let next = SimulationState::initial(self.defaults.clone());
        info!("restored default parameters");
        self.commit(guard, next);
    }

    fn next_order_id(&self, state: &SimulationState, request: &OrderRequest) -> OrderId {
        let input = OrderUidInput {
            amount: request.amount,
            mode: request.mode,
            duration_days: request.duration_days,
            package_tier: request.package_tier,
            start_day: request.start_day,
        };
        let mut ids = self.ids.lock();
        loop {
            let id = ids.next_id(&input);
            if !state.orders.contains(&id) {
                return id;
            }
        }
    }

    fn log_config_change(&self, current: &SimulationState, change: ConfigChange) {
        if change.pool_reset {
            info!(
                "starting reserves changed; pool reset and {} orders cleared",
                current.orders.len()
            );
        }
    }

    fn commit(&self, mut guard: RwLockWriteGuard<'_, SimulationState>, next: SimulationState) {
        *guard = next;
        if let Err(err) = self.store.save(&guard) {
            error!("failed to persist simulation state: {}", err);
        }
    }
}
