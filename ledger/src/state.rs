use aam_engine::{deposit, initial_pool, DepositOutcome};
use core_types::{
    validate::{positive, validate_config, validate_package},
    AamPool, OrderId, OrderMode, PackageConfig, SimulationConfig, StakingOrder, Tier,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LedgerError, Result},
    ledger::OrderLedger,
};

/// Everything the simulator persists. Transitions return a new value and
/// leave `self` untouched, so a rejected edit never leaks partial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub config: SimulationConfig,
    pub orders: OrderLedger,
    pub pool: AamPool,
}

/// Deposit request; `id` is generated when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub id: Option<OrderId>,
    pub amount: f64,
    pub mode: OrderMode,
    pub duration_days: Option<u32>,
    pub package_tier: Option<Tier>,
    pub start_day: u32,
}

impl OrderRequest {
    pub fn days(amount: f64, duration_days: u32) -> Self {
        Self {
            id: None,
            amount,
            mode: OrderMode::Days,
            duration_days: Some(duration_days),
            package_tier: None,
            start_day: 0,
        }
    }

    pub fn package(amount: f64, tier: Tier) -> Self {
        Self {
            id: None,
            amount,
            mode: OrderMode::Package,
            duration_days: None,
            package_tier: Some(tier),
            start_day: 0,
        }
    }

    pub fn starting_on(mut self, start_day: u32) -> Self {
        self.start_day = start_day;
        self
    }

    pub fn with_id(mut self, id: impl Into<OrderId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn into_order(self, id: OrderId) -> StakingOrder {
        StakingOrder {
            id,
            amount: self.amount,
            mode: self.mode,
            duration_days: self.duration_days,
            package_tier: self.package_tier,
            start_day: self.start_day,
        }
    }
}

/// Field-by-field edit of the global parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub initial_lp_usdc: Option<f64>,
    pub initial_lp_af: Option<f64>,
    pub deposit_lp_ratio: Option<f64>,
    pub deposit_buyback_ratio: Option<f64>,
    pub package_configs: Option<Vec<PackageConfig>>,
}

impl ConfigPatch {
    pub fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(value) = self.initial_lp_usdc {
            config.initial_lp_usdc = value;
        }
        if let Some(value) = self.initial_lp_af {
            config.initial_lp_af = value;
        }
        if let Some(value) = self.deposit_lp_ratio {
            config.deposit_lp_ratio = value;
        }
        if let Some(value) = self.deposit_buyback_ratio {
            config.deposit_buyback_ratio = value;
        }
        if let Some(packages) = &self.package_configs {
            config.package_configs = packages.clone();
        }
        config
    }
}

/// Tier-keyed edit of one package's release split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackagePatch {
    pub release_withdraw_percent: Option<f64>,
    pub release_keep_percent: Option<f64>,
    pub release_convert_percent: Option<f64>,
}

impl PackagePatch {
    pub fn split(withdraw: f64, keep: f64, convert: f64) -> Self {
        Self {
            release_withdraw_percent: Some(withdraw),
            release_keep_percent: Some(keep),
            release_convert_percent: Some(convert),
        }
    }

    fn apply(&self, pkg: &mut PackageConfig) {
        if let Some(value) = self.release_withdraw_percent {
            pkg.release_withdraw_percent = value;
        }
        if let Some(value) = self.release_keep_percent {
            pkg.release_keep_percent = value;
        }
        if let Some(value) = self.release_convert_percent {
            pkg.release_convert_percent = value;
        }
    }
}

/// Result of a config edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChange {
    /// Starting reserves changed, so the pool was rebuilt and the ledger emptied.
    pub pool_reset: bool,
}

impl SimulationState {
    /// Empty ledger and a fresh pool for `config`.
    pub fn initial(config: SimulationConfig) -> Self {
        let pool = initial_pool(&config);
        Self {
            config,
            orders: OrderLedger::new(),
            pool,
        }
    }

    /// Appends `order` and applies its deposit to the pool.
    pub fn with_order(&self, order: StakingOrder) -> Result<(Self, DepositOutcome)> {
        self.check_order(&order)?;
        let outcome = deposit(&self.pool, &self.config, order.amount);
        let mut next = self.clone();
        next.pool = outcome.pool.clone();
        next.orders.push(order);
        Ok((next, outcome))
    }

    /// Drops one order. The pool keeps the effect of its deposit.
    pub fn without_order(&self, id: &str) -> Option<Self> {
        let mut next = self.clone();
        next.orders.remove(id)?;
        Some(next)
    }

    /// Empties the ledger. The pool is left as is; see [`SimulationState::reset`].
    pub fn cleared(&self) -> Self {
        let mut next = self.clone();
        next.orders.clear();
        next
    }

    /// Empty ledger and fresh pool under the current config.
    pub fn reset(&self) -> Self {
        Self::initial(self.config.clone())
    }

    pub fn with_config_patch(&self, patch: &ConfigPatch) -> Result<(Self, ConfigChange)> {
        self.with_config(patch.apply(self.config.clone()))
    }

    /// Replaces the config wholesale. Changing either starting reserve
    /// rebuilds the pool and clears the ledger.
    pub fn with_config(&self, config: SimulationConfig) -> Result<(Self, ConfigChange)> {
        validate_config(&config)?;
        if !config.same_initial_reserves(&self.config) {
            return Ok((Self::initial(config), ConfigChange { pool_reset: true }));
        }
        let mut next = self.clone();
        next.config = config;
        Ok((next, ConfigChange { pool_reset: false }))
    }

    pub fn with_package_patch(&self, tier: Tier, patch: &PackagePatch) -> Result<Self> {
        let mut next = self.clone();
        let pkg = next
            .config
            .package_mut(tier)
            .ok_or_else(|| LedgerError::invalid("tier", format!("unknown tier {tier}")))?;
        patch.apply(pkg);
        validate_package(pkg)?;
        Ok(next)
    }

    fn check_order(&self, order: &StakingOrder) -> Result<()> {
        positive("amount", order.amount)?;
        if self.orders.contains(&order.id) {
            return Err(LedgerError::invalid(
                "id",
                format!("order {} already exists", order.id),
            ));
        }
        match order.mode {
            OrderMode::Days => match order.duration_days {
                Some(days) if days > 0 => {}
                _ => {
                    return Err(LedgerError::invalid(
                        "durationDays",
                        "days mode needs a duration of at least one day",
                    ))
                }
            },
            OrderMode::Package => {
                let tier = order.package_tier.ok_or_else(|| {
                    LedgerError::invalid("packageTier", "package mode needs a tier")
                })?;
                if self.config.package(tier).is_none() {
                    return Err(LedgerError::invalid(
                        "packageTier",
                        format!("unknown tier {tier}"),
                    ));
                }
            }
        }
        Ok(())
    }
}
