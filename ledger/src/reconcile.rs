//! Merges a loaded snapshot against the current default table.
//!
//! Snapshots are versioned only by which fields they carry. Anything missing
//! is filled from the defaults, and the pool is rebuilt when it cannot belong
//! to the merged config.

use aam_engine::initial_pool;
use core_types::{
    defaults::{
        DEFAULT_RELEASE_CONVERT_PERCENT, DEFAULT_RELEASE_KEEP_PERCENT,
        DEFAULT_RELEASE_WITHDRAW_PERCENT,
    },
    validate::{non_negative, percent},
    AamPool, InvalidArgument, PackageConfig, SimulationConfig, StakingOrder, Tier,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{ledger::OrderLedger, state::SimulationState};

/// Price assumed for a config without AF reserves.
pub const FALLBACK_INITIAL_PRICE: f64 = 0.1;
/// A persisted price further than this from the expected starting price is
/// stale when no orders explain the difference.
pub const STALE_PRICE_TOLERANCE: f64 = 0.0001;

/// Snapshot as read from storage; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub config: Option<PersistedConfig>,
    pub orders: Option<Vec<StakingOrder>>,
    pub pool: Option<AamPool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedConfig {
    pub initial_lp_usdc: Option<f64>,
    pub initial_lp_af: Option<f64>,
    pub deposit_lp_ratio: Option<f64>,
    pub deposit_buyback_ratio: Option<f64>,
    pub package_configs: Option<Vec<PersistedPackageConfig>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedPackageConfig {
    pub tier: Option<Tier>,
    pub release_withdraw_percent: Option<f64>,
    pub release_keep_percent: Option<f64>,
    pub release_convert_percent: Option<f64>,
}

impl From<&PackageConfig> for PersistedPackageConfig {
    fn from(pkg: &PackageConfig) -> Self {
        Self {
            tier: Some(pkg.tier),
            release_withdraw_percent: Some(pkg.release_withdraw_percent),
            release_keep_percent: Some(pkg.release_keep_percent),
            release_convert_percent: Some(pkg.release_convert_percent),
        }
    }
}

impl From<&SimulationConfig> for PersistedConfig {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            initial_lp_usdc: Some(config.initial_lp_usdc),
            initial_lp_af: Some(config.initial_lp_af),
            deposit_lp_ratio: Some(config.deposit_lp_ratio),
            deposit_buyback_ratio: Some(config.deposit_buyback_ratio),
            package_configs: Some(config.package_configs.iter().map(Into::into).collect()),
        }
    }
}

impl From<&SimulationState> for PersistedState {
    fn from(state: &SimulationState) -> Self {
        Self {
            config: Some((&state.config).into()),
            orders: Some(state.orders.list().to_vec()),
            pool: Some(state.pool.clone()),
        }
    }
}

/// What happened to the persisted pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolDecision {
    Kept,
    Missing,
    StalePrice { persisted: f64, expected: f64 },
}

impl PoolDecision {
    pub fn reset(&self) -> bool {
        !matches!(self, PoolDecision::Kept)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub state: SimulationState,
    pub pool: PoolDecision,
}

pub fn reconcile(persisted: PersistedState, defaults: &SimulationConfig) -> Reconciled {
    let config = merge_config(persisted.config.unwrap_or_default(), defaults);
    let orders = persisted.orders.unwrap_or_default();
    let expected = expected_initial_price(&config);
    let (pool, decision) = match persisted.pool {
        None => (initial_pool(&config), PoolDecision::Missing),
        Some(pool) if orders.is_empty() && (pool.af_price - expected).abs() > STALE_PRICE_TOLERANCE => {
            let decision = PoolDecision::StalePrice {
                persisted: pool.af_price,
                expected,
            };
            (initial_pool(&config), decision)
        }
        Some(pool) => (pool, PoolDecision::Kept),
    };

    match decision {
        PoolDecision::Kept => info!(
            "restored {} orders; pool price {:.6}",
            orders.len(),
            pool.af_price
        ),
        PoolDecision::Missing => info!("no persisted pool; starting from configured reserves"),
        PoolDecision::StalePrice {
            persisted,
            expected,
        } => warn!(
            "persisted pool price {persisted:.6} does not match starting price {expected:.6} with no orders; pool reset"
        ),
    }

    Reconciled {
        state: SimulationState {
            config,
            orders: OrderLedger::from_orders(orders),
            pool,
        },
        pool: decision,
    }
}

fn expected_initial_price(config: &SimulationConfig) -> f64 {
    if config.initial_lp_af > 0.0 {
        config.initial_lp_usdc / config.initial_lp_af
    } else {
        FALLBACK_INITIAL_PRICE
    }
}

/// Field-wise merge. Absent or invalid values fall back to the defaults.
fn merge_config(persisted: PersistedConfig, defaults: &SimulationConfig) -> SimulationConfig {
    SimulationConfig {
        initial_lp_usdc: checked_or(
            "initialLpUsdc",
            persisted.initial_lp_usdc,
            defaults.initial_lp_usdc,
            non_negative,
        ),
        initial_lp_af: checked_or(
            "initialLpAf",
            persisted.initial_lp_af,
            defaults.initial_lp_af,
            non_negative,
        ),
        deposit_lp_ratio: checked_or(
            "depositLpRatio",
            persisted.deposit_lp_ratio,
            defaults.deposit_lp_ratio,
            percent,
        ),
        deposit_buyback_ratio: checked_or(
            "depositBuybackRatio",
            persisted.deposit_buyback_ratio,
            defaults.deposit_buyback_ratio,
            percent,
        ),
        package_configs: match persisted.package_configs {
            Some(packages) => merge_packages(packages, &defaults.package_configs),
            None => defaults.package_configs.clone(),
        },
    }
}

fn checked_or(
    field: &str,
    value: Option<f64>,
    fallback: f64,
    check: fn(&str, f64) -> Result<(), InvalidArgument>,
) -> f64 {
    let Some(value) = value else {
        return fallback;
    };
    match check(field, value) {
        Ok(()) => value,
        Err(err) => {
            warn!("persisted {err}; using {fallback}");
            fallback
        }
    }
}

/// Position-wise overlay of persisted packages onto the default table.
/// Default positions the snapshot does not reach are carried over. The first
/// entry for a tier wins; later duplicates are dropped.
fn merge_packages(
    persisted: Vec<PersistedPackageConfig>,
    defaults: &[PackageConfig],
) -> Vec<PackageConfig> {
    let len = persisted.len().max(defaults.len());
    let mut persisted = persisted.into_iter();
    let mut merged: Vec<PackageConfig> = Vec::with_capacity(len);
    for idx in 0..len {
        let base = defaults.get(idx);
        let pkg = match persisted.next() {
            Some(pkg) => {
                let Some(tier) = pkg.tier.or(base.map(|b| b.tier)) else {
                    warn!("dropping persisted package at position {idx}: no tier");
                    continue;
                };
                PackageConfig {
                    tier,
                    release_withdraw_percent: checked_or(
                        "releaseWithdrawPercent",
                        pkg.release_withdraw_percent,
                        base.map_or(DEFAULT_RELEASE_WITHDRAW_PERCENT, |b| {
                            b.release_withdraw_percent
                        }),
                        non_negative,
                    ),
                    release_keep_percent: checked_or(
                        "releaseKeepPercent",
                        pkg.release_keep_percent,
                        base.map_or(DEFAULT_RELEASE_KEEP_PERCENT, |b| b.release_keep_percent),
                        non_negative,
                    ),
                    release_convert_percent: checked_or(
                        "releaseConvertPercent",
                        pkg.release_convert_percent,
                        base.map_or(DEFAULT_RELEASE_CONVERT_PERCENT, |b| {
                            b.release_convert_percent
                        }),
                        non_negative,
                    ),
                }
            }
            None => match base {
                Some(base) => base.clone(),
                None => continue,
            },
        };
        if merged.iter().any(|existing| existing.tier == pkg.tier) {
            warn!(
                "dropping package at position {idx}: tier {} already configured",
                pkg.tier
            );
            continue;
        }
        merged.push(pkg);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use aam_engine::apply_deposit;
    use core_types::OrderMode;

    fn order(id: &str, amount: f64) -> StakingOrder {
        StakingOrder {
            id: id.to_string(),
            amount,
            mode: OrderMode::Days,
            duration_days: Some(30),
            package_tier: None,
            start_day: 0,
        }
    }

    fn traded_state() -> SimulationState {
        let config = SimulationConfig::default();
        let mut state = SimulationState::initial(config.clone());
        state.pool = apply_deposit(&state.pool, &config, 2_500.0);
        state.orders = OrderLedger::from_orders(vec![order("a", 2_500.0)]);
        state
    }

    #[test]
    fn full_snapshot_round_trips_unchanged() {
        let state = traded_state();
        let out = reconcile(PersistedState::from(&state), &state.config);
        assert_eq!(out.pool, PoolDecision::Kept);
        assert_eq!(out.state, state);
    }

    #[test]
    fn empty_snapshot_uses_defaults() {
        let defaults = SimulationConfig::default();
        let out = reconcile(PersistedState::default(), &defaults);
        assert_eq!(out.state, SimulationState::initial(defaults));
        assert_eq!(out.pool, PoolDecision::Missing);
    }

    #[test]
    fn missing_fields_filled_from_defaults() {
        let defaults = SimulationConfig::default();
        let persisted = PersistedState {
            config: Some(PersistedConfig {
                deposit_lp_ratio: Some(70.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = reconcile(persisted, &defaults);
        assert_eq!(out.state.config.deposit_lp_ratio, 70.0);
        assert_eq!(out.state.config.initial_lp_usdc, defaults.initial_lp_usdc);
        assert_eq!(out.state.config.package_configs, defaults.package_configs);
    }

    #[test]
    fn packages_overlay_by_position_and_backfill_split() {
        let defaults = SimulationConfig::default();
        let persisted = PersistedConfig {
            package_configs: Some(vec![
                PersistedPackageConfig {
                    tier: Some(1),
                    release_withdraw_percent: Some(80.0),
                    ..Default::default()
                },
                PersistedPackageConfig {
                    release_keep_percent: Some(5.0),
                    ..Default::default()
                },
                PersistedPackageConfig::default(),
                PersistedPackageConfig::default(),
                PersistedPackageConfig {
                    tier: Some(9),
                    ..Default::default()
                },
                PersistedPackageConfig::default(),
            ]),
            ..Default::default()
        };
        let config = merge_config(persisted, &defaults);
        assert_eq!(config.package_configs.len(), 5);

        let first = &config.package_configs[0];
        assert_eq!(first.release_withdraw_percent, 80.0);
        assert_eq!(first.release_keep_percent, 20.0);

        let second = &config.package_configs[1];
        assert_eq!(second.tier, 2);
        assert_eq!(second.release_keep_percent, 5.0);

        let extra = &config.package_configs[4];
        assert_eq!(extra.tier, 9);
        assert_eq!(
            (
                extra.release_withdraw_percent,
                extra.release_keep_percent,
                extra.release_convert_percent
            ),
            (60.0, 20.0, 20.0)
        );
    }

    #[test]
    fn short_package_list_keeps_later_defaults() {
        let defaults = SimulationConfig::default();
        let persisted = vec![PersistedPackageConfig {
            tier: Some(1),
            release_convert_percent: Some(40.0),
            ..Default::default()
        }];
        let merged = merge_packages(persisted, &defaults.package_configs);
        assert_eq!(merged.len(), defaults.package_configs.len());
        assert_eq!(merged[0].release_convert_percent, 40.0);
        assert_eq!(merged[1..], defaults.package_configs[1..]);
    }

    #[test]
    fn stale_pool_without_orders_is_reset() {
        let defaults = SimulationConfig::default();
        let mut pool = initial_pool(&defaults);
        pool.af_price = 0.5;
        let persisted = PersistedState {
            pool: Some(pool),
            ..Default::default()
        };
        let out = reconcile(persisted, &defaults);
        assert!(out.pool.reset());
        assert_eq!(out.state.pool, initial_pool(&defaults));
    }

    #[test]
    fn drifted_pool_with_orders_is_kept() {
        let state = traded_state();
        let mut persisted = PersistedState::from(&state);
        if let Some(config) = persisted.config.as_mut() {
            config.initial_lp_usdc = Some(99_999.0);
        }
        let out = reconcile(persisted, &state.config);
        assert_eq!(out.pool, PoolDecision::Kept);
        assert_eq!(out.state.pool, state.pool);
        assert_eq!(out.state.config.initial_lp_usdc, 99_999.0);
    }

    #[test]
    fn matching_pool_without_orders_is_kept() {
        let defaults = SimulationConfig::default();
        let mut pool = initial_pool(&defaults);
        pool.af_price += STALE_PRICE_TOLERANCE / 2.0;
        let persisted = PersistedState {
            pool: Some(pool.clone()),
            ..Default::default()
        };
        let out = reconcile(persisted, &defaults);
        assert_eq!(out.pool, PoolDecision::Kept);
        assert_eq!(out.state.pool, pool);
    }

    #[test]
    fn zero_af_config_expects_fallback_price() {
        let defaults = SimulationConfig {
            initial_lp_af: 0.0,
            ..SimulationConfig::default()
        };
        let pool = AamPool {
            af_price: FALLBACK_INITIAL_PRICE,
            ..AamPool::default()
        };
        let persisted = PersistedState {
            pool: Some(pool.clone()),
            ..Default::default()
        };
        let out = reconcile(persisted, &defaults);
        assert_eq!(out.pool, PoolDecision::Kept);
        assert_eq!(out.state.pool, pool);
    }

    #[test]
    fn invalid_fields_fall_back_and_orders_survive() {
        let state = traded_state();
        let mut persisted = PersistedState::from(&state);
        if let Some(config) = persisted.config.as_mut() {
            config.deposit_lp_ratio = Some(250.0);
            config.initial_lp_af = Some(f64::NAN);
            if let Some(packages) = config.package_configs.as_mut() {
                packages[1].release_keep_percent = Some(-3.0);
            }
        }
        let out = reconcile(persisted, &state.config);

        assert_eq!(out.state.config, state.config);
        assert_eq!(out.state.orders, state.orders);
        assert_eq!(out.pool, PoolDecision::Kept);
        assert_eq!(out.state.pool, state.pool);
    }

    #[test]
    fn duplicate_tier_from_overlay_is_dropped() {
        let defaults = SimulationConfig::default();
        let state = traded_state();
        let persisted = PersistedState {
            config: Some(PersistedConfig {
                package_configs: Some(vec![
                    PersistedPackageConfig {
                        tier: Some(2),
                        ..Default::default()
                    },
                    PersistedPackageConfig::default(),
                ]),
                ..Default::default()
            }),
            orders: Some(state.orders.list().to_vec()),
            pool: Some(state.pool.clone()),
        };
        let out = reconcile(persisted, &defaults);

        let tiers: Vec<_> = out.state.config.package_configs.iter().map(|p| p.tier).collect();
        assert_eq!(tiers, vec![2, 3, 4]);
        assert!(core_types::validate::validate_config(&out.state.config).is_ok());
        assert_eq!(out.state.orders.len(), 1);
        assert_eq!(out.pool, PoolDecision::Kept);
        assert_eq!(out.state.pool, state.pool);
    }
}
