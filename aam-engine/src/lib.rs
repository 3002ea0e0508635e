// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Pool update applied for every deposit.
//!
//! Liquidity additions and buybacks are modeled independently; this is not an
//! `x * y = k` swap. After every update `af_price == usdc_balance / af_balance`
//! and `lp_tokens == sqrt(usdc_balance * af_balance)`.

use core_types::{AamPool, SimulationConfig};
use log::debug;

/// AF reserve that buybacks never cross.
pub const AF_FLOOR: f64 = 1.0;

/// Fresh pool for the configured starting reserves.
pub fn initial_pool(config: &SimulationConfig) -> AamPool {
    let usdc = config.initial_lp_usdc;
    let af = config.initial_lp_af;
    AamPool {
        usdc_balance: usdc,
        af_balance: af,
        lp_tokens: (usdc * af).sqrt(),
        af_price: if af > 0.0 { usdc / af } else { 0.0 },
        total_buyback: 0.0,
        total_burn: 0.0,
    }
}

/// Resulting pool plus how the deposit was split.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositOutcome {
    pub pool: AamPool,
    pub to_lp: f64,
    pub to_buyback: f64,
    pub af_bought: f64,
    pub buyback_usdc: f64,
}

impl DepositOutcome {
    /// Buyback budget left over because the floor capped the purchase.
    pub fn unspent_buyback(&self) -> f64 {
        (self.to_buyback - self.buyback_usdc).max(0.0)
    }
}

/// Applies one deposit and returns the new pool.
pub fn apply_deposit(pool: &AamPool, config: &SimulationConfig, amount: f64) -> AamPool {
    deposit(pool, config, amount).pool
}

/// Same as [`apply_deposit`] but keeps the split for reporting.
pub fn deposit(pool: &AamPool, config: &SimulationConfig, amount: f64) -> DepositOutcome {
    let to_lp = amount * config.deposit_lp_ratio / 100.0;
    let to_buyback = amount * config.deposit_buyback_ratio / 100.0;

    let mut next = pool.clone();
    // Buyback is priced before this deposit touches the reserves.
    let price = pool.af_price;

    if to_lp > 0.0 {
        next.usdc_balance += to_lp;
    }

    let mut af_bought = 0.0;
    let mut buyback_usdc = 0.0;
    if to_buyback > 0.0 && price > 0.0 && next.af_balance > AF_FLOOR {
        let max_af_can_buy = (next.af_balance - AF_FLOOR).max(0.0);
        let af_want_to_buy = to_buyback / price;
        af_bought = af_want_to_buy.min(max_af_can_buy);
        if af_want_to_buy > max_af_can_buy {
            debug!(
                "buyback capped at {:.6} AF (wanted {:.6})",
                max_af_can_buy, af_want_to_buy
            );
        }
        if af_bought > 0.0 {
            buyback_usdc = af_bought * price;
            next.usdc_balance += buyback_usdc;
            next.af_balance -= af_bought;
            next.total_buyback += buyback_usdc;
        } else {
            af_bought = 0.0;
        }
    }

    next.af_balance = next.af_balance.max(AF_FLOOR);
    refresh_derived(&mut next);

    DepositOutcome {
        pool: next,
        to_lp,
        to_buyback,
        af_bought,
        buyback_usdc,
    }
}

fn refresh_derived(pool: &mut AamPool) {
    pool.af_price = pool.usdc_balance / pool.af_balance;
    pool.lp_tokens = (pool.usdc_balance * pool.af_balance).sqrt();
}

/// Depletion figures relative to the configured starting pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolHealth {
    /// AF still purchasable before the floor.
    pub buyback_headroom: f64,
    /// Price move since the starting pool, in percent.
    pub price_change_pct: f64,
    /// Share of the starting AF reserve bought out, in percent.
    pub af_depleted_pct: f64,
}

impl PoolHealth {
    pub fn measure(pool: &AamPool, config: &SimulationConfig) -> Self {
        let start = initial_pool(config);
        let price_change_pct = if start.af_price > 0.0 {
            (pool.af_price / start.af_price - 1.0) * 100.0
        } else {
            0.0
        };
        let af_depleted_pct = if start.af_balance > 0.0 {
            ((1.0 - pool.af_balance / start.af_balance) * 100.0).max(0.0)
        } else {
            0.0
        };
        Self {
            buyback_headroom: (pool.af_balance - AF_FLOOR).max(0.0),
            price_change_pct,
            af_depleted_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(lp: f64, buyback: f64) -> SimulationConfig {
        SimulationConfig {
            initial_lp_usdc: 10_000.0,
            initial_lp_af: 100_000.0,
            deposit_lp_ratio: lp,
            deposit_buyback_ratio: buyback,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn initial_pool_derives_price_and_lp() {
        let pool = initial_pool(&config(50.0, 30.0));
        assert!((pool.af_price - 0.1).abs() < 1e-12);
        assert!((pool.lp_tokens - 1e9f64.sqrt()).abs() < 1e-6);
        assert_eq!(pool.total_buyback, 0.0);
    }

    #[test]
    fn initial_pool_without_af_has_zero_price() {
        let cfg = SimulationConfig {
            initial_lp_af: 0.0,
            ..config(50.0, 30.0)
        };
        let pool = initial_pool(&cfg);
        assert_eq!(pool.af_price, 0.0);
        assert_eq!(pool.lp_tokens, 0.0);
    }

    #[test]
    fn zero_price_skips_buyback() {
        let cfg = SimulationConfig {
            initial_lp_usdc: 0.0,
            ..config(0.0, 50.0)
        };
        let start = initial_pool(&cfg);
        let outcome = deposit(&start, &cfg, 1_000.0);
        assert_eq!(outcome.af_bought, 0.0);
        assert_eq!(outcome.pool.af_balance, start.af_balance);
        assert_eq!(outcome.pool.total_buyback, 0.0);
        assert_eq!(outcome.unspent_buyback(), 500.0);
    }

    #[test]
    fn zero_deposit_leaves_reserves() {
        let cfg = config(50.0, 30.0);
        let start = initial_pool(&cfg);
        let next = apply_deposit(&start, &cfg, 0.0);
        assert_eq!(next, start);
    }

    #[test]
    fn ratio_remainder_is_not_pooled() {
        let cfg = config(20.0, 0.0);
        let next = apply_deposit(&initial_pool(&cfg), &cfg, 1_000.0);
        assert_eq!(next.usdc_balance, 10_200.0);
        assert_eq!(next.af_balance, 100_000.0);
    }

    #[test]
    fn health_reports_depletion() {
        let cfg = config(0.0, 100.0);
        let next = apply_deposit(&initial_pool(&cfg), &cfg, 1_000.0);
        let health = PoolHealth::measure(&next, &cfg);
        assert!((health.af_depleted_pct - 10.0).abs() < 1e-9);
        assert!((health.buyback_headroom - 89_999.0).abs() < 1e-9);
        assert!(health.price_change_pct > 0.0);
    }
}
