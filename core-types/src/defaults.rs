// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Built-in parameter table. Persisted snapshots are merged against these
//! values on load, so new fields must get an entry here.

use crate::types::{PackageConfig, SimulationConfig, Tier};

pub const DEFAULT_INITIAL_LP_USDC: f64 = 10_000.0;
pub const DEFAULT_INITIAL_LP_AF: f64 = 100_000.0;
pub const DEFAULT_DEPOSIT_LP_RATIO: f64 = 50.0;
pub const DEFAULT_DEPOSIT_BUYBACK_RATIO: f64 = 30.0;

pub const DEFAULT_RELEASE_WITHDRAW_PERCENT: f64 = 60.0;
pub const DEFAULT_RELEASE_KEEP_PERCENT: f64 = 20.0;
pub const DEFAULT_RELEASE_CONVERT_PERCENT: f64 = 20.0;

pub const DEFAULT_TIERS: &[Tier] = &[1, 2, 3, 4];

pub fn default_package(tier: Tier) -> PackageConfig {
    PackageConfig {
        tier,
        release_withdraw_percent: DEFAULT_RELEASE_WITHDRAW_PERCENT,
        release_keep_percent: DEFAULT_RELEASE_KEEP_PERCENT,
        release_convert_percent: DEFAULT_RELEASE_CONVERT_PERCENT,
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_lp_usdc: DEFAULT_INITIAL_LP_USDC,
            initial_lp_af: DEFAULT_INITIAL_LP_AF,
            deposit_lp_ratio: DEFAULT_DEPOSIT_LP_RATIO,
            deposit_buyback_ratio: DEFAULT_DEPOSIT_BUYBACK_RATIO,
            package_configs: DEFAULT_TIERS.iter().copied().map(default_package).collect(),
        }
    }
}
