// Copyright (c) James Kassemi, SC, US. All rights reserved.

use serde::{Deserialize, Serialize};

pub type Tier = u32;
pub type OrderId = String;

/// Global simulation parameters plus the per-tier package table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub initial_lp_usdc: f64,
    pub initial_lp_af: f64,
    /// Percent of each deposit added to the pool's USDC side.
    pub deposit_lp_ratio: f64,
    /// Percent of each deposit spent buying AF out of the pool.
    pub deposit_buyback_ratio: f64,
    pub package_configs: Vec<PackageConfig>,
}

impl SimulationConfig {
    pub fn package(&self, tier: Tier) -> Option<&PackageConfig> {
        self.package_configs.iter().find(|pkg| pkg.tier == tier)
    }

    pub fn package_mut(&mut self, tier: Tier) -> Option<&mut PackageConfig> {
        self.package_configs.iter_mut().find(|pkg| pkg.tier == tier)
    }

    /// Price implied by the configured starting reserves.
    pub fn initial_price(&self) -> f64 {
        if self.initial_lp_af > 0.0 {
            self.initial_lp_usdc / self.initial_lp_af
        } else {
            0.0
        }
    }

    pub fn same_initial_reserves(&self, other: &SimulationConfig) -> bool {
        self.initial_lp_usdc == other.initial_lp_usdc && self.initial_lp_af == other.initial_lp_af
    }
}

/// Release split applied to the AF released by orders of one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    pub tier: Tier,
    pub release_withdraw_percent: f64,
    pub release_keep_percent: f64,
    pub release_convert_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    Days,
    Package,
}

impl OrderMode {
    pub fn label(&self) -> &'static str {
        match self {
            OrderMode::Days => "days",
            OrderMode::Package => "package",
        }
    }
}

/// One deposit. Immutable after insertion into the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingOrder {
    pub id: OrderId,
    pub amount: f64,
    pub mode: OrderMode,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub package_tier: Option<Tier>,
    #[serde(default)]
    pub start_day: u32,
}

/// Pool reserves and the figures derived from them.
///
/// `af_price` and `lp_tokens` are recomputed after every mutation and are not
/// authoritative on their own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AamPool {
    pub usdc_balance: f64,
    pub af_balance: f64,
    pub lp_tokens: f64,
    pub af_price: f64,
    pub total_buyback: f64,
    pub total_burn: f64,
}

/// One (order, day) row produced by the release-schedule generator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDailyDetail {
    pub day: u32,
    pub principal_release: f64,
    pub interest_release: f64,
    pub daily_af_release: f64,
    pub af_price: f64,
    pub cum_af_released: f64,
    pub af_in_system: f64,
    pub trading_capital: f64,
    pub forex_income: f64,
    pub withdrawn_af: f64,
    pub withdraw_fee: f64,
}

impl OrderDailyDetail {
    pub fn zeroed(day: u32) -> Self {
        Self {
            day,
            ..Default::default()
        }
    }
}
