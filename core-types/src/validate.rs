// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Input checks shared by live edits and file-based overrides.

use thiserror::Error;

use crate::types::{PackageConfig, SimulationConfig};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid argument `{field}`: {reason}")]
pub struct InvalidArgument {
    pub field: String,
    pub reason: String,
}

impl InvalidArgument {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub fn non_negative(field: &str, value: f64) -> Result<(), InvalidArgument> {
    if !value.is_finite() {
        return Err(InvalidArgument::new(field, format!("{value} is not finite")));
    }
    if value < 0.0 {
        return Err(InvalidArgument::new(field, format!("{value} is negative")));
    }
    Ok(())
}

pub fn positive(field: &str, value: f64) -> Result<(), InvalidArgument> {
    non_negative(field, value)?;
    if value == 0.0 {
        return Err(InvalidArgument::new(field, "must be greater than zero"));
    }
    Ok(())
}

pub fn percent(field: &str, value: f64) -> Result<(), InvalidArgument> {
    non_negative(field, value)?;
    if value > 100.0 {
        return Err(InvalidArgument::new(field, format!("{value} exceeds 100")));
    }
    Ok(())
}

pub fn validate_package(pkg: &PackageConfig) -> Result<(), InvalidArgument> {
    non_negative("releaseWithdrawPercent", pkg.release_withdraw_percent)?;
    non_negative("releaseKeepPercent", pkg.release_keep_percent)?;
    non_negative("releaseConvertPercent", pkg.release_convert_percent)?;
    Ok(())
}

/// Checks a complete config. Package tiers must be unique.
pub fn validate_config(config: &SimulationConfig) -> Result<(), InvalidArgument> {
    non_negative("initialLpUsdc", config.initial_lp_usdc)?;
    non_negative("initialLpAf", config.initial_lp_af)?;
    percent("depositLpRatio", config.deposit_lp_ratio)?;
    percent("depositBuybackRatio", config.deposit_buyback_ratio)?;
    for (idx, pkg) in config.package_configs.iter().enumerate() {
        validate_package(pkg)?;
        if config.package_configs[..idx]
            .iter()
            .any(|other| other.tier == pkg.tier)
        {
            return Err(InvalidArgument::new(
                "packageConfigs",
                format!("tier {} appears more than once", pkg.tier),
            ));
        }
    }
    Ok(())
}
