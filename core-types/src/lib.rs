// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Shared data model, default parameter table, validation and operator
//! configuration for the deposit simulator.

pub mod config;
pub mod defaults;
pub mod types;
pub mod uid;
pub mod validate;

pub use types::{
    AamPool, OrderDailyDetail, OrderId, OrderMode, PackageConfig, SimulationConfig, StakingOrder,
    Tier,
};
pub use validate::InvalidArgument;
