use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::{types::SimulationConfig, validate::validate_config};

pub const DEFAULT_STATE_DIR: &str = "afsim.state";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_TOTAL_DAYS: u32 = 90;

/// Operator settings read from `afsim.toml` and `AFSIM_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub simulation: SimulationOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            report: ReportConfig::default(),
            simulation: SimulationOverrides::default(),
        }
    }
}

/// `AFSIM_STATE_DIR`, `AFSIM_REPORT__PAGE_SIZE`, `AFSIM_SIMULATION__INITIAL_LP_USDC`.
/// Nested keys are joined with `__` since field names contain `_`.
fn environment() -> Environment {
    Environment::with_prefix("AFSIM")
        .prefix_separator("_")
        .separator("__")
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_DIR)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_total_days")]
    pub total_days: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            total_days: default_total_days(),
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_total_days() -> u32 {
    DEFAULT_TOTAL_DAYS
}

/// Replacements for the built-in global parameters. Package tiers always
/// come from the built-in table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationOverrides {
    pub initial_lp_usdc: Option<f64>,
    pub initial_lp_af: Option<f64>,
    pub deposit_lp_ratio: Option<f64>,
    pub deposit_buyback_ratio: Option<f64>,
}

impl SimulationOverrides {
    pub fn apply(&self, mut base: SimulationConfig) -> SimulationConfig {
        if let Some(value) = self.initial_lp_usdc {
            base.initial_lp_usdc = value;
        }
        if let Some(value) = self.initial_lp_af {
            base.initial_lp_af = value;
        }
        if let Some(value) = self.deposit_lp_ratio {
            base.deposit_lp_ratio = value;
        }
        if let Some(value) = self.deposit_buyback_ratio {
            base.deposit_buyback_ratio = value;
        }
        base
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(environment())
    }

    fn from_sources(env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name("afsim.toml").required(false))
            .add_source(env)
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults with the file/env overrides applied.
    pub fn simulation_defaults(&self) -> SimulationConfig {
        self.simulation.apply(SimulationConfig::default())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.report.page_size == 0 {
            return Err(ConfigError::Message(
                "report.page_size must be at least 1".to_string(),
            ));
        }
        validate_config(&self.simulation_defaults())
            .map_err(|err| ConfigError::Message(format!("simulation: {err}")))
    }
}
