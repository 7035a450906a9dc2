//! Configuration loading and management for the payroll engine.
//!
//! This module loads the statutory constants the calculators consume (period
//! constants, transport allowance, overtime and night surcharges, contribution
//! rates, the occupational-risk table and the rounding policy) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/co_2025").unwrap();
//! println!("Loaded rule set: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ContributionsConfig, EarningsConfig, EmployeeRates, EmployerRates, JurisdictionMetadata,
    NightSurchargeConfig, OvertimeSurcharges, PayrollConfig, PolicyConfig, RiskLevelEntry,
    RiskLevelsConfig, RoundingMode, TransportAllowanceConfig,
};
