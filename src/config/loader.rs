//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    ContributionsConfig, EarningsConfig, JurisdictionMetadata, PayrollConfig, PolicyConfig,
    RiskLevelsConfig,
};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/co_2025/
/// ├── jurisdiction.yaml   # Rule-set metadata
/// ├── earnings.yaml       # Period constants, transport, overtime, night surcharge
/// ├── contributions.yaml  # Employee and employer statutory rates
/// ├── risk_levels.yaml    # Occupational-risk table
/// └── policy.yaml         # Rounding and net-pay tolerance
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/co_2025")?;
/// println!("Loaded rule set: {}", loader.jurisdiction().name);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing (`ConfigNotFound`),
    /// contains invalid YAML (`ConfigParseError`) or holds values that fail
    /// validation (`InvalidConfig`).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let jurisdiction = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let earnings = Self::load_yaml::<EarningsConfig>(&path.join("earnings.yaml"))?;
        let contributions =
            Self::load_yaml::<ContributionsConfig>(&path.join("contributions.yaml"))?;
        let risk_levels = Self::load_yaml::<RiskLevelsConfig>(&path.join("risk_levels.yaml"))?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;

        let config = PayrollConfig::new(jurisdiction, earnings, contributions, risk_levels, policy)?;

        tracing::debug!(
            path = %path.display(),
            version = %config.jurisdiction().version,
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/co_2025"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Copies the shipped configuration into a scratch directory so a single
    /// file can be replaced.
    fn scratch_config(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "payroll_engine_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for file in [
            "jurisdiction.yaml",
            "earnings.yaml",
            "contributions.yaml",
            "risk_levels.yaml",
            "policy.yaml",
        ] {
            fs::copy(Path::new(config_path()).join(file), dir.join(file)).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.jurisdiction().code, "CO");
        assert_eq!(loader.jurisdiction().currency, "COP");
    }

    #[test]
    fn test_shipped_configuration_matches_reference() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.config(), &PayrollConfig::reference());
    }

    #[test]
    fn test_transport_constants_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let transport = &loader.config().earnings().transport_allowance;

        assert_eq!(transport.amount, dec("200000"));
        assert_eq!(transport.salary_threshold, dec("2847000"));
    }

    #[test]
    fn test_risk_table_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let levels = &loader.config().risk_levels().levels;

        assert_eq!(levels.len(), 5);
        assert_eq!(levels[2].level, 3);
        assert_eq!(levels[2].rate, dec("0.02436"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("jurisdiction.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = scratch_config("invalid_yaml");
        fs::write(dir.join("policy.yaml"), "rounding: [not, a, mode").unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_incomplete_risk_table_returns_invalid_config() {
        let dir = scratch_config("short_risk_table");
        fs::write(
            dir.join("risk_levels.yaml"),
            "clause: test\nlevels:\n  - level: 1\n    rate: \"0.00522\"\n    label: Minimum\n",
        )
        .unwrap();

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::InvalidConfig { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
