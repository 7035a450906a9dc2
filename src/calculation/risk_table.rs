//! Occupational-risk rate lookup.
//!
//! Maps a contract's risk level (1 lowest to 5 highest) to the employer's
//! occupational-risk insurance rate. A missing or out-of-range level never
//! fails: it clamps to the nearest defined level and leaves a warning.

use rust_decimal::Decimal;

use crate::config::{PayrollConfig, RiskLevelEntry};
use crate::models::{AuditStep, AuditWarning};

/// Warning code recorded when a risk level had to be defaulted or clamped.
pub const UNKNOWN_RISK_LEVEL: &str = "UNKNOWN_RISK_LEVEL";

/// Lowest defined risk level.
pub const MIN_RISK_LEVEL: u8 = 1;

/// Highest defined risk level.
pub const MAX_RISK_LEVEL: u8 = 5;

/// The static risk-level table.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskTable {
    clause: String,
    entries: Vec<RiskLevelEntry>,
}

/// The outcome of resolving a requested risk level against the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskResolution {
    /// The level as found on the contract.
    pub requested: Option<u8>,
    /// The level actually used.
    pub level: u8,
    /// The contribution rate for `level`.
    pub rate: Decimal,
    /// The label for `level`.
    pub label: String,
    /// True when `requested` was missing or outside 1..=5.
    pub defaulted: bool,
}

impl RiskTable {
    /// Builds the table from a validated configuration.
    ///
    /// [`PayrollConfig`] guarantees exactly one entry per level 1 to 5, sorted.
    pub fn from_config(config: &PayrollConfig) -> Self {
        let risk_levels = config.risk_levels();
        Self {
            clause: risk_levels.clause.clone(),
            entries: risk_levels.levels.clone(),
        }
    }

    /// The table of the reference configuration.
    pub fn reference() -> Self {
        Self::from_config(&PayrollConfig::reference())
    }

    /// Legal reference for the table.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// All entries, lowest level first.
    pub fn entries(&self) -> &[RiskLevelEntry] {
        &self.entries
    }

    /// Returns the contribution rate for a level, clamping out-of-range levels.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::calculation::RiskTable;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let table = RiskTable::reference();
    /// assert_eq!(table.rate_for(3), Decimal::from_str("0.02436").unwrap());
    /// assert_eq!(table.rate_for(0), table.rate_for(1));
    /// ```
    pub fn rate_for(&self, level: u8) -> Decimal {
        self.resolve(Some(level)).rate
    }

    /// Resolves a possibly missing level to a table entry.
    pub fn resolve(&self, requested: Option<u8>) -> RiskResolution {
        let level = match requested {
            None | Some(0) => MIN_RISK_LEVEL,
            Some(level) => level.min(MAX_RISK_LEVEL),
        };
        let defaulted = requested != Some(level);
        let entry = self.entry(level);

        RiskResolution {
            requested,
            level,
            rate: entry.map(|e| e.rate).unwrap_or_default(),
            label: entry.map(|e| e.label.clone()).unwrap_or_default(),
            defaulted,
        }
    }

    fn entry(&self, level: u8) -> Option<&RiskLevelEntry> {
        self.entries.iter().find(|e| e.level == level)
    }
}

/// The result of resolving a contract's risk level, including the audit step.
#[derive(Debug, Clone)]
pub struct RiskLevelResult {
    /// The resolved level and rate.
    pub resolution: RiskResolution,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
    /// Present when the level was defaulted or clamped.
    pub warning: Option<AuditWarning>,
}

/// Resolves a contract's risk level and records the lookup.
///
/// A missing level or level 0 resolves to level 1, a level above 5 to level 5.
/// Either case logs a warning and adds an `UNKNOWN_RISK_LEVEL` audit warning.
pub fn resolve_risk_level(
    contract_id: &str,
    requested: Option<u8>,
    table: &RiskTable,
    step_number: u32,
) -> RiskLevelResult {
    let resolution = table.resolve(requested);
    let requested_str = requested.map_or_else(|| "missing".to_string(), |l| l.to_string());

    let warning = if resolution.defaulted {
        tracing::warn!(
            contract_id = %contract_id,
            requested = %requested_str,
            resolved = resolution.level,
            "Risk level outside 1..=5, using nearest defined level"
        );
        Some(AuditWarning::new(
            UNKNOWN_RISK_LEVEL,
            format!(
                "Risk level {} on contract '{}' is not defined; using level {}",
                requested_str, contract_id, resolution.level
            ),
            "low",
        ))
    } else {
        None
    };

    let reasoning = if resolution.defaulted {
        format!(
            "Risk level {} is not defined, resolved to level {} ({}) at {}",
            requested_str,
            resolution.level,
            resolution.label,
            resolution.rate.normalize()
        )
    } else {
        format!(
            "Risk level {} ({}) contributes {} of salary",
            resolution.level,
            resolution.label,
            resolution.rate.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "risk_level_lookup".to_string(),
        rule_name: "Occupational Risk Level".to_string(),
        clause_ref: table.clause().to_string(),
        input: serde_json::json!({
            "contract_id": contract_id,
            "requested_level": requested,
        }),
        output: serde_json::json!({
            "level": resolution.level,
            "rate": resolution.rate.normalize().to_string(),
            "label": resolution.label,
            "defaulted": resolution.defaulted
        }),
        reasoning,
    };

    RiskLevelResult {
        resolution,
        audit_step,
        warning,
    }
}
