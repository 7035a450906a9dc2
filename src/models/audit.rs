//! Audit trail models.
//!
//! Every calculator records the decisions it makes as [`AuditStep`]s, and any
//! input it had to correct (a defaulted risk level, clamped night hours) as an
//! [`AuditWarning`]. Both are collected on the line item so a computed value can
//! always be traced back to its inputs and legal reference.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Legal reference for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate inputs that were corrected rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a line item.
///
/// The trace carries no wall-clock values, so recomputing a line item from the
/// same inputs yields an identical trace.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(!trace.has_warning("UNKNOWN_RISK_LEVEL"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns the number to assign to the next step.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Returns true if a warning with the given code was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Finds the first step recorded for a rule.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(step_number: u32, rule_id: &str) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: "Test Rule".to_string(),
            clause_ref: "CST art. 168".to_string(),
            input: serde_json::json!({"hours": "8"}),
            output: serde_json::json!({"amount": "62500"}),
            reasoning: "test".to_string(),
        }
    }

    #[test]
    fn test_audit_step_serialization() {
        let json = serde_json::to_string(&step(1, "base_pay")).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"base_pay\""));
        assert!(json.contains("\"clause_ref\":\"CST art. 168\""));
    }

    #[test]
    fn test_next_step_number_follows_recorded_steps() {
        let mut trace = AuditTrace::default();
        assert_eq!(trace.next_step_number(), 1);

        trace.steps.push(step(1, "eligibility"));
        trace.steps.push(step(2, "base_pay"));
        assert_eq!(trace.next_step_number(), 3);
    }

    #[test]
    fn test_step_lookup_by_rule_id() {
        let trace = AuditTrace {
            steps: vec![step(1, "eligibility"), step(2, "base_pay")],
            warnings: vec![],
        };

        assert_eq!(trace.step("base_pay").unwrap().step_number, 2);
        assert!(trace.step("night_surcharge").is_none());
    }

    #[test]
    fn test_has_warning() {
        let trace = AuditTrace {
            steps: vec![],
            warnings: vec![AuditWarning::new(
                "NIGHT_HOURS_CLAMPED",
                "300 night hours clamped to 270",
                "medium",
            )],
        };

        assert!(trace.has_warning("NIGHT_HOURS_CLAMPED"));
        assert!(!trace.has_warning("UNKNOWN_RISK_LEVEL"));
    }

    #[test]
    fn test_audit_trace_deserialization() {
        let json = r#"{
            "steps": [],
            "warnings": [{"code": "UNKNOWN_RISK_LEVEL", "message": "defaulted", "severity": "low"}]
        }"#;

        let trace: AuditTrace = serde_json::from_str(json).unwrap();
        assert_eq!(trace.warnings.len(), 1);
        assert_eq!(trace.warnings[0].severity, "low");
    }
}
