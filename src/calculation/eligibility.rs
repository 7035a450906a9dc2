//! Variable-pay eligibility classification.
//!
//! Contractors, services contracts and apprenticeships are not paid overtime,
//! night surcharge or transport allowance. Their novelty hours are ignored
//! rather than rejected so stale UI input never blocks a computation.

use std::collections::HashMap;

use crate::models::{AffiliationType, AuditStep, Contract, ContractType, Eligibility};

/// Clause reference recorded on eligibility audit steps.
pub const ELIGIBILITY_CLAUSE: &str = "CST art. 23, 34, 81";

/// Returns true when the affiliation and contract type allow variable pay.
pub fn is_eligible_for_variable_pay(
    affiliation_type: AffiliationType,
    contract_type: ContractType,
) -> bool {
    !matches!(affiliation_type, AffiliationType::Contractor)
        && !matches!(
            contract_type,
            ContractType::Services | ContractType::Apprenticeship
        )
}

/// Classifies which variable-pay components a contract may accrue.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::classify_eligibility;
/// use payroll_engine::models::{AffiliationType, Contract, ContractType, SalaryValue};
/// use chrono::NaiveDate;
///
/// let contract = Contract {
///     id: "ct_002".to_string(),
///     person_id: "per_002".to_string(),
///     affiliation_type: AffiliationType::Contractor,
///     contract_type: ContractType::Services,
///     base_salary: SalaryValue::from("4000000"),
///     risk_level: None,
///     active: true,
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: None,
/// };
///
/// let eligibility = classify_eligibility(&contract);
/// assert!(!eligibility.overtime_allowed);
/// assert!(!eligibility.transport_allowance_allowed);
/// ```
pub fn classify_eligibility(contract: &Contract) -> Eligibility {
    Eligibility::uniform(is_eligible_for_variable_pay(
        contract.affiliation_type,
        contract.contract_type,
    ))
}

/// The result of classifying a contract, including the audit step.
#[derive(Debug, Clone)]
pub struct EligibilityResult {
    /// The classification.
    pub eligibility: Eligibility,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Builds the audit step for an already-classified contract.
pub fn eligibility_step(
    contract: &Contract,
    eligibility: Eligibility,
    step_number: u32,
) -> EligibilityResult {
    let affiliation = serde_json::to_value(contract.affiliation_type).unwrap_or_default();
    let contract_type = serde_json::to_value(contract.contract_type).unwrap_or_default();

    let reasoning = if eligibility.eligible_for_variable_pay() {
        format!(
            "{} on a {} contract: overtime, night surcharge and transport allowance apply",
            affiliation.as_str().unwrap_or_default(),
            contract_type.as_str().unwrap_or_default()
        )
    } else {
        format!(
            "{} on a {} contract: variable-pay novelties are ignored",
            affiliation.as_str().unwrap_or_default(),
            contract_type.as_str().unwrap_or_default()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "variable_pay_eligibility".to_string(),
        rule_name: "Variable Pay Eligibility".to_string(),
        clause_ref: ELIGIBILITY_CLAUSE.to_string(),
        input: serde_json::json!({
            "contract_id": contract.id,
            "affiliation_type": affiliation,
            "contract_type": contract_type
        }),
        output: serde_json::json!({
            "overtime_allowed": eligibility.overtime_allowed,
            "night_surcharge_allowed": eligibility.night_surcharge_allowed,
            "transport_allowance_allowed": eligibility.transport_allowance_allowed
        }),
        reasoning,
    };

    EligibilityResult {
        eligibility,
        audit_step,
    }
}

/// Memoizes eligibility per (affiliation type, contract type) pair.
///
/// Classification depends on nothing else, so a batch classifies each distinct
/// pair once however many contracts share it.
#[derive(Debug, Default)]
pub struct EligibilityCache {
    entries: HashMap<(AffiliationType, ContractType), Eligibility>,
}

impl EligibilityCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached classification for the contract's kind, classifying
    /// it on first use.
    pub fn get_or_classify(&mut self, contract: &Contract) -> Eligibility {
        *self
            .entries
            .entry((contract.affiliation_type, contract.contract_type))
            .or_insert_with(|| classify_eligibility(contract))
    }

    /// Number of distinct contract kinds classified so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been classified yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
