//! Statutory deductions and employer contributions.
//!
//! Every rate applies to the full monthly salary. Each component is rounded on
//! its own with the configured policy and the totals are sums of the rounded
//! components, so the reported parts always add up to the reported total.
//! Products and totals are overflow-checked.

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, EmployeeDeductions, EmployerContributions, RateOverrides};

use super::amount::{checked_product, checked_sum};
use super::risk_table::{RiskResolution, RiskTable, resolve_risk_level};

/// The result of calculating employee-side deductions.
#[derive(Debug, Clone)]
pub struct EmployeeDeductionsResult {
    /// The deductions.
    pub deductions: EmployeeDeductions,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates employee-side deductions: statutory health and pension plus the
/// user-editable overrides.
///
/// Returns `InvalidRateOverride` when an override is negative and
/// `AmountOutOfRange` when a component does not fit in a decimal.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_employee_deductions;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::RateOverrides;
/// use rust_decimal::Decimal;
///
/// let result = calculate_employee_deductions(
///     Decimal::from(1_500_000),
///     &RateOverrides::default(),
///     &PayrollConfig::reference(),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.deductions.total, Decimal::from(120_000));
/// ```
pub fn calculate_employee_deductions(
    salary: Decimal,
    overrides: &RateOverrides,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<EmployeeDeductionsResult> {
    const RULE_ID: &str = "employee_deductions";
    overrides.validate()?;

    let rates = &config.contributions().employee;
    let policy = config.policy();
    let portion =
        |rate: Decimal| checked_product(RULE_ID, &[salary, rate]).map(|v| policy.round(v));

    let health = portion(rates.health)?;
    let pension = portion(rates.pension)?;
    let garnishment = portion(overrides.garnishment)?;
    let other_deductions = portion(overrides.other_deductions)?;
    let company_loan = portion(overrides.company_loan)?;
    let withholding_tax = portion(overrides.withholding_tax)?;
    let overrides_total = checked_sum(
        RULE_ID,
        &[garnishment, other_deductions, company_loan, withholding_tax],
    )?;
    let total = checked_sum(RULE_ID, &[health, pension, overrides_total])?;

    let deductions = EmployeeDeductions {
        health,
        pension,
        garnishment,
        other_deductions,
        company_loan,
        withholding_tax,
        total,
    };

    let overrides_json: serde_json::Map<String, serde_json::Value> = overrides
        .entries()
        .iter()
        .map(|(field, rate)| (field.to_string(), rate.normalize().to_string().into()))
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: RULE_ID.to_string(),
        rule_name: "Employee Deductions".to_string(),
        clause_ref: rates.clause.clone(),
        input: serde_json::json!({
            "salary": salary.normalize().to_string(),
            "health_rate": rates.health.normalize().to_string(),
            "pension_rate": rates.pension.normalize().to_string(),
            "overrides": overrides_json
        }),
        output: serde_json::to_value(&deductions).unwrap_or_default(),
        reasoning: format!(
            "Health ${} + pension ${} + overrides ${} = ${}",
            health.normalize(),
            pension.normalize(),
            overrides_total.normalize(),
            total.normalize()
        ),
    };

    Ok(EmployeeDeductionsResult {
        deductions,
        audit_step,
    })
}

/// The result of calculating employer-side contributions.
#[derive(Debug, Clone)]
pub struct EmployerContributionsResult {
    /// The contributions.
    pub contributions: EmployerContributions,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates employer-side obligations, including occupational risk at the
/// already-resolved risk rate.
pub fn calculate_employer_contributions(
    salary: Decimal,
    risk: &RiskResolution,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<EmployerContributionsResult> {
    const RULE_ID: &str = "employer_contributions";
    let rates = &config.contributions().employer;
    let policy = config.policy();
    let portion =
        |rate: Decimal| checked_product(RULE_ID, &[salary, rate]).map(|v| policy.round(v));

    let health = portion(rates.health)?;
    let pension = portion(rates.pension)?;
    let apprenticeship_fund = portion(rates.apprenticeship_fund)?;
    let family_welfare = portion(rates.family_welfare)?;
    let compensation_fund = portion(rates.compensation_fund)?;
    let severance = portion(rates.severance)?;
    let service_bonus = portion(rates.service_bonus)?;
    let vacation = portion(rates.vacation)?;
    let occupational_risk = portion(risk.rate)?;

    let total = checked_sum(
        RULE_ID,
        &[
            health,
            pension,
            apprenticeship_fund,
            family_welfare,
            compensation_fund,
            severance,
            service_bonus,
            vacation,
            occupational_risk,
        ],
    )?;

    let contributions = EmployerContributions {
        health,
        pension,
        apprenticeship_fund,
        family_welfare,
        compensation_fund,
        severance,
        service_bonus,
        vacation,
        risk_level: risk.level,
        occupational_risk,
        total,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: RULE_ID.to_string(),
        rule_name: "Employer Contributions".to_string(),
        clause_ref: rates.clause.clone(),
        input: serde_json::json!({
            "salary": salary.normalize().to_string(),
            "risk_level": risk.level,
            "risk_rate": risk.rate.normalize().to_string()
        }),
        output: serde_json::to_value(&contributions).unwrap_or_default(),
        reasoning: format!(
            "Social security, parafiscal and benefit accruals on ${} with risk level {} = ${}",
            salary.normalize(),
            risk.level,
            total.normalize()
        ),
    };

    Ok(EmployerContributionsResult {
        contributions,
        audit_step,
    })
}

/// The result of running the whole deduction side of a line item.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// Employee-side deductions.
    pub employee: EmployeeDeductions,
    /// Employer-side obligations.
    pub employer: EmployerContributions,
    /// Audit steps in calculation order.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while calculating.
    pub warnings: Vec<AuditWarning>,
}

/// Resolves the risk level, then calculates both employee deductions and
/// employer contributions.
pub fn calculate_deductions(
    contract_id: &str,
    salary: Decimal,
    risk_level: Option<u8>,
    overrides: &RateOverrides,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<DeductionResult> {
    let employee = calculate_employee_deductions(salary, overrides, config, step_number)?;

    let table = RiskTable::from_config(config);
    let risk = resolve_risk_level(contract_id, risk_level, &table, step_number + 1);
    let employer =
        calculate_employer_contributions(salary, &risk.resolution, config, step_number + 2)?;

    Ok(DeductionResult {
        employee: employee.deductions,
        employer: employer.contributions,
        audit_steps: vec![employee.audit_step, risk.audit_step, employer.audit_step],
        warnings: risk.warning.into_iter().collect(),
    })
}
