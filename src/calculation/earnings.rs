//! Gross earnings calculation.
//!
//! Derives the earnings side of a line item: base pay for the days worked,
//! transport allowance, the four overtime categories and the night surcharge.
//! All rates derive from the monthly salary: the daily rate is salary / 30 and
//! the hourly rate is the daily rate / 8 (both divisors come from config).

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, EarningsBreakdown, Eligibility, Novelties};

use super::amount::{checked_product, checked_quotient, checked_sum};
use super::night_surcharge::calculate_night_surcharge;
use super::overtime::calculate_overtime;

/// Decimal places kept on the reference daily and hourly rates.
const RATE_DISPLAY_SCALE: u32 = 4;

/// Days per period × hours per day.
fn hours_per_period(config: &PayrollConfig) -> Decimal {
    let earnings = config.earnings();
    Decimal::from(earnings.days_per_period) * Decimal::from(earnings.hours_per_day)
}

/// `salary × hours × factor / (days per period × hours per day)`, unrounded.
///
/// Multiplying before dividing keeps the result exact for whole salaries so
/// rounding happens once, on the final value. Fails with `AmountOutOfRange`
/// under `rule_id` when the product leaves the decimal range.
pub(crate) fn hourly_amount(
    salary: Decimal,
    hours: Decimal,
    factor: Decimal,
    config: &PayrollConfig,
    rule_id: &str,
) -> EngineResult<Decimal> {
    let product = checked_product(rule_id, &[salary, hours, factor])?;
    checked_quotient(rule_id, product, hours_per_period(config))
}

/// Salary / days per period, to four decimal places.
pub fn daily_rate(salary: Decimal, config: &PayrollConfig) -> Decimal {
    (salary / Decimal::from(config.earnings().days_per_period)).round_dp(RATE_DISPLAY_SCALE)
}

/// Daily rate / hours per day, to four decimal places.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::hourly_rate;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let rate = hourly_rate(Decimal::from(1_500_000), &PayrollConfig::reference());
/// assert_eq!(rate, Decimal::from(6250));
/// ```
pub fn hourly_rate(salary: Decimal, config: &PayrollConfig) -> Decimal {
    (salary / hours_per_period(config)).round_dp(RATE_DISPLAY_SCALE)
}

/// The result of calculating base pay.
#[derive(Debug, Clone)]
pub struct BasePayResult {
    /// Salary for the days paid.
    pub base_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates base pay as `round(salary × days / days per period)`.
pub fn calculate_base_pay(
    salary: Decimal,
    days_to_pay: u32,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<BasePayResult> {
    let days_per_period = config.earnings().days_per_period;
    let worked = checked_product("base_pay", &[salary, Decimal::from(days_to_pay)])?;
    let base_pay = config.policy().round(checked_quotient(
        "base_pay",
        worked,
        Decimal::from(days_per_period),
    )?);

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_pay".to_string(),
        rule_name: "Base Pay".to_string(),
        clause_ref: "CST art. 132, 134".to_string(),
        input: serde_json::json!({
            "salary": salary.normalize().to_string(),
            "days_to_pay": days_to_pay,
            "days_per_period": days_per_period
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate(salary, config).normalize().to_string(),
            "base_pay": base_pay.normalize().to_string()
        }),
        reasoning: format!(
            "${} × {}/{} days = ${}",
            salary.normalize(),
            days_to_pay,
            days_per_period,
            base_pay.normalize()
        ),
    };

    Ok(BasePayResult {
        base_pay,
        audit_step,
    })
}

/// The result of calculating the transport allowance.
#[derive(Debug, Clone)]
pub struct TransportAllowanceResult {
    /// The allowance paid, zero or the configured amount.
    pub amount: Decimal,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Calculates the transport allowance.
///
/// The configured amount is paid when the contract is eligible, the employee
/// opted in, and the salary is strictly below the threshold. The amount is
/// fixed; it is not prorated by days paid.
pub fn calculate_transport_allowance(
    salary: Decimal,
    requested: bool,
    eligibility: Eligibility,
    config: &PayrollConfig,
    step_number: u32,
) -> TransportAllowanceResult {
    let transport = &config.earnings().transport_allowance;
    let below_threshold = salary < transport.salary_threshold;
    let applies = eligibility.transport_allowance_allowed && requested && below_threshold;
    let amount = if applies {
        config.policy().round(transport.amount)
    } else {
        Decimal::ZERO
    };

    let reasoning = if applies {
        format!(
            "Salary ${} is below ${}: allowance of ${} applies",
            salary.normalize(),
            transport.salary_threshold.normalize(),
            amount.normalize()
        )
    } else if !eligibility.transport_allowance_allowed {
        "Contract is not eligible for transport allowance".to_string()
    } else if !requested {
        "Transport allowance not requested".to_string()
    } else {
        format!(
            "Salary ${} is not below the ${} threshold",
            salary.normalize(),
            transport.salary_threshold.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "transport_allowance".to_string(),
        rule_name: "Transport Allowance".to_string(),
        clause_ref: transport.clause.clone(),
        input: serde_json::json!({
            "salary": salary.normalize().to_string(),
            "requested": requested,
            "transport_allowance_allowed": eligibility.transport_allowance_allowed,
            "salary_threshold": transport.salary_threshold.normalize().to_string()
        }),
        output: serde_json::json!({
            "applies": applies,
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    TransportAllowanceResult { amount, audit_step }
}

/// The result of calculating all earnings of a line item.
#[derive(Debug, Clone)]
pub struct EarningsResult {
    /// The earnings breakdown.
    pub breakdown: EarningsBreakdown,
    /// Audit steps in calculation order.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while calculating.
    pub warnings: Vec<AuditWarning>,
}

/// Calculates every earnings component of a line item.
///
/// Novelties must already be validated; negative hours are treated as zero.
/// Amounts too large for a decimal fail with `AmountOutOfRange`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_earnings;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{Eligibility, Novelties};
/// use rust_decimal::Decimal;
///
/// let novelties = Novelties {
///     days_to_pay: 15,
///     ..Novelties::default()
/// };
/// let result = calculate_earnings(
///     Decimal::from(1_500_000),
///     &novelties,
///     Eligibility::uniform(true),
///     &PayrollConfig::reference(),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.breakdown.base_pay, Decimal::from(750_000));
/// assert_eq!(result.breakdown.total_income, Decimal::from(750_000));
/// ```
pub fn calculate_earnings(
    salary: Decimal,
    novelties: &Novelties,
    eligibility: Eligibility,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<EarningsResult> {
    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();
    let mut step = step_number;

    let base = calculate_base_pay(salary, novelties.days_to_pay, config, step)?;
    audit_steps.push(base.audit_step);
    step += 1;

    let transport = calculate_transport_allowance(
        salary,
        novelties.transport_requested,
        eligibility,
        config,
        step,
    );
    audit_steps.push(transport.audit_step);
    step += 1;

    let overtime = calculate_overtime(salary, &novelties.overtime, eligibility, config, step)?;
    step += overtime.audit_steps.len() as u32;
    audit_steps.extend(overtime.audit_steps);

    let night =
        calculate_night_surcharge(salary, novelties.night_hours, eligibility, config, step)?;
    if let Some(audit_step) = night.audit_step {
        audit_steps.push(audit_step);
    }
    warnings.extend(night.warning);

    let total_income = checked_sum(
        "total_income",
        &[
            base.base_pay,
            transport.amount,
            overtime.pay.ordinary_daytime,
            overtime.pay.ordinary_nighttime,
            overtime.pay.rest_day_daytime,
            overtime.pay.rest_day_nighttime,
            night.amount,
        ],
    )?;

    let breakdown = EarningsBreakdown {
        daily_rate: daily_rate(salary, config),
        hourly_rate: hourly_rate(salary, config),
        base_pay: base.base_pay,
        transport_allowance: transport.amount,
        overtime: overtime.pay,
        night_hours_paid: night.hours_paid,
        night_surcharge: night.amount,
        total_income,
    };

    Ok(EarningsResult {
        breakdown,
        audit_steps,
        warnings,
    })
}
