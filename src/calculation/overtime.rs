//! Overtime pay calculation.
//!
//! Each of the four overtime categories is paid at the hourly rate plus its
//! surcharge: ordinary daytime +25%, ordinary nighttime +75%, rest-day daytime
//! +100% and rest-day nighttime +150% in the reference configuration. Each
//! category is rounded on its own.

use rust_decimal::Decimal;

use crate::config::{OvertimeSurcharges, PayrollConfig};
use crate::error::EngineResult;
use crate::models::{AuditStep, Eligibility, OvertimeCategory, OvertimeHours, OvertimePay};

use super::earnings::hourly_amount;

/// Returns the configured surcharge for a category.
pub fn overtime_surcharge(category: OvertimeCategory, surcharges: &OvertimeSurcharges) -> Decimal {
    match category {
        OvertimeCategory::OrdinaryDaytime => surcharges.ordinary_daytime,
        OvertimeCategory::OrdinaryNighttime => surcharges.ordinary_nighttime,
        OvertimeCategory::RestDayDaytime => surcharges.rest_day_daytime,
        OvertimeCategory::RestDayNighttime => surcharges.rest_day_nighttime,
    }
}

/// The result of calculating overtime, including audit steps.
#[derive(Debug, Clone)]
pub struct OvertimeResult {
    /// Value paid per category.
    pub pay: OvertimePay,
    /// One step per category with recorded hours.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates the value of every overtime category.
///
/// `value = round(hours × hourly rate × (1 + surcharge))`. When the contract is
/// not eligible for overtime the recorded hours are forced to zero; the audit
/// step still records what was ignored. A value too large for a decimal fails
/// with `AmountOutOfRange`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_overtime;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{Eligibility, OvertimeHours};
/// use rust_decimal::Decimal;
///
/// let hours = OvertimeHours {
///     ordinary_daytime: Decimal::from(10),
///     ..OvertimeHours::default()
/// };
/// let result = calculate_overtime(
///     Decimal::from(1_500_000),
///     &hours,
///     Eligibility::uniform(true),
///     &PayrollConfig::reference(),
///     1,
/// )
/// .unwrap();
/// // 10h × 6,250 × 1.25
/// assert_eq!(result.pay.ordinary_daytime, Decimal::from(78_125));
/// ```
pub fn calculate_overtime(
    salary: Decimal,
    hours: &OvertimeHours,
    eligibility: Eligibility,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<OvertimeResult> {
    let surcharges = &config.earnings().overtime;
    let policy = config.policy();
    let mut pay = OvertimePay::default();
    let mut audit_steps = Vec::new();

    for category in OvertimeCategory::ALL {
        let recorded = hours.get(category).max(Decimal::ZERO);
        if recorded.is_zero() {
            continue;
        }

        let rule_id = format!("overtime_{}", category.as_str());
        let surcharge = overtime_surcharge(category, surcharges);
        let multiplier = Decimal::ONE + surcharge;
        let paid_hours = if eligibility.overtime_allowed {
            recorded
        } else {
            Decimal::ZERO
        };
        let amount = policy.round(hourly_amount(
            salary,
            paid_hours,
            multiplier,
            config,
            &rule_id,
        )?);
        pay.set(category, amount);

        let reasoning = if eligibility.overtime_allowed {
            format!(
                "{}h {} overtime at {}% of the hourly rate = ${}",
                recorded.normalize(),
                category.as_str().replace('_', " "),
                (multiplier * Decimal::ONE_HUNDRED).normalize(),
                amount.normalize()
            )
        } else {
            format!(
                "{}h {} overtime ignored - contract is not eligible for overtime",
                recorded.normalize(),
                category.as_str().replace('_', " ")
            )
        };

        audit_steps.push(AuditStep {
            step_number: step_number + audit_steps.len() as u32,
            rule_id,
            rule_name: "Overtime Pay".to_string(),
            clause_ref: surcharges.clause.clone(),
            input: serde_json::json!({
                "hours": recorded.normalize().to_string(),
                "salary": salary.normalize().to_string(),
                "overtime_allowed": eligibility.overtime_allowed
            }),
            output: serde_json::json!({
                "paid_hours": paid_hours.normalize().to_string(),
                "multiplier": multiplier.normalize().to_string(),
                "amount": amount.normalize().to_string()
            }),
            reasoning,
        });
    }

    Ok(OvertimeResult { pay, audit_steps })
}
