//! Night-shift surcharge calculation.
//!
//! The surcharge pays ordinary (non-overtime) hours worked at night at 35% of
//! the hourly rate. Hours above the per-period cap are clamped to the cap and
//! reported as a warning, never rejected.

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, Eligibility};

use super::earnings::hourly_amount;

/// Warning code recorded when night hours exceed the per-period cap.
pub const NIGHT_HOURS_CLAMPED: &str = "NIGHT_HOURS_CLAMPED";

/// The result of calculating the night surcharge.
#[derive(Debug, Clone)]
pub struct NightSurchargeResult {
    /// Hours paid after clamping and eligibility.
    pub hours_paid: Decimal,
    /// The surcharge value.
    pub amount: Decimal,
    /// Present when night hours were recorded.
    pub audit_step: Option<AuditStep>,
    /// Present when the recorded hours exceeded the cap.
    pub warning: Option<AuditWarning>,
}

/// Calculates the night-shift surcharge.
///
/// `value = round(min(hours, cap) × hourly rate × rate)`; zero when the
/// contract is not eligible. The cap applies before any multiplication.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_night_surcharge;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::Eligibility;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfig::reference();
/// let capped = calculate_night_surcharge(
///     Decimal::from(1_500_000), Decimal::from(300), Eligibility::uniform(true), &config, 1,
/// )
/// .unwrap();
/// let at_cap = calculate_night_surcharge(
///     Decimal::from(1_500_000), Decimal::from(270), Eligibility::uniform(true), &config, 1,
/// )
/// .unwrap();
/// assert_eq!(capped.amount, at_cap.amount);
/// assert_eq!(capped.amount, Decimal::from(590_625));
/// ```
pub fn calculate_night_surcharge(
    salary: Decimal,
    recorded_hours: Decimal,
    eligibility: Eligibility,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<NightSurchargeResult> {
    let night = &config.earnings().night_surcharge;
    let recorded = recorded_hours.max(Decimal::ZERO);

    if recorded.is_zero() {
        return Ok(NightSurchargeResult {
            hours_paid: Decimal::ZERO,
            amount: Decimal::ZERO,
            audit_step: None,
            warning: None,
        });
    }

    let cap = night.max_hours_per_period;
    let cap_applied = recorded > cap;
    let clamped = recorded.min(cap);

    let warning = if cap_applied {
        tracing::warn!(
            recorded = %recorded,
            cap = %cap,
            "Night hours above the period cap, clamping"
        );
        Some(AuditWarning::new(
            NIGHT_HOURS_CLAMPED,
            format!(
                "{} night hours exceed the {} hour cap; {} hours paid",
                recorded.normalize(),
                cap.normalize(),
                cap.normalize()
            ),
            "medium",
        ))
    } else {
        None
    };

    let hours_paid = if eligibility.night_surcharge_allowed {
        clamped
    } else {
        Decimal::ZERO
    };
    let amount = config.policy().round(hourly_amount(
        salary,
        hours_paid,
        night.rate,
        config,
        "night_surcharge",
    )?);

    let reasoning = if !eligibility.night_surcharge_allowed {
        format!(
            "{}h night hours ignored - contract is not eligible for night surcharge",
            recorded.normalize()
        )
    } else if cap_applied {
        format!(
            "{}h × {}% of the hourly rate = ${} (capped from {}h)",
            hours_paid.normalize(),
            (night.rate * Decimal::ONE_HUNDRED).normalize(),
            amount.normalize(),
            recorded.normalize()
        )
    } else {
        format!(
            "{}h × {}% of the hourly rate = ${}",
            hours_paid.normalize(),
            (night.rate * Decimal::ONE_HUNDRED).normalize(),
            amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "night_surcharge".to_string(),
        rule_name: "Night Shift Surcharge".to_string(),
        clause_ref: night.clause.clone(),
        input: serde_json::json!({
            "recorded_hours": recorded.normalize().to_string(),
            "cap": cap.normalize().to_string(),
            "rate": night.rate.normalize().to_string(),
            "night_surcharge_allowed": eligibility.night_surcharge_allowed
        }),
        output: serde_json::json!({
            "hours_paid": hours_paid.normalize().to_string(),
            "cap_applied": cap_applied,
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    Ok(NightSurchargeResult {
        hours_paid,
        amount,
        audit_step: Some(audit_step),
        warning,
    })
}
