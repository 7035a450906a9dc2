//! Net pay aggregation.

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, PayTotals};

/// Warning code recorded when a small negative difference was floored to zero.
pub const NET_PAY_WITHIN_TOLERANCE: &str = "NET_PAY_WITHIN_TOLERANCE";

/// The result of aggregating a line item's totals.
#[derive(Debug, Clone)]
pub struct NetPayResult {
    /// The aggregated totals.
    pub totals: PayTotals,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
    /// Present when net pay was floored to zero within the tolerance.
    pub warning: Option<AuditWarning>,
}

/// Merges earnings and deductions into the line item totals.
///
/// `net pay = round(total income − employee obligation)`. An obligation above
/// income by more than the configured tolerance is a `NegativeObligation`
/// error; a smaller excess yields zero net pay and a warning.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_net_pay;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let result = aggregate_net_pay(
///     Decimal::from(1_500_000),
///     Decimal::from(120_000),
///     Decimal::from(762_780),
///     &PayrollConfig::reference(),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.totals.net_pay, Decimal::from(1_380_000));
/// ```
pub fn aggregate_net_pay(
    total_income: Decimal,
    employee_obligation: Decimal,
    employer_obligation: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<NetPayResult> {
    let policy = config.policy();
    let tolerance = policy.net_pay_tolerance;
    let difference = total_income - employee_obligation;

    if difference.is_sign_negative() && -difference > tolerance {
        return Err(EngineError::NegativeObligation {
            total_income,
            employee_obligation,
            tolerance,
        });
    }

    let (net_pay, warning) = if difference.is_sign_negative() && !difference.is_zero() {
        let warning = AuditWarning::new(
            NET_PAY_WITHIN_TOLERANCE,
            format!(
                "Employee obligation exceeds income by {}, within the tolerance of {}; net pay set to 0",
                (-difference).normalize(),
                tolerance.normalize()
            ),
            "low",
        );
        (Decimal::ZERO, Some(warning))
    } else {
        (policy.round(difference), None)
    };

    let totals = PayTotals {
        total_income,
        total_employee_obligation: employee_obligation,
        total_employer_obligation: employer_obligation,
        net_pay,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        clause_ref: "CST art. 149".to_string(),
        input: serde_json::json!({
            "total_income": total_income.normalize().to_string(),
            "total_employee_obligation": employee_obligation.normalize().to_string(),
            "tolerance": tolerance.normalize().to_string()
        }),
        output: serde_json::json!({
            "net_pay": net_pay.normalize().to_string(),
            "total_employer_obligation": employer_obligation.normalize().to_string()
        }),
        reasoning: format!(
            "${} income - ${} employee obligation = ${} net pay",
            total_income.normalize(),
            employee_obligation.normalize(),
            net_pay.normalize()
        ),
    };

    Ok(NetPayResult {
        totals,
        audit_step,
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn aggregate(income: &str, obligation: &str) -> EngineResult<NetPayResult> {
        aggregate_net_pay(
            dec(income),
            dec(obligation),
            dec("500000"),
            &PayrollConfig::reference(),
            9,
        )
    }

    #[test]
    fn test_net_pay_is_income_minus_obligation() {
        let result = aggregate("1500000", "120000").unwrap();

        assert_eq!(result.totals.net_pay, dec("1380000"));
        assert_eq!(result.totals.total_employer_obligation, dec("500000"));
        assert_eq!(result.audit_step.step_number, 9);
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_exactly_zero_net_pay() {
        let result = aggregate("120000", "120000").unwrap();

        assert_eq!(result.totals.net_pay, Decimal::ZERO);
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_small_excess_floors_to_zero_with_warning() {
        let result = aggregate("119999", "120000").unwrap();

        assert_eq!(result.totals.net_pay, Decimal::ZERO);
        assert_eq!(result.warning.unwrap().code, NET_PAY_WITHIN_TOLERANCE);
    }

    #[test]
    fn test_large_excess_is_negative_obligation() {
        match aggregate("100000", "120000") {
            Err(EngineError::NegativeObligation {
                total_income,
                employee_obligation,
                tolerance,
            }) => {
                assert_eq!(total_income, dec("100000"));
                assert_eq!(employee_obligation, dec("120000"));
                assert_eq!(tolerance, Decimal::ONE);
            }
            other => panic!("Expected NegativeObligation, got {:?}", other),
        }
    }
}
