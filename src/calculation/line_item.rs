//! Line item computation pipeline.
//!
//! Runs eligibility, earnings, deductions and net pay in order and assembles the
//! results and their audit trace into one [`PayrollLineItem`].

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, Contract, Eligibility, Novelties, PayrollLineItem, Person};

use super::deductions::calculate_deductions;
use super::earnings::calculate_earnings;
use super::eligibility::{classify_eligibility, eligibility_step};
use super::net_pay::aggregate_net_pay;

/// Computes the complete line item of one contract in one payroll run.
///
/// The person must own the contract. The salary is sanitized and the novelties
/// validated before anything is calculated; any failure aborts only this item.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_line_item;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{
///     AffiliationType, Contract, ContractType, Novelties, Person, SalaryValue,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let person = Person {
///     id: "per_001".to_string(),
///     national_id: "1020304050".to_string(),
///     given_names: "Ana".to_string(),
///     surnames: "Rojas".to_string(),
///     sex: None,
///     marital_status: None,
/// };
/// let contract = Contract {
///     id: "ct_001".to_string(),
///     person_id: "per_001".to_string(),
///     affiliation_type: AffiliationType::Employee,
///     contract_type: ContractType::Indefinite,
///     base_salary: SalaryValue::from("1500000"),
///     risk_level: Some(1),
///     active: true,
///     start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
///     end_date: None,
/// };
///
/// let item = compute_line_item(
///     "run_2025_03",
///     &contract,
///     &person,
///     &Novelties::default(),
///     &PayrollConfig::reference(),
/// )
/// .unwrap();
///
/// assert_eq!(item.totals.total_employee_obligation, Decimal::from(120_000));
/// assert_eq!(item.totals.net_pay, Decimal::from(1_380_000));
/// ```
pub fn compute_line_item(
    run_id: &str,
    contract: &Contract,
    person: &Person,
    novelties: &Novelties,
    config: &PayrollConfig,
) -> EngineResult<PayrollLineItem> {
    if person.id != contract.person_id {
        return Err(EngineError::PersonMismatch {
            contract_id: contract.id.clone(),
            expected: contract.person_id.clone(),
            actual: person.id.clone(),
        });
    }

    compute_for_contract(
        run_id,
        contract,
        classify_eligibility(contract),
        novelties,
        config,
    )
}

/// Recomputes an existing line item in full with edited novelties.
///
/// Outputs are never patched: every field is derived again from the contract,
/// the new novelties and the configuration. The run is kept. The contract must
/// be the one the item was computed for (`ContractMismatch` otherwise) and must
/// still belong to the same person (`PersonMismatch`).
pub fn recompute_line_item(
    item: &PayrollLineItem,
    contract: &Contract,
    novelties: &Novelties,
    config: &PayrollConfig,
) -> EngineResult<PayrollLineItem> {
    if item.contract_id != contract.id {
        return Err(EngineError::ContractMismatch {
            expected: item.contract_id.clone(),
            actual: contract.id.clone(),
        });
    }
    if item.person_id != contract.person_id {
        return Err(EngineError::PersonMismatch {
            contract_id: contract.id.clone(),
            expected: contract.person_id.clone(),
            actual: item.person_id.clone(),
        });
    }

    compute_for_contract(
        &item.run_id,
        contract,
        classify_eligibility(contract),
        novelties,
        config,
    )
}

/// Computes a line item with an eligibility that was classified elsewhere.
pub(crate) fn compute_for_contract(
    run_id: &str,
    contract: &Contract,
    eligibility: Eligibility,
    novelties: &Novelties,
    config: &PayrollConfig,
) -> EngineResult<PayrollLineItem> {
    let salary = contract.salary()?;
    novelties.validate(config.earnings().days_per_period)?;

    let mut trace = AuditTrace::default();

    let eligibility_result = eligibility_step(contract, eligibility, trace.next_step_number());
    trace.steps.push(eligibility_result.audit_step);

    let earnings = calculate_earnings(
        salary,
        novelties,
        eligibility,
        config,
        trace.next_step_number(),
    )?;
    trace.steps.extend(earnings.audit_steps);
    trace.warnings.extend(earnings.warnings);

    let deductions = calculate_deductions(
        &contract.id,
        salary,
        contract.risk_level,
        &novelties.deduction_rates,
        config,
        trace.next_step_number(),
    )?;
    trace.steps.extend(deductions.audit_steps);
    trace.warnings.extend(deductions.warnings);

    let net = aggregate_net_pay(
        earnings.breakdown.total_income,
        deductions.employee.total,
        deductions.employer.total,
        config,
        trace.next_step_number(),
    )?;
    trace.steps.push(net.audit_step);
    trace.warnings.extend(net.warning);

    tracing::info!(
        run_id = %run_id,
        contract_id = %contract.id,
        total_income = %net.totals.total_income,
        net_pay = %net.totals.net_pay,
        warnings = trace.warnings.len(),
        "Line item computed"
    );

    Ok(PayrollLineItem {
        run_id: run_id.to_string(),
        contract_id: contract.id.clone(),
        person_id: contract.person_id.clone(),
        base_salary: salary,
        eligibility,
        novelties: novelties.clone(),
        earnings: earnings.breakdown,
        deductions: deductions.employee,
        employer: deductions.employer,
        totals: net.totals,
        audit_trace: trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{NIGHT_HOURS_CLAMPED, UNKNOWN_RISK_LEVEL};
    use crate::models::{AffiliationType, ContractType, SalaryValue};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_person() -> Person {
        Person {
            id: "per_001".to_string(),
            national_id: "1020304050".to_string(),
            given_names: "Ana Maria".to_string(),
            surnames: "Rojas Diaz".to_string(),
            sex: None,
            marital_status: None,
        }
    }

    fn create_test_contract(salary: &str) -> Contract {
        Contract {
            id: "ct_001".to_string(),
            person_id: "per_001".to_string(),
            affiliation_type: AffiliationType::Employee,
            contract_type: ContractType::Indefinite,
            base_salary: SalaryValue::from(salary),
            risk_level: Some(1),
            active: true,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: None,
        }
    }

    fn compute(contract: &Contract, novelties: &Novelties) -> EngineResult<PayrollLineItem> {
        compute_line_item(
            "run_2025_03",
            contract,
            &create_test_person(),
            novelties,
            &PayrollConfig::reference(),
        )
    }

    #[test]
    fn test_full_period_without_novelties() {
        let item = compute(&create_test_contract("1500000"), &Novelties::default()).unwrap();

        assert_eq!(item.run_id, "run_2025_03");
        assert_eq!(item.person_id, "per_001");
        assert_eq!(item.base_salary, dec("1500000"));
        assert_eq!(item.totals.total_income, dec("1500000"));
        assert_eq!(item.totals.total_employee_obligation, dec("120000"));
        assert_eq!(item.totals.total_employer_obligation, dec("762780"));
        assert_eq!(item.totals.net_pay, dec("1380000"));
        assert!(item.is_balanced(Decimal::ONE));
        assert!(item.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_trace_covers_every_stage_in_order() {
        let item = compute(&create_test_contract("1500000"), &Novelties::default()).unwrap();
        let rule_ids: Vec<&str> = item
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();

        assert_eq!(
            rule_ids,
            vec![
                "variable_pay_eligibility",
                "base_pay",
                "transport_allowance",
                "employee_deductions",
                "risk_level_lookup",
                "employer_contributions",
                "net_pay",
            ]
        );
        for (index, step) in item.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
    }

    #[test]
    fn test_recomputation_is_identical() {
        let contract = create_test_contract("2100000");
        let mut novelties = Novelties {
            night_hours: dec("300"),
            transport_requested: true,
            ..Novelties::default()
        };
        novelties.overtime.ordinary_daytime = dec("6");

        let first = compute(&contract, &novelties).unwrap();
        let second = compute(&contract, &novelties).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_person_must_own_contract() {
        let mut contract = create_test_contract("1500000");
        contract.person_id = "per_999".to_string();

        match compute(&contract, &Novelties::default()) {
            Err(EngineError::PersonMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, "per_999");
                assert_eq!(actual, "per_001");
            }
            other => panic!("Expected PersonMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_salary_is_rejected() {
        match compute(&create_test_contract("abc"), &Novelties::default()) {
            Err(EngineError::MalformedSalary { contract_id, .. }) => {
                assert_eq!(contract_id, "ct_001");
            }
            other => panic!("Expected MalformedSalary, got {:?}", other),
        }
    }

    #[test]
    fn test_days_out_of_range_are_rejected() {
        let novelties = Novelties {
            days_to_pay: 31,
            ..Novelties::default()
        };

        assert!(matches!(
            compute(&create_test_contract("1500000"), &novelties),
            Err(EngineError::InvalidNoveltyRange { .. })
        ));
    }

    #[test]
    fn test_low_days_trigger_negative_obligation() {
        // 1 day of 1,500,000 = 50,000 income against 120,000 deductions
        let novelties = Novelties {
            days_to_pay: 1,
            ..Novelties::default()
        };

        assert!(matches!(
            compute(&create_test_contract("1500000"), &novelties),
            Err(EngineError::NegativeObligation { .. })
        ));
    }

    #[test]
    fn test_warnings_are_collected_from_every_stage() {
        let mut contract = create_test_contract("1500000");
        contract.risk_level = None;
        let novelties = Novelties {
            night_hours: dec("500"),
            ..Novelties::default()
        };

        let item = compute(&contract, &novelties).unwrap();

        assert!(item.audit_trace.has_warning(NIGHT_HOURS_CLAMPED));
        assert!(item.audit_trace.has_warning(UNKNOWN_RISK_LEVEL));
        assert_eq!(item.employer.risk_level, 1);
        assert_eq!(item.earnings.night_surcharge, dec("590625"));
    }

    #[test]
    fn test_recompute_replaces_every_output() {
        let contract = create_test_contract("1500000");
        let item = compute(&contract, &Novelties::default()).unwrap();

        let edited = Novelties {
            days_to_pay: 15,
            ..Novelties::default()
        };
        let recomputed =
            recompute_line_item(&item, &contract, &edited, &PayrollConfig::reference()).unwrap();

        assert_eq!(recomputed.run_id, item.run_id);
        assert_eq!(recomputed.novelties.days_to_pay, 15);
        assert_eq!(recomputed.earnings.base_pay, dec("750000"));
        assert_eq!(recomputed.totals.net_pay, dec("630000"));
        assert_eq!(recomputed, compute(&contract, &edited).unwrap());
    }

    #[test]
    fn test_recompute_rejects_another_contract() {
        let item = compute(&create_test_contract("1500000"), &Novelties::default()).unwrap();
        let mut other = create_test_contract("2000000");
        other.id = "ct_002".to_string();

        match recompute_line_item(&item, &other, &Novelties::default(), &PayrollConfig::reference())
        {
            Err(EngineError::ContractMismatch { expected, actual }) => {
                assert_eq!(expected, "ct_001");
                assert_eq!(actual, "ct_002");
            }
            other => panic!("Expected ContractMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_salary_beyond_decimal_range_is_an_error() {
        let result = compute(
            &create_test_contract("79228162514264337593543950335"),
            &Novelties::default(),
        );

        match result {
            Err(EngineError::AmountOutOfRange { rule_id }) => assert_eq!(rule_id, "base_pay"),
            other => panic!("Expected AmountOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_overtime_beyond_period_is_rejected() {
        let mut novelties = Novelties::default();
        novelties.overtime.rest_day_nighttime = dec("100000000000000000000000");

        match compute(&create_test_contract("1500000"), &novelties) {
            Err(EngineError::InvalidNoveltyRange { field, .. }) => {
                assert_eq!(field, "overtime.rest_day_nighttime");
            }
            other => panic!("Expected InvalidNoveltyRange, got {:?}", other),
        }
    }
}
