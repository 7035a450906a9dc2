//! Payroll line item models.
//!
//! This module contains the [`PayrollLineItem`] type and the breakdowns that
//! make it up: earnings, employee deductions, employer contributions and the
//! aggregated totals. A line item is always produced whole by the calculation
//! pipeline; its outputs are never patched in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, Eligibility, Novelties, OvertimeCategory};

/// Monetary value of each overtime category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePay {
    /// Extra hours on an ordinary day, daytime.
    pub ordinary_daytime: Decimal,
    /// Extra hours on an ordinary day, nighttime.
    pub ordinary_nighttime: Decimal,
    /// Extra hours on a rest day, daytime.
    pub rest_day_daytime: Decimal,
    /// Extra hours on a rest day, nighttime.
    pub rest_day_nighttime: Decimal,
}

impl OvertimePay {
    /// Value paid for one category.
    pub fn get(&self, category: OvertimeCategory) -> Decimal {
        match category {
            OvertimeCategory::OrdinaryDaytime => self.ordinary_daytime,
            OvertimeCategory::OrdinaryNighttime => self.ordinary_nighttime,
            OvertimeCategory::RestDayDaytime => self.rest_day_daytime,
            OvertimeCategory::RestDayNighttime => self.rest_day_nighttime,
        }
    }

    /// Sets the value paid for one category.
    pub fn set(&mut self, category: OvertimeCategory, amount: Decimal) {
        match category {
            OvertimeCategory::OrdinaryDaytime => self.ordinary_daytime = amount,
            OvertimeCategory::OrdinaryNighttime => self.ordinary_nighttime = amount,
            OvertimeCategory::RestDayDaytime => self.rest_day_daytime = amount,
            OvertimeCategory::RestDayNighttime => self.rest_day_nighttime = amount,
        }
    }

    /// Sum of all categories.
    pub fn total(&self) -> Decimal {
        OvertimeCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Gross earnings of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsBreakdown {
    /// Salary / days per period, for reference (four decimal places).
    pub daily_rate: Decimal,
    /// Daily rate / hours per day, for reference (four decimal places).
    pub hourly_rate: Decimal,
    /// Salary for the days paid.
    pub base_pay: Decimal,
    /// Transport allowance.
    pub transport_allowance: Decimal,
    /// Overtime pay per category.
    pub overtime: OvertimePay,
    /// Night hours actually paid after clamping and eligibility.
    pub night_hours_paid: Decimal,
    /// Night-shift surcharge.
    pub night_surcharge: Decimal,
    /// Sum of base pay, transport allowance, overtime and night surcharge.
    pub total_income: Decimal,
}

/// Employee-side deductions of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDeductions {
    /// Health insurance.
    pub health: Decimal,
    /// Pension fund.
    pub pension: Decimal,
    /// Court-ordered garnishment.
    pub garnishment: Decimal,
    /// Other authorized deductions.
    pub other_deductions: Decimal,
    /// Company loan repayment.
    pub company_loan: Decimal,
    /// Income-tax withholding.
    pub withholding_tax: Decimal,
    /// Sum of all employee-side items.
    pub total: Decimal,
}

/// Employer-side obligations of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// Health insurance.
    pub health: Decimal,
    /// Pension fund.
    pub pension: Decimal,
    /// National apprenticeship fund.
    pub apprenticeship_fund: Decimal,
    /// Family welfare institute.
    pub family_welfare: Decimal,
    /// Family compensation fund.
    pub compensation_fund: Decimal,
    /// Severance accrual.
    pub severance: Decimal,
    /// Service bonus accrual.
    pub service_bonus: Decimal,
    /// Vacation accrual.
    pub vacation: Decimal,
    /// Risk level the occupational-risk contribution was computed with.
    pub risk_level: u8,
    /// Occupational-risk contribution.
    pub occupational_risk: Decimal,
    /// Sum of all employer-side items.
    pub total: Decimal,
}

/// Aggregated totals for a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTotals {
    /// Total income before deductions.
    pub total_income: Decimal,
    /// Total employee-side obligation.
    pub total_employee_obligation: Decimal,
    /// Total employer-side obligation.
    pub total_employer_obligation: Decimal,
    /// Net payment to the worker.
    pub net_pay: Decimal,
}

/// The computed pay of one contract in one payroll run.
///
/// Identifies the (run, contract, person) triple and carries both the novelty
/// inputs and every derived output, plus the audit trace that explains them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLineItem {
    /// The payroll run this item belongs to.
    pub run_id: String,
    /// The contract being paid.
    pub contract_id: String,
    /// The person holding the contract.
    pub person_id: String,
    /// Sanitized base salary used for every computation.
    pub base_salary: Decimal,
    /// Eligibility the novelties were gated by.
    pub eligibility: Eligibility,
    /// Novelty inputs as recorded.
    pub novelties: Novelties,
    /// Gross earnings.
    pub earnings: EarningsBreakdown,
    /// Employee-side deductions.
    pub deductions: EmployeeDeductions,
    /// Employer-side obligations.
    pub employer: EmployerContributions,
    /// Aggregated totals.
    pub totals: PayTotals,
    /// Every rule application and correction made while computing the item.
    pub audit_trace: AuditTrace,
}

impl PayrollLineItem {
    /// Returns true when income minus employee obligation equals net pay within
    /// `tolerance`, and no monetary output is negative.
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        let totals = &self.totals;
        let difference =
            totals.total_income - totals.total_employee_obligation - totals.net_pay;
        let non_negative = [
            totals.total_income,
            totals.total_employee_obligation,
            totals.total_employer_obligation,
            totals.net_pay,
        ]
        .iter()
        .all(|v| !v.is_sign_negative() || v.is_zero());

        difference.abs() <= tolerance && non_negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_line_item(net_pay: Decimal) -> PayrollLineItem {
        PayrollLineItem {
            run_id: "run_2025_03".to_string(),
            contract_id: "ct_001".to_string(),
            person_id: "per_001".to_string(),
            base_salary: dec("1500000"),
            eligibility: Eligibility::uniform(true),
            novelties: Novelties::default(),
            earnings: EarningsBreakdown {
                daily_rate: dec("50000"),
                hourly_rate: dec("6250"),
                base_pay: dec("1500000"),
                transport_allowance: Decimal::ZERO,
                overtime: OvertimePay::default(),
                night_hours_paid: Decimal::ZERO,
                night_surcharge: Decimal::ZERO,
                total_income: dec("1500000"),
            },
            deductions: EmployeeDeductions {
                health: dec("60000"),
                pension: dec("60000"),
                garnishment: Decimal::ZERO,
                other_deductions: Decimal::ZERO,
                company_loan: Decimal::ZERO,
                withholding_tax: Decimal::ZERO,
                total: dec("120000"),
            },
            employer: EmployerContributions {
                health: dec("127500"),
                pension: dec("180000"),
                apprenticeship_fund: dec("30000"),
                family_welfare: dec("45000"),
                compensation_fund: dec("60000"),
                severance: dec("124950"),
                service_bonus: dec("124950"),
                vacation: dec("62550"),
                risk_level: 1,
                occupational_risk: dec("7830"),
                total: dec("762780"),
            },
            totals: PayTotals {
                total_income: dec("1500000"),
                total_employee_obligation: dec("120000"),
                total_employer_obligation: dec("762780"),
                net_pay,
            },
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_balanced_line_item() {
        let item = create_test_line_item(dec("1380000"));
        assert!(item.is_balanced(Decimal::ONE));
    }

    #[test]
    fn test_unbalanced_line_item() {
        let item = create_test_line_item(dec("1379000"));
        assert!(!item.is_balanced(Decimal::ONE));
    }

    #[test]
    fn test_overtime_pay_set_and_total() {
        let mut pay = OvertimePay::default();
        pay.set(OvertimeCategory::OrdinaryDaytime, dec("78125"));
        pay.set(OvertimeCategory::RestDayNighttime, dec("31250"));

        assert_eq!(pay.get(OvertimeCategory::OrdinaryDaytime), dec("78125"));
        assert_eq!(pay.total(), dec("109375"));
    }

    #[test]
    fn test_line_item_serializes_amounts_as_strings() {
        let item = create_test_line_item(dec("1380000"));
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["totals"]["net_pay"], "1380000");
        assert_eq!(json["employer"]["risk_level"], 1);
        assert_eq!(json["eligibility"]["overtime_allowed"], true);
    }
}
