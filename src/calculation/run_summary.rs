//! Payroll run totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::PayrollLineItem;

use super::amount::checked_sum;

/// Totals across all line items of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Number of line items summed.
    pub line_items: usize,
    /// Sum of total income.
    pub total_income: Decimal,
    /// Sum of employee-side obligations.
    pub total_employee_obligation: Decimal,
    /// Sum of employer-side obligations.
    pub total_employer_obligation: Decimal,
    /// Sum of net pay.
    pub net_pay: Decimal,
}

/// Sums the totals of a run's line items.
///
/// Fails with `AmountOutOfRange` if a sum leaves the decimal range.
pub fn summarize_run(items: &[PayrollLineItem]) -> EngineResult<RunTotals> {
    const RULE_ID: &str = "run_totals";
    let add = |a: Decimal, b: Decimal| checked_sum(RULE_ID, &[a, b]);

    items
        .iter()
        .try_fold(RunTotals::default(), |acc, item| -> EngineResult<RunTotals> {
            let totals = &item.totals;
            Ok(RunTotals {
                line_items: acc.line_items + 1,
                total_income: add(acc.total_income, totals.total_income)?,
                total_employee_obligation: add(
                    acc.total_employee_obligation,
                    totals.total_employee_obligation,
                )?,
                total_employer_obligation: add(
                    acc.total_employer_obligation,
                    totals.total_employer_obligation,
                )?,
                net_pay: add(acc.net_pay, totals.net_pay)?,
            })
        })
}
