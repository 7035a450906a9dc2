//! Calculation logic for the payroll engine.
//!
//! This module contains all the calculation functions for a payroll line item,
//! including the occupational-risk table, variable-pay eligibility, base pay,
//! transport allowance, overtime, night surcharge, statutory deductions,
//! employer contributions and net pay aggregation.

mod amount;
mod deductions;
mod earnings;
mod eligibility;
mod line_item;
mod net_pay;
mod night_surcharge;
mod overtime;
mod risk_table;
mod run_summary;

pub use deductions::{
    DeductionResult, EmployeeDeductionsResult, EmployerContributionsResult, calculate_deductions,
    calculate_employee_deductions, calculate_employer_contributions,
};
pub use earnings::{
    BasePayResult, EarningsResult, TransportAllowanceResult, calculate_base_pay,
    calculate_earnings, calculate_transport_allowance, daily_rate, hourly_rate,
};
pub use eligibility::{
    ELIGIBILITY_CLAUSE, EligibilityCache, EligibilityResult, classify_eligibility,
    eligibility_step, is_eligible_for_variable_pay,
};
pub use line_item::{compute_line_item, recompute_line_item};
pub use net_pay::{NET_PAY_WITHIN_TOLERANCE, NetPayResult, aggregate_net_pay};
pub use night_surcharge::{NIGHT_HOURS_CLAMPED, NightSurchargeResult, calculate_night_surcharge};
pub use overtime::{OvertimeResult, calculate_overtime, overtime_surcharge};
pub use risk_table::{
    MAX_RISK_LEVEL, MIN_RISK_LEVEL, RiskLevelResult, RiskResolution, RiskTable,
    UNKNOWN_RISK_LEVEL, resolve_risk_level,
};
pub use run_summary::{RunTotals, summarize_run};

pub(crate) use line_item::compute_for_contract;
