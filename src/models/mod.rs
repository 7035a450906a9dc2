//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod contract;
mod line_item;
mod novelties;
mod payroll_run;
mod person;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use contract::{
    AffiliationType, Contract, ContractType, Eligibility, SalaryValue, sanitize_salary,
};
pub use line_item::{
    EarningsBreakdown, EmployeeDeductions, EmployerContributions, OvertimePay, PayTotals,
    PayrollLineItem,
};
pub use novelties::{
    FULL_PERIOD_DAYS, HOURS_PER_CALENDAR_DAY, Novelties, OvertimeCategory, OvertimeHours,
    RateOverrides,
};
pub use payroll_run::{PayrollRun, Periodicity};
pub use person::{MaritalStatus, Person, Sex};
