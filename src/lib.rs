//! Payroll line-item computation engine
//!
//! This crate computes the pay of one contract for one payroll period: base pay,
//! transport allowance, overtime and night surcharge on the earnings side,
//! statutory employee deductions and employer contributions on the other, and
//! the resulting net pay. Every value carries an audit trace back to its inputs
//! and legal reference, and the same inputs always reproduce the same output.
//!
//! The [`assignment`] module drives the same pipeline over every active
//! contract of a payroll run.

#![warn(missing_docs)]

pub mod assignment;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
