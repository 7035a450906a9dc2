//! Error types for the payroll engine.
//!
//! Every fallible operation returns [`EngineError`]. Hard validation failures are
//! surfaced as values so a caller (a UI, a batch job, a test) can decide whether to
//! skip, retry or report. Cosmetic problems such as an out-of-range risk level or
//! night hours above the monthly cap are corrected inside the calculators and
//! reported as audit warnings instead.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/earnings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/earnings.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but its values are not usable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// A contract salary could not be turned into a positive amount.
    #[error("Malformed salary '{value}' on contract '{contract_id}': {message}")]
    MalformedSalary {
        /// The contract carrying the salary.
        contract_id: String,
        /// The raw salary value as received.
        value: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A novelty input lies outside its accepted range.
    #[error("Invalid novelty '{field}' = {value}: {message}")]
    InvalidNoveltyRange {
        /// The novelty field name.
        field: String,
        /// The offending value.
        value: String,
        /// The accepted range.
        message: String,
    },

    /// A user-editable deduction percentage is negative.
    #[error("Invalid rate override '{field}': {value} must not be negative")]
    InvalidRateOverride {
        /// The override field name.
        field: String,
        /// The offending rate.
        value: Decimal,
    },

    /// The employee-side obligation exceeds total income beyond the tolerance.
    #[error(
        "Employee obligation {employee_obligation} exceeds total income {total_income} \
         by more than the tolerance of {tolerance}"
    )]
    NegativeObligation {
        /// Total income for the period.
        total_income: Decimal,
        /// Total employee-side obligation for the period.
        employee_obligation: Decimal,
        /// The configured tolerance.
        tolerance: Decimal,
    },

    /// The person supplied does not own the contract.
    #[error("Contract '{contract_id}' belongs to person '{expected}', not '{actual}'")]
    PersonMismatch {
        /// The contract identifier.
        contract_id: String,
        /// The person id recorded on the contract.
        expected: String,
        /// The person id that was supplied.
        actual: String,
    },

    /// A line item was recomputed against a contract other than its own.
    #[error("Line item of contract '{expected}' cannot be recomputed with contract '{actual}'")]
    ContractMismatch {
        /// The contract the line item belongs to.
        expected: String,
        /// The contract that was supplied.
        actual: String,
    },

    /// An intermediate amount does not fit in a decimal.
    #[error("Amount out of range while calculating '{rule_id}'")]
    AmountOutOfRange {
        /// The calculation rule that overflowed.
        rule_id: String,
    },

    /// The external persistence layer reported a failure.
    #[error("Persistence error: {message}")]
    Persistence {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
