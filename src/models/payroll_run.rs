//! Payroll run model.
//!
//! A run is the period a batch of line items pays for. It is created and
//! edited by the external layer; the engine only uses it as a key and to
//! decide which contracts are active during it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How often the run repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    /// One run per calendar month.
    Monthly,
    /// Two runs per calendar month.
    Biweekly,
}

/// A payroll period aggregating zero or more line items.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayrollRun, Periodicity};
/// use chrono::NaiveDate;
///
/// let run = PayrollRun {
///     id: "run_2025_03".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
///     periodicity: Periodicity::Monthly,
///     description: None,
/// };
///
/// assert!(run.contains_date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
/// assert_eq!(run.calendar_days(), 31);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: String,
    /// First day of the run (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the run (inclusive).
    pub end_date: NaiveDate,
    /// How often the run repeats.
    pub periodicity: Periodicity,
    /// Free-text label shown to operators.
    #[serde(default)]
    pub description: Option<String>,
}

impl PayrollRun {
    /// Checks if a given date falls within this run, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days covered by the run.
    pub fn calendar_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
