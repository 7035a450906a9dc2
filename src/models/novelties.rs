//! Novelty inputs for a line item.
//!
//! Novelties are the per-period facts an operator records for a contract:
//! days to pay, overtime and night hours, the transport opt-in and the
//! user-editable deduction percentages. Every field has an explicit default so a
//! partially filled record deserializes to a neutral value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Days paid for a full period when nothing else is recorded.
pub const FULL_PERIOD_DAYS: u32 = 30;

/// Clock hours in a day; one overtime category can never exceed this per day paid.
pub const HOURS_PER_CALENDAR_DAY: u32 = 24;

/// The four overtime categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeCategory {
    /// Extra hours on an ordinary day, daytime.
    OrdinaryDaytime,
    /// Extra hours on an ordinary day, nighttime.
    OrdinaryNighttime,
    /// Extra hours on a rest day, daytime.
    RestDayDaytime,
    /// Extra hours on a rest day, nighttime.
    RestDayNighttime,
}

impl OvertimeCategory {
    /// All categories in reporting order.
    pub const ALL: [OvertimeCategory; 4] = [
        OvertimeCategory::OrdinaryDaytime,
        OvertimeCategory::OrdinaryNighttime,
        OvertimeCategory::RestDayDaytime,
        OvertimeCategory::RestDayNighttime,
    ];

    /// Snake-case name used in audit steps and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            OvertimeCategory::OrdinaryDaytime => "ordinary_daytime",
            OvertimeCategory::OrdinaryNighttime => "ordinary_nighttime",
            OvertimeCategory::RestDayDaytime => "rest_day_daytime",
            OvertimeCategory::RestDayNighttime => "rest_day_nighttime",
        }
    }
}

/// Overtime hours per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvertimeHours {
    /// Extra hours on an ordinary day, daytime.
    pub ordinary_daytime: Decimal,
    /// Extra hours on an ordinary day, nighttime.
    pub ordinary_nighttime: Decimal,
    /// Extra hours on a rest day, daytime.
    pub rest_day_daytime: Decimal,
    /// Extra hours on a rest day, nighttime.
    pub rest_day_nighttime: Decimal,
}

impl OvertimeHours {
    /// Hours recorded for one category.
    pub fn get(&self, category: OvertimeCategory) -> Decimal {
        match category {
            OvertimeCategory::OrdinaryDaytime => self.ordinary_daytime,
            OvertimeCategory::OrdinaryNighttime => self.ordinary_nighttime,
            OvertimeCategory::RestDayDaytime => self.rest_day_daytime,
            OvertimeCategory::RestDayNighttime => self.rest_day_nighttime,
        }
    }

    /// Total overtime hours across categories.
    pub fn total(&self) -> Decimal {
        OvertimeCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// User-editable deduction percentages, as fractions of the base salary.
///
/// The value is immutable once built and is passed to the deduction calculator
/// per call; nothing shares or mutates a global rate table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateOverrides {
    /// Court-ordered garnishment.
    pub garnishment: Decimal,
    /// Other authorized deductions.
    pub other_deductions: Decimal,
    /// Company loan repayment.
    pub company_loan: Decimal,
    /// Income-tax withholding.
    pub withholding_tax: Decimal,
}

impl RateOverrides {
    /// Returns the overrides as (field name, rate) pairs in reporting order.
    pub fn entries(&self) -> [(&'static str, Decimal); 4] {
        [
            ("garnishment", self.garnishment),
            ("other_deductions", self.other_deductions),
            ("company_loan", self.company_loan),
            ("withholding_tax", self.withholding_tax),
        ]
    }

    /// Rejects negative percentages with `InvalidRateOverride`.
    pub fn validate(&self) -> EngineResult<()> {
        match self.entries().into_iter().find(|(_, rate)| rate.is_sign_negative()) {
            Some((field, value)) => Err(EngineError::InvalidRateOverride {
                field: field.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }
}

/// The novelty inputs of one line item.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Novelties;
///
/// let novelties: Novelties = serde_json::from_str("{}").unwrap();
/// assert_eq!(novelties.days_to_pay, 30);
/// assert!(!novelties.transport_requested);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Novelties {
    /// Days to pay in the period, 0 to 30.
    pub days_to_pay: u32,
    /// Whether the employee opted into the transport allowance.
    pub transport_requested: bool,
    /// Overtime hours per category.
    pub overtime: OvertimeHours,
    /// Ordinary hours worked at night.
    pub night_hours: Decimal,
    /// User-editable deduction percentages.
    pub deduction_rates: RateOverrides,
}

impl Default for Novelties {
    fn default() -> Self {
        Self {
            days_to_pay: FULL_PERIOD_DAYS,
            transport_requested: false,
            overtime: OvertimeHours::default(),
            night_hours: Decimal::ZERO,
            deduction_rates: RateOverrides::default(),
        }
    }
}

impl Novelties {
    /// Novelties used for bulk assignment: a full period, no hours, default
    /// rates, and the transport allowance left to eligibility and the salary
    /// threshold.
    pub fn neutral() -> Self {
        Self {
            transport_requested: true,
            ..Self::default()
        }
    }

    /// Validates the inputs that materially change pay.
    ///
    /// Days outside `0..=max_days`, negative hour counts and overtime above
    /// `max_days × 24` hours in one category are rejected with
    /// `InvalidNoveltyRange`; negative deduction percentages with
    /// `InvalidRateOverride`. Night hours above the monthly cap are not an error
    /// here, the night-surcharge calculator clamps them.
    pub fn validate(&self, max_days: u32) -> EngineResult<()> {
        if self.days_to_pay > max_days {
            return Err(EngineError::InvalidNoveltyRange {
                field: "days_to_pay".to_string(),
                value: self.days_to_pay.to_string(),
                message: format!("must be between 0 and {}", max_days),
            });
        }

        let max_overtime = Decimal::from(max_days) * Decimal::from(HOURS_PER_CALENDAR_DAY);
        for category in OvertimeCategory::ALL {
            let value = self.overtime.get(category);
            if value > max_overtime {
                return Err(EngineError::InvalidNoveltyRange {
                    field: format!("overtime.{}", category.as_str()),
                    value: value.to_string(),
                    message: format!("must not exceed {} hours per period", max_overtime),
                });
            }
        }

        let hours = OvertimeCategory::ALL
            .iter()
            .map(|c| (format!("overtime.{}", c.as_str()), self.overtime.get(*c)))
            .chain(std::iter::once(("night_hours".to_string(), self.night_hours)));
        for (field, value) in hours {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::InvalidNoveltyRange {
                    field,
                    value: value.to_string(),
                    message: "hours must not be negative".to_string(),
                });
            }
        }

        self.deduction_rates.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_novelties_pay_full_period() {
        let novelties = Novelties::default();
        assert_eq!(novelties.days_to_pay, FULL_PERIOD_DAYS);
        assert_eq!(novelties.overtime.total(), Decimal::ZERO);
        assert!(!novelties.transport_requested);
    }

    #[test]
    fn test_neutral_novelties_request_transport() {
        let novelties = Novelties::neutral();
        assert!(novelties.transport_requested);
        assert_eq!(novelties.days_to_pay, 30);
        assert_eq!(novelties.night_hours, Decimal::ZERO);
    }

    #[test]
    fn test_partial_json_uses_field_defaults() {
        let json = r#"{
            "days_to_pay": 15,
            "overtime": {"ordinary_daytime": "4"},
            "deduction_rates": {"company_loan": "0.05"}
        }"#;

        let novelties: Novelties = serde_json::from_str(json).unwrap();
        assert_eq!(novelties.days_to_pay, 15);
        assert_eq!(novelties.overtime.ordinary_daytime, dec("4"));
        assert_eq!(novelties.overtime.rest_day_nighttime, Decimal::ZERO);
        assert_eq!(novelties.deduction_rates.company_loan, dec("0.05"));
        assert_eq!(novelties.deduction_rates.garnishment, Decimal::ZERO);
    }

    #[test]
    fn test_days_above_period_rejected() {
        let novelties = Novelties {
            days_to_pay: 31,
            ..Novelties::default()
        };

        match novelties.validate(30) {
            Err(EngineError::InvalidNoveltyRange { field, value, .. }) => {
                assert_eq!(field, "days_to_pay");
                assert_eq!(value, "31");
            }
            other => panic!("Expected InvalidNoveltyRange, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_and_full_days_accepted() {
        for days in [0, 30] {
            let novelties = Novelties {
                days_to_pay: days,
                ..Novelties::default()
            };
            assert!(novelties.validate(30).is_ok());
        }
    }

    #[test]
    fn test_negative_overtime_rejected() {
        let mut novelties = Novelties::default();
        novelties.overtime.rest_day_daytime = dec("-2");

        match novelties.validate(30) {
            Err(EngineError::InvalidNoveltyRange { field, .. }) => {
                assert_eq!(field, "overtime.rest_day_daytime");
            }
            other => panic!("Expected InvalidNoveltyRange, got {:?}", other),
        }
    }

    #[test]
    fn test_overtime_beyond_clock_hours_rejected() {
        let mut novelties = Novelties::default();
        novelties.overtime.ordinary_nighttime = dec("720");
        assert!(novelties.validate(30).is_ok());

        novelties.overtime.ordinary_nighttime = dec("720.5");
        match novelties.validate(30) {
            Err(EngineError::InvalidNoveltyRange { field, message, .. }) => {
                assert_eq!(field, "overtime.ordinary_nighttime");
                assert_eq!(message, "must not exceed 720 hours per period");
            }
            other => panic!("Expected InvalidNoveltyRange, got {:?}", other),
        }
    }

    #[test]
    fn test_night_hours_above_cap_are_not_rejected() {
        let novelties = Novelties {
            night_hours: dec("300"),
            ..Novelties::default()
        };
        assert!(novelties.validate(30).is_ok());
    }

    #[test]
    fn test_negative_override_rejected() {
        let mut novelties = Novelties::default();
        novelties.deduction_rates.withholding_tax = dec("-0.01");

        match novelties.validate(30) {
            Err(EngineError::InvalidRateOverride { field, value }) => {
                assert_eq!(field, "withholding_tax");
                assert_eq!(value, dec("-0.01"));
            }
            other => panic!("Expected InvalidRateOverride, got {:?}", other),
        }
    }

    #[test]
    fn test_overtime_total() {
        let hours = OvertimeHours {
            ordinary_daytime: dec("2"),
            ordinary_nighttime: dec("1.5"),
            rest_day_daytime: dec("4"),
            rest_day_nighttime: dec("0.5"),
        };
        assert_eq!(hours.total(), dec("8"));
    }

    #[test]
    fn test_overtime_category_names() {
        let names: Vec<&str> = OvertimeCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ordinary_daytime",
                "ordinary_nighttime",
                "rest_day_daytime",
                "rest_day_nighttime"
            ]
        );
    }
}
