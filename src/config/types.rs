//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata about the jurisdiction the configuration encodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// ISO country code (e.g., "CO").
    pub code: String,
    /// Human-readable name of the rule set.
    pub name: String,
    /// The version or effective date of the rule set.
    pub version: String,
    /// Currency the monetary constants are expressed in.
    pub currency: String,
}

/// Transport allowance constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportAllowanceConfig {
    /// Legal reference for the allowance.
    pub clause: String,
    /// Fixed allowance paid per period.
    pub amount: Decimal,
    /// Salaries strictly below this value qualify.
    pub salary_threshold: Decimal,
}

/// Surcharges over the hourly rate for each overtime category.
///
/// A surcharge of `0.25` means the hour is paid at 125% of the hourly rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeSurcharges {
    /// Legal reference for overtime pay.
    pub clause: String,
    /// Extra hours on an ordinary day, daytime.
    pub ordinary_daytime: Decimal,
    /// Extra hours on an ordinary day, nighttime.
    pub ordinary_nighttime: Decimal,
    /// Extra hours on a rest day, daytime.
    pub rest_day_daytime: Decimal,
    /// Extra hours on a rest day, nighttime.
    pub rest_day_nighttime: Decimal,
}

/// Night-shift surcharge constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightSurchargeConfig {
    /// Legal reference for the surcharge.
    pub clause: String,
    /// Surcharge over the hourly rate for ordinary night hours.
    pub rate: Decimal,
    /// Maximum payable night hours per period; inputs above are clamped.
    pub max_hours_per_period: Decimal,
}

/// Earnings configuration from earnings.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsConfig {
    /// Days in a full pay period; the daily rate is salary / this value.
    pub days_per_period: u32,
    /// Ordinary hours per day; the hourly rate is the daily rate / this value.
    pub hours_per_day: u32,
    /// Transport allowance constants.
    pub transport_allowance: TransportAllowanceConfig,
    /// Overtime surcharges.
    pub overtime: OvertimeSurcharges,
    /// Night-shift surcharge constants.
    pub night_surcharge: NightSurchargeConfig,
}

/// Employee-side statutory rates, as a fraction of salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRates {
    /// Legal reference for employee contributions.
    pub clause: String,
    /// Health insurance.
    pub health: Decimal,
    /// Pension fund.
    pub pension: Decimal,
}

/// Employer-side statutory rates, as a fraction of salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerRates {
    /// Legal reference for employer contributions.
    pub clause: String,
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
}

/// Contribution configuration from contributions.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionsConfig {
    /// Employee-side rates.
    pub employee: EmployeeRates,
    /// Employer-side rates.
    pub employer: EmployerRates,
}

/// One row of the occupational-risk table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelEntry {
    /// Risk level, 1 (lowest) to 5 (highest).
    pub level: u8,
    /// Contribution rate as a fraction of salary.
    pub rate: Decimal,
    /// Human-readable label.
    pub label: String,
}

/// Risk table configuration from risk_levels.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelsConfig {
    /// Legal reference for the table.
    pub clause: String,
    /// One entry per level.
    pub levels: Vec<RiskLevelEntry>,
}

/// How half-way values are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 0.5 rounds away from zero (simple rounding).
    HalfAwayFromZero,
    /// 0.5 rounds to the nearest even digit (banker's rounding).
    HalfEven,
}

/// Rounding and aggregation policy from policy.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Rounding applied to every monetary output.
    pub rounding: RoundingMode,
    /// Decimal places kept after rounding; 0 means whole currency units.
    pub rounding_scale: u32,
    /// How far employee obligation may exceed income before it is an error.
    pub net_pay_tolerance: Decimal,
}

impl PolicyConfig {
    /// Rounds a monetary value according to this policy.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::{PolicyConfig, RoundingMode};
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let policy = PolicyConfig {
    ///     rounding: RoundingMode::HalfAwayFromZero,
    ///     rounding_scale: 0,
    ///     net_pay_tolerance: Decimal::ONE,
    /// };
    /// assert_eq!(policy.round(Decimal::from_str("62.5").unwrap()), Decimal::from(63));
    /// ```
    pub fn round(&self, value: Decimal) -> Decimal {
        let strategy = match self.rounding {
            RoundingMode::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        };
        value.round_dp_with_strategy(self.rounding_scale, strategy)
    }
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollConfig {
    jurisdiction: JurisdictionMetadata,
    earnings: EarningsConfig,
    contributions: ContributionsConfig,
    risk_levels: RiskLevelsConfig,
    policy: PolicyConfig,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    ///
    /// Risk levels are sorted by level. Returns `InvalidConfig` when the period
    /// constants are zero, a rate is negative, or the risk table does not hold
    /// exactly one entry for each level 1 to 5.
    pub fn new(
        jurisdiction: JurisdictionMetadata,
        earnings: EarningsConfig,
        contributions: ContributionsConfig,
        risk_levels: RiskLevelsConfig,
        policy: PolicyConfig,
    ) -> EngineResult<Self> {
        let mut risk_levels = risk_levels;
        risk_levels.levels.sort_by_key(|entry| entry.level);

        let config = Self {
            jurisdiction,
            earnings,
            contributions,
            risk_levels,
            policy,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.earnings.days_per_period == 0 || self.earnings.hours_per_day == 0 {
            return Err(invalid("days_per_period and hours_per_day must be positive"));
        }

        let levels: Vec<u8> = self.risk_levels.levels.iter().map(|e| e.level).collect();
        if levels != [1, 2, 3, 4, 5] {
            return Err(invalid(format!(
                "risk table must define levels 1 to 5 exactly once, found {:?}",
                levels
            )));
        }

        let earnings = &self.earnings;
        let employee = &self.contributions.employee;
        let employer = &self.contributions.employer;
        let named_rates = [
            ("transport_allowance.amount", earnings.transport_allowance.amount),
            ("overtime.ordinary_daytime", earnings.overtime.ordinary_daytime),
            ("overtime.ordinary_nighttime", earnings.overtime.ordinary_nighttime),
            ("overtime.rest_day_daytime", earnings.overtime.rest_day_daytime),
            ("overtime.rest_day_nighttime", earnings.overtime.rest_day_nighttime),
            ("night_surcharge.rate", earnings.night_surcharge.rate),
            ("night_surcharge.max_hours_per_period", earnings.night_surcharge.max_hours_per_period),
            ("employee.health", employee.health),
            ("employee.pension", employee.pension),
            ("employer.health", employer.health),
            ("employer.pension", employer.pension),
            ("employer.apprenticeship_fund", employer.apprenticeship_fund),
            ("employer.family_welfare", employer.family_welfare),
            ("employer.compensation_fund", employer.compensation_fund),
            ("employer.severance", employer.severance),
            ("employer.service_bonus", employer.service_bonus),
            ("employer.vacation", employer.vacation),
            ("policy.net_pay_tolerance", self.policy.net_pay_tolerance),
        ];
        if let Some((name, value)) = named_rates.iter().find(|(_, v)| v.is_sign_negative()) {
            return Err(invalid(format!("{} must not be negative, got {}", name, value)));
        }
        if let Some(entry) = self.risk_levels.levels.iter().find(|e| e.rate.is_sign_negative()) {
            return Err(invalid(format!(
                "risk level {} rate must not be negative",
                entry.level
            )));
        }

        Ok(())
    }

    /// The reference configuration: 2025 statutory values for salaried contracts.
    ///
    /// Matches the files shipped under `config/co_2025`.
    pub fn reference() -> Self {
        Self {
            jurisdiction: JurisdictionMetadata {
                code: "CO".to_string(),
                name: "Colombian statutory payroll".to_string(),
                version: "2025-01-01".to_string(),
                currency: "COP".to_string(),
            },
            earnings: EarningsConfig {
                days_per_period: 30,
                hours_per_day: 8,
                transport_allowance: TransportAllowanceConfig {
                    clause: "Ley 15/1959 art. 2".to_string(),
                    amount: Decimal::from(200_000),
                    salary_threshold: Decimal::from(2_847_000),
                },
                overtime: OvertimeSurcharges {
                    clause: "CST art. 168, 179".to_string(),
                    ordinary_daytime: Decimal::new(25, 2),
                    ordinary_nighttime: Decimal::new(75, 2),
                    rest_day_daytime: Decimal::new(100, 2),
                    rest_day_nighttime: Decimal::new(150, 2),
                },
                night_surcharge: NightSurchargeConfig {
                    clause: "CST art. 168 num. 1".to_string(),
                    rate: Decimal::new(35, 2),
                    max_hours_per_period: Decimal::from(270),
                },
            },
            contributions: ContributionsConfig {
                employee: EmployeeRates {
                    clause: "Ley 100/1993 art. 20, 204".to_string(),
                    health: Decimal::new(4, 2),
                    pension: Decimal::new(4, 2),
                },
                employer: EmployerRates {
                    clause: "Ley 100/1993; Ley 21/1982; CST art. 186, 249, 306".to_string(),
                    health: Decimal::new(85, 3),
                    pension: Decimal::new(12, 2),
                    apprenticeship_fund: Decimal::new(2, 2),
                    family_welfare: Decimal::new(3, 2),
                    compensation_fund: Decimal::new(4, 2),
                    severance: Decimal::new(833, 4),
                    service_bonus: Decimal::new(833, 4),
                    vacation: Decimal::new(417, 4),
                },
            },
            risk_levels: RiskLevelsConfig {
                clause: "Decreto 1772/1994 art. 13".to_string(),
                levels: vec![
                    risk_entry(1, Decimal::new(522, 5), "Minimum"),
                    risk_entry(2, Decimal::new(1044, 5), "Low"),
                    risk_entry(3, Decimal::new(2436, 5), "Medium"),
                    risk_entry(4, Decimal::new(4350, 5), "High"),
                    risk_entry(5, Decimal::new(6960, 5), "Maximum"),
                ],
            },
            policy: PolicyConfig {
                rounding: RoundingMode::HalfAwayFromZero,
                rounding_scale: 0,
                net_pay_tolerance: Decimal::ONE,
            },
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.jurisdiction
    }

    /// Returns the earnings configuration.
    pub fn earnings(&self) -> &EarningsConfig {
        &self.earnings
    }

    /// Returns the contribution rates.
    pub fn contributions(&self) -> &ContributionsConfig {
        &self.contributions
    }

    /// Returns the occupational-risk table configuration.
    pub fn risk_levels(&self) -> &RiskLevelsConfig {
        &self.risk_levels
    }

    /// Returns the rounding and aggregation policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self::reference()
    }
}

fn risk_entry(level: u8, rate: Decimal, label: &str) -> RiskLevelEntry {
    RiskLevelEntry {
        level,
        rate,
        label: label.to_string(),
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        message: message.into(),
    }
}
