//! Contract model and related types.
//!
//! A contract ties a person to a salary, an affiliation and contract type (which
//! decide eligibility for variable pay) and an occupational-risk level.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::PayrollRun;

/// How the worker is affiliated to the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffiliationType {
    /// A salaried employee.
    Employee,
    /// An independent contractor providing services.
    Contractor,
}

/// The legal form of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Fixed-term employment.
    FixedTerm,
    /// Open-ended employment.
    Indefinite,
    /// Employment lasting for a specific work or labor.
    WorkOrLabor,
    /// Apprenticeship agreement.
    Apprenticeship,
    /// Contract for services.
    Services,
}

/// Which variable-pay components a contract may accrue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    /// Overtime hours are paid.
    pub overtime_allowed: bool,
    /// Night-shift surcharge is paid.
    pub night_surcharge_allowed: bool,
    /// Transport allowance may be paid.
    pub transport_allowance_allowed: bool,
}

impl Eligibility {
    /// Every component allowed, or none.
    pub fn uniform(eligible: bool) -> Self {
        Self {
            overtime_allowed: eligible,
            night_surcharge_allowed: eligible,
            transport_allowance_allowed: eligible,
        }
    }

    /// Returns true when all variable-pay components apply.
    pub fn eligible_for_variable_pay(&self) -> bool {
        self.overtime_allowed && self.night_surcharge_allowed && self.transport_allowance_allowed
    }
}

/// A salary as received from the persistence layer: either a number or a
/// numeric-like string that still needs sanitizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SalaryValue {
    /// An already numeric amount.
    Amount(Decimal),
    /// Free text such as `"$ 1.500.000"`.
    Text(String),
}

impl From<Decimal> for SalaryValue {
    fn from(value: Decimal) -> Self {
        SalaryValue::Amount(value)
    }
}

impl From<&str> for SalaryValue {
    fn from(value: &str) -> Self {
        SalaryValue::Text(value.to_string())
    }
}

impl std::fmt::Display for SalaryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SalaryValue::Amount(amount) => write!(f, "{}", amount),
            SalaryValue::Text(text) => write!(f, "{}", text),
        }
    }
}

/// An employment or services contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier for the contract.
    pub id: String,
    /// The person holding the contract.
    pub person_id: String,
    /// Affiliation of the worker.
    pub affiliation_type: AffiliationType,
    /// Legal form of the contract.
    pub contract_type: ContractType,
    /// Monthly base salary, possibly unsanitized.
    pub base_salary: SalaryValue,
    /// Occupational-risk level 1 to 5; absent means level 1.
    #[serde(default)]
    pub risk_level: Option<u8>,
    /// Whether the contract is currently active.
    #[serde(default = "default_active")]
    pub active: bool,
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract, if it has one.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_active() -> bool {
    true
}

impl Contract {
    /// Returns the sanitized base salary.
    ///
    /// Fails with `MalformedSalary` when the value is not a positive number.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{AffiliationType, Contract, ContractType, SalaryValue};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let contract = Contract {
    ///     id: "ct_001".to_string(),
    ///     person_id: "per_001".to_string(),
    ///     affiliation_type: AffiliationType::Employee,
    ///     contract_type: ContractType::Indefinite,
    ///     base_salary: SalaryValue::from("$ 1.500.000"),
    ///     risk_level: Some(1),
    ///     active: true,
    ///     start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    ///     end_date: None,
    /// };
    /// assert_eq!(contract.salary().unwrap(), Decimal::from(1_500_000));
    /// ```
    pub fn salary(&self) -> EngineResult<Decimal> {
        let parsed = match &self.base_salary {
            SalaryValue::Amount(amount) => Ok(*amount),
            SalaryValue::Text(text) => sanitize_salary(text),
        };

        parsed
            .and_then(|amount| {
                if amount <= Decimal::ZERO {
                    Err("must be greater than zero".to_string())
                } else {
                    Ok(amount.normalize())
                }
            })
            .map_err(|message| EngineError::MalformedSalary {
                contract_id: self.id.clone(),
                value: self.base_salary.to_string(),
                message,
            })
    }

    /// Returns true if the contract is flagged active and its dates overlap the run.
    pub fn is_active_during(&self, run: &PayrollRun) -> bool {
        self.active
            && self.start_date <= run.end_date
            && self.end_date.is_none_or(|end| end >= run.start_date)
    }
}

/// Turns a numeric-like salary string into a decimal amount.
///
/// Currency symbols, currency codes, whitespace and underscores are dropped.
/// When both `.` and `,` appear, the one that appears last is the decimal
/// separator. When only one of them appears it is a thousands separator if it
/// occurs more than once or is followed by exactly three digits, otherwise it
/// is the decimal separator.
pub fn sanitize_salary(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_end_matches(|c: char| c.is_ascii_alphabetic());

    let mut cleaned = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '0'..='9' | '.' | ',' | '-' => cleaned.push(c),
            '$' | '_' | '\'' => {}
            c if c.is_whitespace() => {}
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    if cleaned.contains('-') {
        return Err("must not be negative".to_string());
    }
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err("no digits found".to_string());
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal_sep, group_sep) = if dot > comma { ('.', ',') } else { (',', '.') };
            if cleaned.matches(decimal_sep).count() > 1 {
                return Err("more than one decimal separator".to_string());
            }
            let (int_part, frac_part) = cleaned
                .split_once(decimal_sep)
                .ok_or_else(|| "missing decimal separator".to_string())?;
            format!("{}.{}", strip_grouping(int_part, group_sep)?, frac_part)
        }
        (Some(_), None) => single_separator(&cleaned, '.')?,
        (None, Some(_)) => single_separator(&cleaned, ',')?,
        (None, None) => cleaned,
    };

    Decimal::from_str(&normalized).map_err(|e| format!("not a number: {}", e))
}

fn single_separator(value: &str, sep: char) -> Result<String, String> {
    let count = value.matches(sep).count();
    let (head, tail) = value
        .rsplit_once(sep)
        .ok_or_else(|| "missing separator".to_string())?;
    let looks_grouped = tail.len() == 3 && !head.is_empty() && !head.starts_with('0');

    if count > 1 || looks_grouped {
        strip_grouping(value, sep)
    } else {
        Ok(format!("{}.{}", head, tail))
    }
}

fn strip_grouping(value: &str, sep: char) -> Result<String, String> {
    let mut groups = value.split(sep);
    let first = groups.next().unwrap_or_default();
    if first.is_empty() || (first.len() > 3 && value.contains(sep)) {
        return Err(format!("inconsistent digit grouping in '{}'", value));
    }

    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 {
            return Err(format!("inconsistent digit grouping in '{}'", value));
        }
        digits.push_str(group);
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Periodicity;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_contract(base_salary: SalaryValue) -> Contract {
        Contract {
            id: "ct_001".to_string(),
            person_id: "per_001".to_string(),
            affiliation_type: AffiliationType::Employee,
            contract_type: ContractType::Indefinite,
            base_salary,
            risk_level: Some(1),
            active: true,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: None,
        }
    }

    fn create_test_run() -> PayrollRun {
        PayrollRun {
            id: "run_2025_03".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            periodicity: Periodicity::Monthly,
            description: None,
        }
    }

    #[test]
    fn test_sanitize_plain_digits() {
        assert_eq!(sanitize_salary("1500000").unwrap(), dec("1500000"));
    }

    #[test]
    fn test_sanitize_dot_grouping_with_currency_symbol() {
        assert_eq!(sanitize_salary("$ 1.500.000").unwrap(), dec("1500000"));
    }

    #[test]
    fn test_sanitize_comma_grouping_with_currency_code() {
        assert_eq!(sanitize_salary("COP 2,800,000").unwrap(), dec("2800000"));
    }

    #[test]
    fn test_sanitize_mixed_separators_comma_decimal() {
        assert_eq!(sanitize_salary("1.500.000,50").unwrap(), dec("1500000.50"));
    }

    #[test]
    fn test_sanitize_mixed_separators_dot_decimal() {
        assert_eq!(sanitize_salary("1,500,000.75").unwrap(), dec("1500000.75"));
    }

    #[test]
    fn test_sanitize_single_separator_with_two_decimals() {
        assert_eq!(sanitize_salary("1500000.50").unwrap(), dec("1500000.50"));
        assert_eq!(sanitize_salary("1500000,5").unwrap(), dec("1500000.5"));
    }

    #[test]
    fn test_sanitize_single_separator_three_digits_is_grouping() {
        assert_eq!(sanitize_salary("2.800").unwrap(), dec("2800"));
    }

    #[test]
    fn test_sanitize_leading_zero_is_decimal() {
        assert_eq!(sanitize_salary("0.125").unwrap(), dec("0.125"));
    }

    #[test]
    fn test_sanitize_rejects_negative() {
        assert_eq!(
            sanitize_salary("-1500000").unwrap_err(),
            "must not be negative"
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_and_text() {
        assert!(sanitize_salary("").is_err());
        assert!(sanitize_salary("   ").is_err());
        assert!(sanitize_salary("abc").is_err());
        assert!(sanitize_salary("12x34").is_err());
    }

    #[test]
    fn test_sanitize_rejects_inconsistent_grouping() {
        assert!(sanitize_salary("1.50.000").is_err());
        assert!(sanitize_salary("1,5,0").is_err());
    }

    #[test]
    fn test_salary_from_amount() {
        let contract = create_test_contract(SalaryValue::Amount(dec("1500000")));
        assert_eq!(contract.salary().unwrap(), dec("1500000"));
    }

    #[test]
    fn test_salary_zero_is_malformed() {
        let contract = create_test_contract(SalaryValue::from("0"));
        match contract.salary() {
            Err(EngineError::MalformedSalary {
                contract_id,
                value,
                message,
            }) => {
                assert_eq!(contract_id, "ct_001");
                assert_eq!(value, "0");
                assert!(message.contains("greater than zero"));
            }
            other => panic!("Expected MalformedSalary, got {:?}", other),
        }
    }

    #[test]
    fn test_salary_garbage_is_malformed() {
        let contract = create_test_contract(SalaryValue::from("n/a"));
        assert!(matches!(
            contract.salary(),
            Err(EngineError::MalformedSalary { .. })
        ));
    }

    #[test]
    fn test_deserialize_contract_with_numeric_salary() {
        let json = r#"{
            "id": "ct_010",
            "person_id": "per_010",
            "affiliation_type": "employee",
            "contract_type": "fixed_term",
            "base_salary": 1423500,
            "start_date": "2025-01-01"
        }"#;

        let contract: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.salary().unwrap(), dec("1423500"));
        assert!(contract.active);
        assert!(contract.risk_level.is_none());
    }

    #[test]
    fn test_deserialize_contract_with_text_salary() {
        let json = r#"{
            "id": "ct_011",
            "person_id": "per_011",
            "affiliation_type": "contractor",
            "contract_type": "services",
            "base_salary": "$3.200.000",
            "risk_level": 2,
            "active": false,
            "start_date": "2025-01-01",
            "end_date": "2025-06-30"
        }"#;

        let contract: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.base_salary, SalaryValue::Text("$3.200.000".to_string()));
        assert_eq!(contract.salary().unwrap(), dec("3200000"));
        assert_eq!(contract.affiliation_type, AffiliationType::Contractor);
        assert_eq!(contract.contract_type, ContractType::Services);
    }

    #[test]
    fn test_is_active_during_overlapping_run() {
        let contract = create_test_contract(SalaryValue::from("1500000"));
        assert!(contract.is_active_during(&create_test_run()));
    }

    #[test]
    fn test_is_not_active_when_flag_is_false() {
        let mut contract = create_test_contract(SalaryValue::from("1500000"));
        contract.active = false;
        assert!(!contract.is_active_during(&create_test_run()));
    }

    #[test]
    fn test_is_not_active_when_ended_before_run() {
        let mut contract = create_test_contract(SalaryValue::from("1500000"));
        contract.end_date = NaiveDate::from_ymd_opt(2025, 2, 28);
        assert!(!contract.is_active_during(&create_test_run()));
    }

    #[test]
    fn test_is_not_active_when_starting_after_run() {
        let mut contract = create_test_contract(SalaryValue::from("1500000"));
        contract.start_date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert!(!contract.is_active_during(&create_test_run()));
    }

    #[test]
    fn test_uniform_eligibility() {
        assert!(Eligibility::uniform(true).eligible_for_variable_pay());
        assert!(!Eligibility::uniform(false).eligible_for_variable_pay());
    }
}
