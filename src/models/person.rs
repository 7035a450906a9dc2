//! Person model.
//!
//! Persons are reference data owned by the external persistence layer. The
//! engine only reads them to identify who a line item pays.

use serde::{Deserialize, Serialize};

/// Sex as recorded on the person's identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Female.
    Female,
    /// Male.
    Male,
    /// Any other registered value.
    Other,
}

/// Civil status of the person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    /// Never married.
    Single,
    /// Married.
    Married,
    /// Common-law union.
    CommonLaw,
    /// Divorced.
    Divorced,
    /// Widowed.
    Widowed,
}

/// A person who holds one or more contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier for the person.
    pub id: String,
    /// National identification number.
    pub national_id: String,
    /// Given names.
    pub given_names: String,
    /// Surnames.
    pub surnames: String,
    /// Registered sex, if known.
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Civil status, if known.
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
}

impl Person {
    /// Returns the person's display name, given names first.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::Person;
    ///
    /// let person = Person {
    ///     id: "per_001".to_string(),
    ///     national_id: "1020304050".to_string(),
    ///     given_names: "Ana Maria".to_string(),
    ///     surnames: "Rojas Diaz".to_string(),
    ///     sex: None,
    ///     marital_status: None,
    /// };
    /// assert_eq!(person.full_name(), "Ana Maria Rojas Diaz");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names.trim(), self.surnames.trim())
            .trim()
            .to_string()
    }
}
