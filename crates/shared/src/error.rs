use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DepartmentCode, EmployeeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Department,
    DateOfBirth,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Department => "Department",
            FormField::DateOfBirth => "Date of birth",
        };
        f.write_str(label)
    }
}

/// Client-side form validation failure. Blocks submission and is shown
/// next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(FormField),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: FormField, max: usize },
    #[error("department '{0}' is not recognised")]
    UnknownDepartment(String),
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::Required(field) => *field,
            ValidationError::TooLong { field, .. } => *field,
            ValidationError::UnknownDepartment(_) => FormField::Department,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepartmentTableError {
    #[error("department code {0} is mapped more than once")]
    DuplicateCode(DepartmentCode),
    #[error("department label '{0}' is mapped more than once")]
    DuplicateLabel(String),
    #[error("department code {0} has an empty label")]
    EmptyLabel(DepartmentCode),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("employee {id} has an unreadable date of birth '{raw}'")]
    MalformedDateOfBirth { id: EmployeeId, raw: String },
}
