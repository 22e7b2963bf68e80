use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DepartmentTableError;

/// Label rendered for a department code the table does not know.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EmployeeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentCode(pub i64);

impl fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bijective lookup between wire department codes and display labels.
///
/// Passed explicitly to whatever needs the translation so that tests can
/// swap in their own table. Label lookup ignores ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentTable {
    entries: Vec<(DepartmentCode, String)>,
}

impl DepartmentTable {
    pub fn new<I, S>(entries: I) -> Result<Self, DepartmentTableError>
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let mut table = Self {
            entries: Vec::new(),
        };
        for (code, label) in entries {
            let code = DepartmentCode(code);
            let label = label.into().trim().to_string();
            if label.is_empty() {
                return Err(DepartmentTableError::EmptyLabel(code));
            }
            if table.label(code).is_some() {
                return Err(DepartmentTableError::DuplicateCode(code));
            }
            if table.code(&label).is_some() {
                return Err(DepartmentTableError::DuplicateLabel(label));
            }
            table.entries.push((code, label));
        }
        Ok(table)
    }

    pub fn standard() -> Self {
        Self {
            entries: [
                (0, "Tech"),
                (1, "HR"),
                (2, "Admin"),
                (3, "Accounts"),
                (4, "Marketing"),
            ]
            .into_iter()
            .map(|(code, label)| (DepartmentCode(code), label.to_string()))
            .collect(),
        }
    }

    pub fn label(&self, code: DepartmentCode) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, label)| label.as_str())
    }

    pub fn code(&self, label: &str) -> Option<DepartmentCode> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|(_, candidate)| candidate.eq_ignore_ascii_case(label))
            .map(|(code, _)| *code)
    }

    /// Label for display; unmapped codes fall back to [`UNKNOWN_DEPARTMENT`].
    pub fn display_label(&self, code: DepartmentCode) -> &str {
        self.label(code).unwrap_or(UNKNOWN_DEPARTMENT)
    }

    /// Canonical spelling of a label entered in any case.
    pub fn canonical_label(&self, label: &str) -> Option<&str> {
        self.code(label).and_then(|code| self.label(code))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, label)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DepartmentTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Display form of an employee row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub department_code: DepartmentCode,
    pub department: Option<String>,
    pub date_of_birth: NaiveDate,
}

impl EmployeeRecord {
    pub fn department_label(&self) -> &str {
        self.department.as_deref().unwrap_or(UNKNOWN_DEPARTMENT)
    }

    /// Date of birth rendered as `Mon Jan 01 1990`.
    pub fn date_of_birth_display(&self) -> String {
        self.date_of_birth.format("%a %b %d %Y").to_string()
    }
}
