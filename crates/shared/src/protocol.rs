use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::{DepartmentCode, DepartmentTable, EmployeeId, EmployeeRecord},
    error::RecordError,
};

/// Employee row as exchanged with `/api/employee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeWire {
    #[serde(deserialize_with = "deserialize_employee_id")]
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    #[serde(rename = "doB")]
    pub date_of_birth: String,
    pub department: DepartmentCode,
}

impl EmployeeWire {
    pub fn into_record(self, departments: &DepartmentTable) -> Result<EmployeeRecord, RecordError> {
        let Some(date_of_birth) = parse_wire_date(&self.date_of_birth) else {
            return Err(RecordError::MalformedDateOfBirth {
                id: self.id,
                raw: self.date_of_birth,
            });
        };
        Ok(EmployeeRecord {
            department: departments.label(self.department).map(str::to_string),
            department_code: self.department,
            id: self.id,
            name: self.name,
            email: self.email,
            date_of_birth,
        })
    }

    pub fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            date_of_birth: format_wire_timestamp(record.date_of_birth),
            department: record.department_code,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeListResponse {
    #[serde(default)]
    pub result: Vec<EmployeeWire>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    #[serde(rename = "doB")]
    pub date_of_birth: String,
    pub department: DepartmentCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    #[serde(rename = "doB")]
    pub date_of_birth: String,
    pub department: DepartmentCode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEmployeeId {
    Text(String),
    Number(i64),
}

// Backends disagree on whether ids are JSON strings or numbers.
fn deserialize_employee_id<'de, D>(deserializer: D) -> Result<EmployeeId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawEmployeeId::deserialize(deserializer)? {
        RawEmployeeId::Text(text) => EmployeeId(text),
        RawEmployeeId::Number(number) => EmployeeId(number.to_string()),
    })
}

/// Reads the calendar date out of a wire `doB`.
///
/// Accepts RFC 3339 timestamps (date taken in the timestamp's own offset),
/// offset-less ISO date-times and bare `YYYY-MM-DD` dates.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Normalises a date to the absolute timestamp sent as `doB`:
/// midnight UTC with millisecond precision.
pub fn format_wire_timestamp(date: NaiveDate) -> String {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
