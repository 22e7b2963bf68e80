//! Create/update form for a single employee.

use chrono::NaiveDate;
use shared::{
    domain::{DepartmentTable, EmployeeId, EmployeeRecord},
    error::{FormField, ValidationError},
    protocol::{format_wire_timestamp, CreateEmployeeRequest, UpdateEmployeeRequest},
};
use tracing::{error, info};

use crate::{error::ClientError, transport::EmployeeApi, MutationObserver};

pub const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(EmployeeId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFormValues {
    pub name: String,
    pub email: String,
    pub department: String,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeePayload {
    Create(CreateEmployeeRequest),
    Update(UpdateEmployeeRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Invalid(Vec<ValidationError>),
    Failed(String),
    NotOpen,
}

#[derive(Debug, Clone)]
pub struct MutationForm {
    mode: FormMode,
    values: EmployeeFormValues,
    errors: Vec<ValidationError>,
    last_error: Option<String>,
    open: bool,
}

impl MutationForm {
    pub fn for_create() -> Self {
        Self::with_values(FormMode::Create, EmployeeFormValues::default())
    }

    /// Pre-filled from a displayed row. An unknown department is left blank
    /// so the user has to pick one.
    pub fn for_update(row: &EmployeeRecord) -> Self {
        Self::with_values(
            FormMode::Update(row.id.clone()),
            EmployeeFormValues {
                name: row.name.clone(),
                email: row.email.clone(),
                department: row.department.clone().unwrap_or_default(),
                date_of_birth: Some(row.date_of_birth),
            },
        )
    }

    pub fn with_values(mode: FormMode, values: EmployeeFormValues) -> Self {
        Self {
            mode,
            values,
            errors: Vec::new(),
            last_error: None,
            open: true,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Employee",
            FormMode::Update(_) => "Update Employee",
        }
    }

    pub fn values(&self) -> &EmployeeFormValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut EmployeeFormValues {
        &mut self.values
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn field_error(&self, field: FormField) -> Option<&ValidationError> {
        self.errors.iter().find(|err| err.field() == field)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Checks every field and builds the wire payload. All field errors
    /// are reported, not just the first.
    pub fn validate(
        &self,
        departments: &DepartmentTable,
    ) -> Result<EmployeePayload, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let name = required_text(FormField::Name, &self.values.name, &mut errors);
        let email = required_text(FormField::Email, &self.values.email, &mut errors);

        let department = self.values.department.trim();
        let code = if department.is_empty() {
            errors.push(ValidationError::Required(FormField::Department));
            None
        } else {
            let code = departments.code(department);
            if code.is_none() {
                errors.push(ValidationError::UnknownDepartment(department.to_string()));
            }
            code
        };

        if self.values.date_of_birth.is_none() {
            errors.push(ValidationError::Required(FormField::DateOfBirth));
        }

        let (Some(name), Some(email), Some(department), Some(date_of_birth), true) = (
            name,
            email,
            code,
            self.values.date_of_birth,
            errors.is_empty(),
        ) else {
            return Err(errors);
        };

        let date_of_birth = format_wire_timestamp(date_of_birth);
        Ok(match &self.mode {
            FormMode::Create => EmployeePayload::Create(CreateEmployeeRequest {
                name,
                email,
                date_of_birth,
                department,
            }),
            FormMode::Update(id) => EmployeePayload::Update(UpdateEmployeeRequest {
                id: id.clone(),
                name,
                email,
                date_of_birth,
                department,
            }),
        })
    }

    /// Validates and sends the form. On success the form closes and the
    /// observer is told; on failure the form stays open with its values.
    pub async fn submit(
        &mut self,
        api: &dyn EmployeeApi,
        departments: &DepartmentTable,
        observer: &dyn MutationObserver,
    ) -> SubmitOutcome {
        if !self.open {
            return SubmitOutcome::NotOpen;
        }

        let payload = match self.validate(departments) {
            Ok(payload) => payload,
            Err(errors) => {
                self.errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.errors.clear();

        match send_payload(api, &payload).await {
            Ok(()) => {
                self.open = false;
                self.last_error = None;
                observer.mutation_completed().await;
                SubmitOutcome::Saved
            }
            Err(err) => {
                let message = err.to_string();
                error!(form = self.title(), error = %message, "employee submit failed");
                self.last_error = Some(message.clone());
                observer.mutation_failed(&message).await;
                SubmitOutcome::Failed(message)
            }
        }
    }
}

async fn send_payload(api: &dyn EmployeeApi, payload: &EmployeePayload) -> Result<(), ClientError> {
    match payload {
        EmployeePayload::Create(request) => {
            info!(name = %request.name, "creating employee");
            api.create_employee(request).await
        }
        EmployeePayload::Update(request) => {
            info!(id = %request.id, "updating employee");
            api.update_employee(request).await
        }
    }
}

fn required_text(
    field: FormField,
    raw: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(ValidationError::Required(field));
        return None;
    }
    if value.chars().count() > MAX_TEXT_LEN {
        errors.push(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
