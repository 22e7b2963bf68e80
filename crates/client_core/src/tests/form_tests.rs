use super::*;
use crate::test_support::{sample_rows, InMemoryEmployeeApi, RecordingObserver};
use shared::domain::DepartmentCode;

fn dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1992, 8, 17).expect("date")
}

fn filled_values() -> EmployeeFormValues {
    EmployeeFormValues {
        name: "  Grace ".into(),
        email: "grace@example.com".into(),
        department: "admin".into(),
        date_of_birth: Some(dob()),
    }
}

#[test]
fn empty_form_reports_every_required_field() {
    let form = MutationForm::for_create();
    let errors = form
        .validate(&DepartmentTable::standard())
        .expect_err("must be invalid");
    assert_eq!(
        errors,
        vec![
            ValidationError::Required(FormField::Name),
            ValidationError::Required(FormField::Email),
            ValidationError::Required(FormField::Department),
            ValidationError::Required(FormField::DateOfBirth),
        ]
    );
    assert_eq!(errors[0].to_string(), "Name is required");
    assert_eq!(errors[3].to_string(), "Date of birth is required");
}

#[test]
fn rejects_overlong_text_and_unknown_department() {
    let mut values = filled_values();
    values.name = "x".repeat(MAX_TEXT_LEN + 1);
    values.department = "Sales".into();
    let form = MutationForm::with_values(FormMode::Create, values);

    let errors = form
        .validate(&DepartmentTable::standard())
        .expect_err("must be invalid");
    assert_eq!(
        errors,
        vec![
            ValidationError::TooLong {
                field: FormField::Name,
                max: MAX_TEXT_LEN
            },
            ValidationError::UnknownDepartment("Sales".into()),
        ]
    );
}

#[test]
fn create_payload_maps_label_to_code_and_normalizes_date() {
    let form = MutationForm::with_values(FormMode::Create, filled_values());
    let payload = form.validate(&DepartmentTable::standard()).expect("valid");
    assert_eq!(
        payload,
        EmployeePayload::Create(CreateEmployeeRequest {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            date_of_birth: "1992-08-17T00:00:00.000Z".into(),
            department: DepartmentCode(2),
        })
    );
}

#[test]
fn update_form_is_prefilled_from_row() {
    let table = DepartmentTable::standard();
    let row = sample_rows()[1].clone().into_record(&table).expect("record");
    let form = MutationForm::for_update(&row);

    assert_eq!(form.title(), "Update Employee");
    assert_eq!(form.mode(), &FormMode::Update(EmployeeId::from("2")));
    assert_eq!(form.values().department, "HR");

    let EmployeePayload::Update(request) = form.validate(&table).expect("valid") else {
        panic!("expected update payload");
    };
    assert_eq!(request.id, EmployeeId::from("2"));
    assert_eq!(request.department, DepartmentCode(1));
    assert_eq!(request.date_of_birth, "1988-03-14T00:00:00.000Z");
}

#[test]
fn unknown_department_on_row_leaves_field_blank() {
    let table = DepartmentTable::standard();
    let mut wire = sample_rows()[0].clone();
    wire.department = DepartmentCode(77);
    let row = wire.into_record(&table).expect("record");

    let form = MutationForm::for_update(&row);
    assert_eq!(form.values().department, "");
    let errors = form.validate(&table).expect_err("must be invalid");
    assert_eq!(errors, vec![ValidationError::Required(FormField::Department)]);
}

#[tokio::test]
async fn successful_submit_closes_form_and_notifies_observer() {
    let api = InMemoryEmployeeApi::new(sample_rows());
    let observer = RecordingObserver::default();
    let mut form = MutationForm::with_values(FormMode::Create, filled_values());

    let outcome = form
        .submit(&api, &DepartmentTable::standard(), &observer)
        .await;

    assert_eq!(outcome, SubmitOutcome::Saved);
    assert!(!form.is_open());
    assert_eq!(observer.completed(), 1);
    assert_eq!(api.created().await.len(), 1);
    assert_eq!(
        form.submit(&api, &DepartmentTable::standard(), &observer)
            .await,
        SubmitOutcome::NotOpen
    );
}

#[tokio::test]
async fn invalid_submit_never_reaches_the_api() {
    let api = InMemoryEmployeeApi::new(sample_rows());
    let observer = RecordingObserver::default();
    let mut form = MutationForm::for_create();
    form.values_mut().name = "Lin".into();

    let outcome = form
        .submit(&api, &DepartmentTable::standard(), &observer)
        .await;

    assert!(matches!(outcome, SubmitOutcome::Invalid(ref errors) if errors.len() == 3));
    assert!(form.is_open());
    assert_eq!(
        form.field_error(FormField::Email),
        Some(&ValidationError::Required(FormField::Email))
    );
    assert_eq!(form.field_error(FormField::Name), None);
    assert!(api.created().await.is_empty());
    assert_eq!(observer.completed(), 0);
}

#[tokio::test]
async fn failed_submit_keeps_form_open_with_values() {
    let api = InMemoryEmployeeApi::new(sample_rows());
    api.fail_mutations(true);
    let observer = RecordingObserver::default();
    let row = sample_rows()[0]
        .clone()
        .into_record(&DepartmentTable::standard())
        .expect("record");
    let mut form = MutationForm::for_update(&row);
    form.values_mut().email = "ada@corp.example".into();

    let outcome = form
        .submit(&api, &DepartmentTable::standard(), &observer)
        .await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ref message) if message.contains("500")));
    assert!(form.is_open());
    assert_eq!(form.values().email, "ada@corp.example");
    assert!(form.last_error().is_some_and(|err| err.contains("mutation rejected")));
    assert_eq!(observer.completed(), 0);
    assert_eq!(observer.failures().await.len(), 1);
    assert!(api.updated().await.is_empty());

    api.fail_mutations(false);
    let outcome = form
        .submit(&api, &DepartmentTable::standard(), &observer)
        .await;
    assert_eq!(outcome, SubmitOutcome::Saved);
    assert_eq!(form.last_error(), None);
    assert_eq!(api.updated().await[0].email, "ada@corp.example");
}
