use std::sync::Arc;

use shared::domain::{EmployeeId, EmployeeRecord};
use tracing::{error, info};

use crate::{error::ClientError, form::MutationForm, transport::EmployeeApi, MutationObserver};

/// Turns the edit and delete affordances of a table row into actions.
pub struct RowActionDispatcher {
    api: Arc<dyn EmployeeApi>,
    observer: Arc<dyn MutationObserver>,
}

impl RowActionDispatcher {
    pub fn new(api: Arc<dyn EmployeeApi>, observer: Arc<dyn MutationObserver>) -> Self {
        Self { api, observer }
    }

    pub fn edit(&self, row: &EmployeeRecord) -> MutationForm {
        MutationForm::for_update(row)
    }

    /// Deletes immediately, then tells the observer so the list refetches.
    /// A failed delete leaves local rows untouched.
    pub async fn delete(&self, row: &EmployeeRecord) -> Result<(), ClientError> {
        self.delete_by_id(&row.id).await
    }

    pub async fn delete_by_id(&self, id: &EmployeeId) -> Result<(), ClientError> {
        info!(%id, "deleting employee");
        match self.api.delete_employee(id).await {
            Ok(()) => {
                self.observer.mutation_completed().await;
                Ok(())
            }
            Err(err) => {
                error!(%id, error = %err, "employee delete failed");
                self.observer.mutation_failed(&err.to_string()).await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        form::FormMode,
        test_support::{sample_rows, InMemoryEmployeeApi, RecordingObserver},
    };
    use shared::domain::DepartmentTable;

    fn row(index: usize) -> EmployeeRecord {
        sample_rows()[index]
            .clone()
            .into_record(&DepartmentTable::standard())
            .expect("record")
    }

    #[test]
    fn edit_opens_prefilled_update_form() {
        let dispatcher = RowActionDispatcher::new(
            Arc::new(InMemoryEmployeeApi::new(sample_rows())),
            Arc::new(RecordingObserver::default()),
        );
        let form = dispatcher.edit(&row(4));
        assert!(form.is_open());
        assert_eq!(form.mode(), &FormMode::Update(row(4).id));
        assert_eq!(form.values().name, "Eli");
        assert_eq!(form.values().department, "Marketing");
    }

    #[tokio::test]
    async fn failed_delete_reports_and_skips_refresh() {
        let api = Arc::new(InMemoryEmployeeApi::new(sample_rows()));
        api.fail_mutations(true);
        let observer = Arc::new(RecordingObserver::default());
        let dispatcher = RowActionDispatcher::new(api.clone(), observer.clone());

        let err = dispatcher.delete(&row(0)).await.expect_err("must fail");
        assert_eq!(err.status(), Some(500));
        assert_eq!(observer.completed(), 0);
        assert_eq!(observer.failures().await.len(), 1);
        assert!(api.deleted().await.is_empty());
    }
}
