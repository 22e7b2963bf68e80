use async_trait::async_trait;

pub mod controller;
pub mod debounce;
pub mod error;
pub mod form;
pub mod query;
pub mod row_actions;
pub mod transport;

pub use controller::{FetchOutcome, ListConfig, ListController, ListEvent, ListSnapshot};
pub use debounce::{DebounceSlot, SearchDebouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use error::ClientError;
pub use form::{EmployeeFormValues, EmployeePayload, FormMode, MutationForm, SubmitOutcome};
pub use query::{ListQuery, SortDirection, SortField, DEFAULT_PAGE_SIZE};
pub use row_actions::RowActionDispatcher;
pub use transport::{EmployeeApi, HttpEmployeeApi};

/// Told about the result of a create, update or delete.
///
/// The list controller implements this by refetching its current page.
#[async_trait]
pub trait MutationObserver: Send + Sync {
    async fn mutation_completed(&self);

    async fn mutation_failed(&self, _message: &str) {}
}

/// Observer for callers that do not keep a list on screen.
pub struct NoopMutationObserver;

#[async_trait]
impl MutationObserver for NoopMutationObserver {
    async fn mutation_completed(&self) {}
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
