use std::{
    collections::VecDeque,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{DepartmentCode, EmployeeId},
    protocol::{CreateEmployeeRequest, EmployeeListResponse, EmployeeWire, UpdateEmployeeRequest},
};
use tokio::sync::Mutex;

use crate::{
    error::ClientError,
    query::{ListQuery, SortDirection, SortField},
    transport::EmployeeApi,
    MutationObserver,
};

pub(crate) fn wire(id: &str, name: &str, department: i64, dob: &str) -> EmployeeWire {
    EmployeeWire {
        id: EmployeeId::from(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        date_of_birth: dob.to_string(),
        department: DepartmentCode(department),
    }
}

pub(crate) fn sample_rows() -> Vec<EmployeeWire> {
    vec![
        wire("1", "Ada", 0, "1990-01-01T00:00:00"),
        wire("2", "Bo", 1, "1988-03-14T00:00:00"),
        wire("3", "Cy", 2, "1979-11-30T00:00:00"),
        wire("4", "Dee", 3, "2001-07-04T00:00:00"),
        wire("5", "Eli", 4, "1995-05-05T00:00:00"),
    ]
}

/// Employee API double backed by a vector. Records every list query and
/// can be told to fail or to delay individual list calls.
pub(crate) struct InMemoryEmployeeApi {
    rows: Mutex<Vec<EmployeeWire>>,
    queries: Mutex<Vec<ListQuery>>,
    list_delays: Mutex<VecDeque<Duration>>,
    created: Mutex<Vec<CreateEmployeeRequest>>,
    updated: Mutex<Vec<UpdateEmployeeRequest>>,
    deleted: Mutex<Vec<EmployeeId>>,
    fail_lists: AtomicBool,
    fail_mutations: AtomicBool,
    next_id: AtomicUsize,
}

impl InMemoryEmployeeApi {
    pub(crate) fn new(rows: Vec<EmployeeWire>) -> Self {
        let next_id = rows.len() + 1;
        Self {
            rows: Mutex::new(rows),
            queries: Mutex::new(Vec::new()),
            list_delays: Mutex::new(VecDeque::new()),
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            fail_lists: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            next_id: AtomicUsize::new(next_id),
        }
    }

    pub(crate) fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Delays consumed in order by subsequent list calls.
    pub(crate) async fn push_list_delays(&self, delays: impl IntoIterator<Item = Duration>) {
        self.list_delays.lock().await.extend(delays);
    }

    pub(crate) async fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().await.clone()
    }

    pub(crate) async fn created(&self) -> Vec<CreateEmployeeRequest> {
        self.created.lock().await.clone()
    }

    pub(crate) async fn updated(&self) -> Vec<UpdateEmployeeRequest> {
        self.updated.lock().await.clone()
    }

    pub(crate) async fn deleted(&self) -> Vec<EmployeeId> {
        self.deleted.lock().await.clone()
    }

    fn mutation_result(&self) -> Result<(), ClientError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                body: "mutation rejected".into(),
            });
        }
        Ok(())
    }
}

fn matches_search(row: &EmployeeWire, key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    row.name.to_ascii_lowercase().contains(&key) || row.email.to_ascii_lowercase().contains(&key)
}

#[async_trait]
impl EmployeeApi for InMemoryEmployeeApi {
    async fn list_employees(&self, query: &ListQuery) -> Result<EmployeeListResponse, ClientError> {
        self.queries.lock().await.push(query.clone());
        let delay = self.list_delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 503,
                body: "list unavailable".into(),
            });
        }

        let mut rows: Vec<EmployeeWire> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| {
                query
                    .search_key
                    .as_deref()
                    .map_or(true, |key| matches_search(row, key))
            })
            .cloned()
            .collect();

        if let Some(field) = query.sort_field {
            rows.sort_by(|a, b| match field {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Name => a.name.cmp(&b.name),
                SortField::Email => a.email.cmp(&b.email),
                SortField::Department => a.department.cmp(&b.department),
                SortField::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
            });
            if query.sort_direction == Some(SortDirection::Descending) {
                rows.reverse();
            }
        }

        let count = rows.len() as u64;
        let size = query.page_size as usize;
        let result = rows
            .into_iter()
            .skip(query.page_index as usize * size)
            .take(size)
            .collect();
        Ok(EmployeeListResponse { result, count })
    }

    async fn create_employee(&self, request: &CreateEmployeeRequest) -> Result<(), ClientError> {
        self.mutation_result()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.rows.lock().await.push(EmployeeWire {
            id: EmployeeId(id),
            name: request.name.clone(),
            email: request.email.clone(),
            date_of_birth: request.date_of_birth.clone(),
            department: request.department,
        });
        self.created.lock().await.push(request.clone());
        Ok(())
    }

    async fn update_employee(&self, request: &UpdateEmployeeRequest) -> Result<(), ClientError> {
        self.mutation_result()?;
        let mut rows = self.rows.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id == request.id) {
            row.name = request.name.clone();
            row.email = request.email.clone();
            row.date_of_birth = request.date_of_birth.clone();
            row.department = request.department;
        }
        self.updated.lock().await.push(request.clone());
        Ok(())
    }

    async fn delete_employee(&self, id: &EmployeeId) -> Result<(), ClientError> {
        self.mutation_result()?;
        self.rows.lock().await.retain(|row| &row.id != id);
        self.deleted.lock().await.push(id.clone());
        Ok(())
    }
}

/// Counts observer callbacks.
#[derive(Default)]
pub(crate) struct RecordingObserver {
    completed: AtomicUsize,
    failures: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub(crate) async fn failures(&self) -> Vec<String> {
        self.failures.lock().await.clone()
    }
}

#[async_trait]
impl MutationObserver for RecordingObserver {
    async fn mutation_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    async fn mutation_failed(&self, message: &str) {
        self.failures.lock().await.push(message.to_string());
    }
}
