//! Authoritative list state: query parameters, current page of rows and
//! the fetches that keep them in sync with the server.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{DepartmentTable, EmployeeId, EmployeeRecord},
    protocol::EmployeeListResponse,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

use crate::{
    debounce::{SearchDebouncer, DEFAULT_SEARCH_DEBOUNCE},
    error::ClientError,
    query::{ListQuery, SortField, DEFAULT_PAGE_SIZE},
    transport::EmployeeApi,
    MutationObserver,
};

#[derive(Debug, Clone)]
pub struct ListConfig {
    pub page_size: u32,
    pub search_debounce: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Loaded { seq: u64, total_count: u64 },
    FetchFailed { seq: u64, message: String },
    StaleResponseDiscarded { seq: u64, applied_seq: u64 },
    MutationFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { seq: u64 },
    /// An older response arrived after a newer one had been applied.
    Stale { seq: u64 },
    /// An identical request was already in flight.
    Coalesced,
    Failed { seq: u64, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    Coalesce,
    Force,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub rows: Vec<EmployeeRecord>,
    pub total_count: u64,
    pub query: ListQuery,
    pub loading: bool,
}

impl ListSnapshot {
    pub fn page_count(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.query.page_size.max(1)))
    }

    pub fn has_previous_page(&self) -> bool {
        self.query.page_index > 0
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.query.page_index) + 1 < self.page_count()
    }

    /// Pagination footer in the form `11–20 of 42`.
    pub fn range_label(&self) -> String {
        let size = u64::from(self.query.page_size.max(1));
        let from = u64::from(self.query.page_index) * size;
        let to = (from + size).min(self.total_count);
        if self.total_count == 0 || from >= self.total_count {
            return format!("0–0 of {}", self.total_count);
        }
        format!("{}–{} of {}", from + 1, to, self.total_count)
    }
}

struct ListState {
    query: ListQuery,
    rows: Vec<EmployeeRecord>,
    total_count: u64,
    next_seq: u64,
    applied_seq: u64,
    in_flight: Vec<(u64, ListQuery)>,
}

pub struct ListController {
    api: Arc<dyn EmployeeApi>,
    departments: Arc<DepartmentTable>,
    state: Mutex<ListState>,
    search: SearchDebouncer,
    events: broadcast::Sender<ListEvent>,
}

impl ListController {
    /// Must be called inside a tokio runtime: settled search values are
    /// consumed by a background task.
    pub fn new(
        api: Arc<dyn EmployeeApi>,
        departments: Arc<DepartmentTable>,
        config: ListConfig,
    ) -> Arc<Self> {
        let (search, mut settled) = SearchDebouncer::new(config.search_debounce);
        let (events, _) = broadcast::channel(256);
        let controller = Arc::new(Self {
            api,
            departments,
            state: Mutex::new(ListState {
                query: ListQuery::with_page_size(config.page_size),
                rows: Vec::new(),
                total_count: 0,
                next_seq: 0,
                applied_seq: 0,
                in_flight: Vec::new(),
            }),
            search,
            events,
        });

        let weak = Arc::downgrade(&controller);
        tokio::spawn(async move {
            while let Some(key) = settled.recv().await {
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                controller.search_settled(&key).await;
            }
        });

        controller
    }

    pub fn departments(&self) -> &Arc<DepartmentTable> {
        &self.departments
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.state.lock().await;
        ListSnapshot {
            rows: state.rows.clone(),
            total_count: state.total_count,
            query: state.query.clone(),
            loading: !state.in_flight.is_empty(),
        }
    }

    pub async fn find_row(&self, id: &EmployeeId) -> Option<EmployeeRecord> {
        let state = self.state.lock().await;
        state.rows.iter().find(|row| &row.id == id).cloned()
    }

    pub async fn load(&self) -> FetchOutcome {
        self.update_and_fetch(|_| {}, FetchMode::Coalesce).await
    }

    pub async fn set_sort(&self, field: SortField) -> FetchOutcome {
        self.update_and_fetch(|query| query.toggle_sort(field), FetchMode::Coalesce)
            .await
    }

    pub async fn set_page(&self, index: u32) -> FetchOutcome {
        self.update_and_fetch(|query| query.page_index = index, FetchMode::Coalesce)
            .await
    }

    pub async fn set_page_size(&self, size: u32) -> FetchOutcome {
        self.update_and_fetch(|query| query.set_page_size(size), FetchMode::Coalesce)
            .await
    }

    /// Replaces every parameter at once, e.g. when restoring a saved view.
    pub async fn set_query(&self, query: ListQuery) -> FetchOutcome {
        self.update_and_fetch(move |current| *current = query, FetchMode::Coalesce)
            .await
    }

    /// Records raw search input. The fetch happens once the input settles.
    pub async fn set_search(&self, key: &str) {
        self.state.lock().await.query.set_search_key(key);
        self.search.push(key);
    }

    /// Fetches with a settled search key and otherwise unchanged parameters.
    pub async fn search_settled(&self, key: &str) -> FetchOutcome {
        self.update_and_fetch(|query| query.set_search_key(key), FetchMode::Coalesce)
            .await
    }

    /// Re-issues the current query. Never coalesced: callers use it to pick
    /// up server changes made after any in-flight request was sent.
    pub async fn refresh(&self) -> FetchOutcome {
        self.update_and_fetch(|_| {}, FetchMode::Force).await
    }

    async fn update_and_fetch<F>(&self, update: F, mode: FetchMode) -> FetchOutcome
    where
        F: FnOnce(&mut ListQuery),
    {
        let (seq, query) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            update(&mut state.query);
            // Only the newest issued fetch may absorb a duplicate; joining an
            // older one would let a later response overwrite the visible query.
            if mode == FetchMode::Coalesce
                && state
                    .in_flight
                    .iter()
                    .any(|(pending_seq, pending)| {
                        *pending_seq == state.next_seq && *pending == state.query
                    })
            {
                debug!(query = ?state.query, "identical employee fetch already in flight");
                return FetchOutcome::Coalesced;
            }
            state.next_seq += 1;
            let seq = state.next_seq;
            state.in_flight.push((seq, state.query.clone()));
            (seq, state.query.clone())
        };
        self.search
            .record_sent(query.search_key.as_deref().unwrap_or_default());

        info!(seq, params = ?query.to_params(), "fetching employee page");
        let result = match self.api.list_employees(&query).await {
            Ok(response) => self.reconcile(response),
            Err(err) => Err(err),
        };

        let mut state = self.state.lock().await;
        state.in_flight.retain(|(pending, _)| *pending != seq);
        match result {
            Ok((rows, total_count)) => {
                if seq < state.applied_seq {
                    debug!(
                        seq,
                        applied_seq = state.applied_seq,
                        "discarding stale employee page"
                    );
                    let _ = self.events.send(ListEvent::StaleResponseDiscarded {
                        seq,
                        applied_seq: state.applied_seq,
                    });
                    return FetchOutcome::Stale { seq };
                }
                state.applied_seq = seq;
                state.rows = rows;
                state.total_count = total_count;
                let _ = self.events.send(ListEvent::Loaded { seq, total_count });
                FetchOutcome::Applied { seq }
            }
            Err(err) => {
                let message = err.to_string();
                error!(seq, error = %message, "employee list fetch failed");
                let _ = self.events.send(ListEvent::FetchFailed {
                    seq,
                    message: message.clone(),
                });
                FetchOutcome::Failed { seq, message }
            }
        }
    }

    fn reconcile(
        &self,
        response: EmployeeListResponse,
    ) -> Result<(Vec<EmployeeRecord>, u64), ClientError> {
        let rows = response
            .result
            .into_iter()
            .map(|wire| wire.into_record(&self.departments))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((rows, response.count))
    }
}

#[async_trait]
impl MutationObserver for ListController {
    async fn mutation_completed(&self) {
        self.refresh().await;
    }

    async fn mutation_failed(&self, message: &str) {
        let _ = self.events.send(ListEvent::MutationFailed {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
