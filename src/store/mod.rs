//! Employee store.
//!
//! The single source of truth for the directory: the canonical list, the
//! remote-seed status, and the filter and sort state the derived view is
//! built from. It is the only writer of persisted state.

use std::collections::HashSet;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::db::EmployeeStorage;
use crate::errors::{AppError, DEFAULT_FETCH_ERROR};
use crate::models::{Employee, EmployeeFilters, SortCriteria, SortState};
use crate::seed::SeedLoader;
use crate::view;

/// Snapshot of everything the client reads from the store.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeState {
    pub list: Vec<Employee>,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: EmployeeFilters,
    #[serde(flatten)]
    pub sort: SortState,
    #[serde(skip)]
    pending_fetches: usize,
}

pub struct EmployeeStore {
    state: RwLock<EmployeeState>,
    storage: EmployeeStorage,
    seed: SeedLoader,
}

impl EmployeeStore {
    /// Create a store seeded from durable storage.
    pub async fn load(storage: EmployeeStorage, seed: SeedLoader) -> Result<Self, AppError> {
        let list = storage.load().await?;
        tracing::info!(count = list.len(), "Loaded employees from storage");

        Ok(Self {
            state: RwLock::new(EmployeeState {
                list,
                ..EmployeeState::default()
            }),
            storage,
            seed,
        })
    }

    pub async fn snapshot(&self) -> EmployeeState {
        self.state.read().await.clone()
    }

    /// Filtered and ordered projection of the canonical list.
    pub async fn view(&self) -> Vec<Employee> {
        let state = self.state.read().await;
        view::build_view(&state.list, &state.filters, &state.sort)
    }

    pub async fn get(&self, id: i64) -> Option<Employee> {
        let state = self.state.read().await;
        state.list.iter().find(|e| e.id == id).cloned()
    }

    /// Append a record and persist the list. The caller supplies the id.
    pub async fn add(&self, employee: Employee) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        let mut next = state.list.clone();
        next.push(employee);
        self.storage.save(&next).await?;

        tracing::debug!(count = next.len(), "Added employee");
        state.list = next;
        Ok(())
    }

    /// Assign a fresh id, build the record from it and append it.
    ///
    /// Choosing the id and appending happen under one write lock, so
    /// concurrent creates never share an id.
    pub async fn create<F>(&self, build: F) -> Result<Employee, AppError>
    where
        F: FnOnce(i64) -> Employee,
    {
        let mut state = self.state.write().await;

        let employee = build(next_id(&state.list));
        let mut next = state.list.clone();
        next.push(employee.clone());
        self.storage.save(&next).await?;

        tracing::debug!(id = employee.id, count = next.len(), "Created employee");
        state.list = next;
        Ok(employee)
    }

    /// Replace the first record with the same id and persist the list.
    ///
    /// Returns `false` and changes nothing when no record has that id.
    pub async fn update(&self, employee: Employee) -> Result<bool, AppError> {
        let mut state = self.state.write().await;

        let Some(index) = state.list.iter().position(|e| e.id == employee.id) else {
            tracing::debug!(id = employee.id, "Update ignored, no such employee");
            return Ok(false);
        };

        let mut next = state.list.clone();
        next[index] = employee;
        self.storage.save(&next).await?;

        tracing::debug!(id = next[index].id, "Updated employee");
        state.list = next;
        Ok(true)
    }

    /// Replace the filter state wholesale.
    pub async fn set_filters(&self, filters: EmployeeFilters) -> EmployeeFilters {
        let mut state = self.state.write().await;
        state.filters = filters;
        state.filters.clone()
    }

    /// Select `criteria`, flipping the direction when it is already selected.
    pub async fn sort_by(&self, criteria: SortCriteria) -> SortState {
        let mut state = self.state.write().await;
        if state.sort.sort_criteria == Some(criteria) {
            state.sort.sort_direction = state.sort.sort_direction.flipped();
        } else {
            state.sort = SortState {
                sort_criteria: Some(criteria),
                ..SortState::default()
            };
        }
        state.sort
    }

    /// Fetch the remote seed and append records whose id is not yet known.
    ///
    /// Failures are recorded in `error` rather than returned. The lock is not
    /// held while the request is in flight, and `loading` stays set until
    /// every overlapping fetch has finished.
    pub async fn fetch_remote(&self) {
        {
            let mut state = self.state.write().await;
            state.pending_fetches += 1;
            state.loading = true;
            state.error = None;
        }

        let result = self.seed.fetch().await;

        let mut state = self.state.write().await;
        state.pending_fetches -= 1;
        state.loading = state.pending_fetches > 0;

        let remote = match result {
            Ok(remote) => remote,
            Err(err) => {
                let message = match err {
                    AppError::Fetch(msg) if !msg.is_empty() => msg,
                    AppError::Fetch(_) => DEFAULT_FETCH_ERROR.to_string(),
                    other => other.message(),
                };
                tracing::warn!(url = %self.seed.url(), "Remote seed failed: {}", message);
                state.error = Some(message);
                return;
            }
        };

        let mut known: HashSet<i64> = state.list.iter().map(|e| e.id).collect();
        let fresh: Vec<Employee> = remote
            .into_iter()
            .filter(|e| known.insert(e.id))
            .collect();

        if fresh.is_empty() {
            return;
        }

        let mut next = state.list.clone();
        next.extend(fresh);
        if let Err(err) = self.storage.save(&next).await {
            state.error = Some(err.message());
            return;
        }

        tracing::info!(added = next.len() - state.list.len(), "Merged remote seed");
        state.list = next;
    }
}

/// The current timestamp in milliseconds, moved past the largest existing id
/// when the clock has not advanced.
fn next_id(list: &[Employee]) -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    match list.iter().map(|e| e.id).max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}

#[cfg(test)]
mod tests;
