//! Store state, filter, sort and seed endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{EmployeeFilters, SortRequest, SortState};
use crate::store::EmployeeState;
use crate::AppState;

/// GET /api/state - Canonical list plus loading, error, filter and sort state.
pub async fn get_state(State(state): State<AppState>) -> ApiResult<EmployeeState> {
    success(state.store.snapshot().await)
}

/// PUT /api/filters - Replace the filter state.
pub async fn set_filters(
    State(state): State<AppState>,
    Json(filters): Json<EmployeeFilters>,
) -> ApiResult<EmployeeFilters> {
    if let Some(month) = filters.birthday_month {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "Birthday month must be between 1 and 12, got {}",
                month
            )));
        }
    }

    success(state.store.set_filters(filters).await)
}

/// POST /api/sort - Select or toggle the sort criteria.
pub async fn sort_employees(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> ApiResult<SortState> {
    success(state.store.sort_by(request.criteria).await)
}

/// POST /api/fetch - Merge the remote seed into the list.
pub async fn fetch_employees(State(state): State<AppState>) -> ApiResult<EmployeeState> {
    state.store.fetch_remote().await;
    success(state.store.snapshot().await)
}
