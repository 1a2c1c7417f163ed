//! Employee API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use crate::view::EmployeeRow;
use crate::AppState;

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Имя не может быть пустым.".to_string()));
    }
    Ok(())
}

/// GET /api/employees - The filtered, ordered list with display fields.
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<EmployeeRow>> {
    let today = chrono::Local::now().date_naive();
    let rows = state
        .store
        .view()
        .await
        .into_iter()
        .map(|employee| EmployeeRow::new(employee, today))
        .collect();

    success(rows)
}

/// GET /api/employees/:id - Get a single employee.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Employee> {
    match state.store.get(id).await {
        Some(employee) => success(employee),
        None => Err(AppError::NotFound(format!("Employee {} not found", id))),
    }
}

/// POST /api/employees - Create a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> ApiResult<Employee> {
    validate_name(&request.name)?;

    let employee = state
        .store
        .create(|id| request.into_employee(id))
        .await?;

    tracing::info!(id = employee.id, "Employee created");
    success(employee)
}

/// PUT /api/employees/:id - Replace an employee.
///
/// Responds with `null` data when no employee has this id.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> ApiResult<Option<Employee>> {
    validate_name(&request.name)?;

    let employee = request.into_employee(id);
    if state.store.update(employee.clone()).await? {
        tracing::info!(id, "Employee updated");
        success(Some(employee))
    } else {
        success(None)
    }
}
