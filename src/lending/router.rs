use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{CustomerId, LoanId, LoanRequest, RegisterCustomerRequest};
use super::repository::LendingRepository;
use super::service::{LendingService, LendingServiceError};

/// Router builder exposing the lending API.
pub fn lending_router<R>(service: Arc<LendingService<R>>) -> Router
where
    R: LendingRepository + 'static,
{
    Router::new()
        .route("/api/v1/register", post(register_handler::<R>))
        .route(
            "/api/v1/check-eligibility",
            post(check_eligibility_handler::<R>),
        )
        .route("/api/v1/create-loan", post(create_loan_handler::<R>))
        .route("/api/v1/loans/:loan_id", get(loan_handler::<R>))
        .route(
            "/api/v1/customers/:customer_id/loans",
            get(customer_loans_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    Json(request): Json<RegisterCustomerRequest>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.register_customer(request) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn check_eligibility_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    Json(request): Json<LoanRequest>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.check_eligibility(request) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_loan_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    Json(request): Json<LoanRequest>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.create_loan(request) {
        // A declined request is still a successful evaluation.
        Ok(view) if view.loan_approved => (StatusCode::CREATED, Json(view)).into_response(),
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn loan_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    Path(loan_id): Path<u64>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.loan(LoanId(loan_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn customer_loans_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    Path(customer_id): Path<u64>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.loans_by_customer(CustomerId(customer_id)) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: LendingServiceError) -> Response {
    match error {
        LendingServiceError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": errors })),
        )
            .into_response(),
        LendingServiceError::CustomerNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Customer not found" })),
        )
            .into_response(),
        LendingServiceError::LoanNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Loan not found" })),
        )
            .into_response(),
        LendingServiceError::Repository(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}
