use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::lending::domain::{
    approved_limit_for, Clock, Customer, CustomerId, Loan, LoanId, LoanRequest, LoanStatus,
    RegisterCustomerRequest,
};
use crate::lending::repository::{
    LendingRepository, MemoryRepository, NewCustomer, NewLoan, RepositoryError,
};
use crate::lending::service::LendingService;

/// Fixed evaluation date used throughout the engine tests.
pub(super) fn today() -> NaiveDate {
    ymd(2025, 6, 15)
}

pub(super) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) struct FixedClock(pub(super) NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub(super) fn customer(monthly_income: f64) -> Customer {
    Customer {
        customer_id: CustomerId(1),
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        age: 34,
        phone_number: "9876543210".to_string(),
        monthly_income,
        approved_limit: approved_limit_for(monthly_income),
        current_debt: 0.0,
    }
}

/// Approved loan at 10% with an explicit repayment position. Installment is
/// zero unless a test overrides it.
pub(super) fn loan(
    loan_id: u64,
    amount: f64,
    tenure: u32,
    emis_paid: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Loan {
    Loan {
        loan_id: LoanId(loan_id),
        customer_id: CustomerId(1),
        amount,
        tenure,
        interest_rate: 10.0,
        monthly_installment: 0.0,
        status: LoanStatus::Approved,
        emis_paid,
        start_date,
        end_date,
    }
}

/// Five fully repaid loans, all started in the current calendar year, with
/// average principal equal to `limit`. Ordered most recent first as the
/// repository would return them.
pub(super) fn saturated_history(limit: f64) -> Vec<Loan> {
    (0..5u32)
        .map(|i| {
            loan(
                5 - u64::from(i),
                limit,
                12,
                12,
                ymd(2025, 1 + i, 5),
                ymd(2025, 1 + i, 25),
            )
        })
        .collect()
}

pub(super) fn register_request() -> RegisterCustomerRequest {
    RegisterCustomerRequest {
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        age: 34,
        monthly_income: 50_000.0,
        phone_number: "9876543210".to_string(),
    }
}

pub(super) fn loan_request(customer_id: CustomerId) -> LoanRequest {
    LoanRequest {
        customer_id,
        loan_amount: 1_000_000.0,
        interest_rate: 10.0,
        tenure: 12,
    }
}

pub(super) fn build_service() -> (
    Arc<LendingService<MemoryRepository>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(LendingService::with_clock(
        repository.clone(),
        Arc::new(FixedClock(today())),
    ));
    (service, repository)
}

/// Persist five fully repaid current-year loans for the customer, saturating
/// every scoring component (85 points).
pub(super) fn seed_repaid_history(repository: &MemoryRepository, customer_id: CustomerId) {
    for month in 0..5u32 {
        repository
            .insert_loan(NewLoan {
                customer_id,
                amount: 1_800_000.0,
                tenure: 12,
                interest_rate: 10.0,
                monthly_installment: 0.0,
                status: LoanStatus::Approved,
                emis_paid: 12,
                start_date: ymd(2025, 1 + month, 5),
                end_date: ymd(2025, 1 + month, 25),
            })
            .expect("seed loan");
    }
}

pub(super) struct UnavailableRepository;

impl LendingRepository for UnavailableRepository {
    fn insert_customer(&self, _customer: NewCustomer) -> Result<Customer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn customer(&self, _id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn loans_for_customer(&self, _id: CustomerId) -> Result<Vec<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn loan(&self, _id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_loan(&self, _loan: NewLoan) -> Result<Loan, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
