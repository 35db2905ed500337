use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::info;

use super::domain::{
    approved_limit_for, round_currency, Clock, CreateLoanView, CustomerId, CustomerLoanView,
    CustomerView, EligibilityView, LoanDetailView, LoanId, LoanRequest, LoanStatus,
    RegisterCustomerRequest, SystemClock,
};
use super::eligibility;
use super::repository::{LendingRepository, NewCustomer, NewLoan, RepositoryError};

const REJECTION_MESSAGE: &str =
    "Loan cannot be approved based on credit score and financial criteria.";
const APPROVAL_MESSAGE: &str = "Loan approved successfully";

/// Service composing the repository, the clock, and the decision pipeline.
/// Each operation is a pure function of the records it reads plus the request
/// parameters; nothing is cached between calls.
pub struct LendingService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LendingService<R>
where
    R: LendingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Register a customer, deriving the approved credit limit from income.
    pub fn register_customer(
        &self,
        request: RegisterCustomerRequest,
    ) -> Result<CustomerView, LendingServiceError> {
        validate_registration(&request)?;

        let approved_limit = approved_limit_for(request.monthly_income);
        let customer = self
            .repository
            .insert_customer(NewCustomer {
                first_name: request.first_name,
                last_name: request.last_name,
                age: request.age,
                phone_number: request.phone_number,
                monthly_income: request.monthly_income,
                approved_limit,
            })
            .map_err(|err| match err {
                RepositoryError::DuplicatePhoneNumber => LendingServiceError::Validation(vec![
                    FieldError::new("phone_number", "phone number already registered"),
                ]),
                other => LendingServiceError::Repository(other),
            })?;

        info!(
            customer_id = customer.customer_id.0,
            approved_limit, "customer registered"
        );
        Ok(CustomerView::from_customer(&customer))
    }

    /// Run the eligibility pipeline without persisting anything. Calling this
    /// twice with identical inputs and no intervening writes yields identical
    /// output.
    pub fn check_eligibility(
        &self,
        request: LoanRequest,
    ) -> Result<EligibilityView, LendingServiceError> {
        validate_loan_request(&request)?;
        let outcome = self.evaluate(&request)?;

        Ok(EligibilityView {
            customer_id: request.customer_id,
            approval: outcome.approved,
            interest_rate: outcome.requested_rate,
            corrected_interest_rate: outcome.corrected_rate,
            tenure: outcome.tenure,
            monthly_installment: round_currency(outcome.monthly_installment),
        })
    }

    /// Evaluate and, when approved, persist the loan. Issuance trusts the
    /// evaluation from this same call; it never re-derives the score or
    /// re-runs the gates.
    pub fn create_loan(&self, request: LoanRequest) -> Result<CreateLoanView, LendingServiceError> {
        validate_loan_request(&request)?;
        let outcome = self.evaluate(&request)?;

        if !outcome.approved {
            info!(
                customer_id = request.customer_id.0,
                score = outcome.score.value,
                "loan request declined"
            );
            return Ok(CreateLoanView {
                loan_id: None,
                customer_id: request.customer_id,
                loan_approved: false,
                message: REJECTION_MESSAGE.to_string(),
                monthly_installment: 0.0,
            });
        }

        let start_date = self.clock.today();
        // Fixed 30-day periods, not calendar-month arithmetic.
        let end_date = start_date
            .checked_add_signed(Duration::days(30 * i64::from(request.tenure)))
            .ok_or_else(|| {
                LendingServiceError::Validation(vec![FieldError::new(
                    "tenure",
                    "tenure is out of range",
                )])
            })?;

        let monthly_installment = round_currency(outcome.monthly_installment);
        let loan = self.repository.insert_loan(NewLoan {
            customer_id: request.customer_id,
            amount: request.loan_amount,
            tenure: request.tenure,
            interest_rate: outcome.corrected_rate,
            monthly_installment,
            status: LoanStatus::Approved,
            emis_paid: 0,
            start_date,
            end_date,
        })?;

        info!(
            loan_id = loan.loan_id.0,
            customer_id = request.customer_id.0,
            score = outcome.score.value,
            corrected_rate = outcome.corrected_rate,
            "loan approved"
        );
        Ok(CreateLoanView {
            loan_id: Some(loan.loan_id),
            customer_id: request.customer_id,
            loan_approved: true,
            message: APPROVAL_MESSAGE.to_string(),
            monthly_installment,
        })
    }

    /// Loan detail with its owning customer.
    pub fn loan(&self, id: LoanId) -> Result<LoanDetailView, LendingServiceError> {
        let loan = self
            .repository
            .loan(id)?
            .ok_or(LendingServiceError::LoanNotFound(id))?;
        let customer = self
            .repository
            .customer(loan.customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(loan.customer_id))?;
        Ok(LoanDetailView::from_parts(&loan, &customer))
    }

    /// All loans for a customer, most recent first.
    pub fn loans_by_customer(
        &self,
        id: CustomerId,
    ) -> Result<Vec<CustomerLoanView>, LendingServiceError> {
        self.repository
            .customer(id)?
            .ok_or(LendingServiceError::CustomerNotFound(id))?;
        let loans = self.repository.loans_for_customer(id)?;
        Ok(loans.iter().map(CustomerLoanView::from_loan).collect())
    }

    fn evaluate(
        &self,
        request: &LoanRequest,
    ) -> Result<eligibility::EligibilityOutcome, LendingServiceError> {
        let customer = self
            .repository
            .customer(request.customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(request.customer_id))?;
        let loans = self.repository.loans_for_customer(request.customer_id)?;
        Ok(eligibility::evaluate(
            &customer,
            &loans,
            request,
            self.clock.today(),
        ))
    }
}

/// Single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Error raised by the lending service.
#[derive(Debug, thiserror::Error)]
pub enum LendingServiceError {
    #[error("invalid request")]
    Validation(Vec<FieldError>),
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("loan {0} not found")]
    LoanNotFound(LoanId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn validate_registration(request: &RegisterCustomerRequest) -> Result<(), LendingServiceError> {
    let mut errors = Vec::new();
    if request.first_name.trim().is_empty() {
        errors.push(FieldError::new("first_name", "first name must not be blank"));
    }
    if request.last_name.trim().is_empty() {
        errors.push(FieldError::new("last_name", "last name must not be blank"));
    }
    if request.age < 18 {
        errors.push(FieldError::new("age", "age must be at least 18"));
    }
    if request.monthly_income < 0.0 || request.monthly_income.is_nan() {
        errors.push(FieldError::new(
            "monthly_income",
            "monthly income must not be negative",
        ));
    }
    if request.phone_number.trim().is_empty() {
        errors.push(FieldError::new(
            "phone_number",
            "phone number must not be blank",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(LendingServiceError::Validation(errors))
    }
}

fn validate_loan_request(request: &LoanRequest) -> Result<(), LendingServiceError> {
    let mut errors = Vec::new();
    if request.loan_amount < 0.0 || request.loan_amount.is_nan() {
        errors.push(FieldError::new(
            "loan_amount",
            "loan amount must not be negative",
        ));
    }
    if request.interest_rate < 0.0 || request.interest_rate.is_nan() {
        errors.push(FieldError::new(
            "interest_rate",
            "interest rate must not be negative",
        ));
    }
    if request.tenure < 1 {
        errors.push(FieldError::new("tenure", "tenure must be at least 1 month"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(LendingServiceError::Validation(errors))
    }
}
