use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for persisted loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(pub u64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered customer as the storage collaborator hands it to the engine.
///
/// `approved_limit` is derived once at registration and never mutated by the
/// engine afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub phone_number: String,
    pub monthly_income: f64,
    pub approved_limit: f64,
    pub current_debt: f64,
}

impl Customer {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Credit limit granted at registration: 36 months of income, rounded to the
/// nearest lakh (100 000 currency units).
pub fn approved_limit_for(monthly_income: f64) -> f64 {
    const LAKH: f64 = 100_000.0;
    ((monthly_income * 36.0) / LAKH).round() * LAKH
}

/// Round a currency amount to 2 decimal places. Applied once, at the boundary
/// where a value is persisted or returned to a caller; engine internals stay
/// unrounded.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Approved,
    Rejected,
    Pending,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Pending => "pending",
        }
    }
}

/// A persisted loan record. Principal, rate, and tenure are immutable once
/// issued; only `emis_paid` advances over the loan's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub amount: f64,
    /// Tenure in whole months.
    pub tenure: u32,
    /// Annual interest rate in percent.
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub status: LoanStatus,
    pub emis_paid: u32,
    pub start_date: NaiveDate,
    /// Date the final installment is due.
    pub end_date: NaiveDate,
}

impl Loan {
    pub fn repayments_left(&self) -> u32 {
        self.tenure.saturating_sub(self.emis_paid)
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Approved && self.repayments_left() > 0
    }
}

/// Evaluation-date capability. Injected rather than read from ambient system
/// time so scoring and gate tests are deterministic.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Registration payload accepted over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub monthly_income: f64,
    pub phone_number: String,
}

/// Shared payload for eligibility checks and loan creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
}

/// Registration response view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerView {
    pub customer_id: CustomerId,
    pub name: String,
    pub age: u32,
    pub monthly_income: f64,
    pub approved_limit: f64,
    pub phone_number: String,
}

impl CustomerView {
    pub(crate) fn from_customer(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            name: customer.name(),
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            phone_number: customer.phone_number.clone(),
        }
    }
}

/// Eligibility-check response view. Installment is rounded here, once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityView {
    pub customer_id: CustomerId,
    pub approval: bool,
    pub interest_rate: f64,
    pub corrected_interest_rate: f64,
    pub tenure: u32,
    pub monthly_installment: f64,
}

/// Loan-creation response view. `loan_id` is null when the request was
/// declined; rejection is a business outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLoanView {
    pub loan_id: Option<LoanId>,
    pub customer_id: CustomerId,
    pub loan_approved: bool,
    pub message: String,
    pub monthly_installment: f64,
}

/// Customer fields embedded in a loan detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummaryView {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: u32,
}

/// Single-loan projection with its owning customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDetailView {
    pub loan_id: LoanId,
    pub customer: CustomerSummaryView,
    pub loan_amount: f64,
    pub is_loan_approved: bool,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub tenure: u32,
}

impl LoanDetailView {
    pub(crate) fn from_parts(loan: &Loan, customer: &Customer) -> Self {
        Self {
            loan_id: loan.loan_id,
            customer: CustomerSummaryView {
                id: customer.customer_id,
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                phone_number: customer.phone_number.clone(),
                age: customer.age,
            },
            loan_amount: loan.amount,
            is_loan_approved: loan.status == LoanStatus::Approved,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_installment,
            tenure: loan.tenure,
        }
    }
}

/// Per-loan projection in a customer's loan listing, including the derived
/// repayments-left counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerLoanView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub is_loan_approved: bool,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub tenure: u32,
    pub emis_paid: u32,
    pub repayments_left: u32,
}

impl CustomerLoanView {
    pub(crate) fn from_loan(loan: &Loan) -> Self {
        Self {
            loan_id: loan.loan_id,
            loan_amount: loan.amount,
            is_loan_approved: loan.status == LoanStatus::Approved,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_installment,
            tenure: loan.tenure,
            emis_paid: loan.emis_paid,
            repayments_left: loan.repayments_left(),
        }
    }
}
