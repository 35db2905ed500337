//! Loan eligibility engine and its HTTP/persistence seams.
//!
//! The pipeline is deliberately pure: [`scoring`] and [`eligibility`] are
//! functions of a customer, their loan history, and an injected evaluation
//! date, so every decision is re-computable and testable with in-memory
//! fixtures. [`service`] is the only place that touches the repository, and
//! [`router`] is the only place that knows about HTTP.

pub mod domain;
pub mod eligibility;
pub mod emi;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    approved_limit_for, round_currency, Clock, CreateLoanView, Customer, CustomerId,
    CustomerLoanView, CustomerSummaryView, CustomerView, EligibilityView, Loan, LoanDetailView,
    LoanId, LoanRequest, LoanStatus, RegisterCustomerRequest, SystemClock,
};
pub use eligibility::{evaluate, BandRule, EligibilityOutcome, ScoreBand};
pub use emi::monthly_installment;
pub use repository::{
    LendingRepository, MemoryRepository, NewCustomer, NewLoan, RepositoryError,
};
pub use router::lending_router;
pub use scoring::{credit_score, CreditScore, ScoreComponent, ScoreFactor};
pub use service::{FieldError, LendingService, LendingServiceError};
