use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Customer, CustomerId, Loan, LoanId, LoanStatus};

/// Customer fields at registration time; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub phone_number: String,
    pub monthly_income: f64,
    pub approved_limit: f64,
}

/// Loan fields at issuance time; the store assigns the identifier.
///
/// Issuance always writes `emis_paid: 0`; the field exists so bulk-loaded
/// historical records can carry their repayment progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub customer_id: CustomerId,
    pub amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub status: LoanStatus,
    pub emis_paid: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Storage abstraction so the scorer and evaluator can be exercised with
/// in-memory fixtures.
///
/// Implementations must serialize the read-decide-write sequence of a single
/// evaluate-and-issue operation; the engine itself holds no state and cannot
/// prevent two racing approvals against a stale snapshot.
pub trait LendingRepository: Send + Sync {
    /// Fails with [`RepositoryError::DuplicatePhoneNumber`] when the phone
    /// number is already registered.
    fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, RepositoryError>;
    fn customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
    /// All loans for the customer, ordered by creation time, most recent
    /// first. The scorer's reference-loan selection depends on this ordering.
    fn loans_for_customer(&self, id: CustomerId) -> Result<Vec<Loan>, RepositoryError>;
    fn loan(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError>;
    fn insert_loan(&self, loan: NewLoan) -> Result<Loan, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("phone number already registered")]
    DuplicatePhoneNumber,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Default)]
struct MemoryState {
    customers: BTreeMap<u64, Customer>,
    loans: BTreeMap<u64, Loan>,
    next_customer_id: u64,
    next_loan_id: u64,
}

/// Mutex-guarded in-memory store backing the server binary and the tests.
/// The single lock gives each operation the per-write isolation the trait
/// demands.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<MemoryState>,
}

impl LendingRepository for MemoryRepository {
    fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut state = self.inner.lock().expect("repository mutex poisoned");
        if state
            .customers
            .values()
            .any(|existing| existing.phone_number == customer.phone_number)
        {
            return Err(RepositoryError::DuplicatePhoneNumber);
        }

        state.next_customer_id += 1;
        let record = Customer {
            customer_id: CustomerId(state.next_customer_id),
            first_name: customer.first_name,
            last_name: customer.last_name,
            age: customer.age,
            phone_number: customer.phone_number,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            current_debt: 0.0,
        };
        state.customers.insert(record.customer_id.0, record.clone());
        Ok(record)
    }

    fn customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let state = self.inner.lock().expect("repository mutex poisoned");
        Ok(state.customers.get(&id.0).cloned())
    }

    fn loans_for_customer(&self, id: CustomerId) -> Result<Vec<Loan>, RepositoryError> {
        let state = self.inner.lock().expect("repository mutex poisoned");
        // Ids are assigned monotonically, so descending id order is
        // most-recently-created-first.
        Ok(state
            .loans
            .values()
            .rev()
            .filter(|loan| loan.customer_id == id)
            .cloned()
            .collect())
    }

    fn loan(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        let state = self.inner.lock().expect("repository mutex poisoned");
        Ok(state.loans.get(&id.0).cloned())
    }

    fn insert_loan(&self, loan: NewLoan) -> Result<Loan, RepositoryError> {
        let mut state = self.inner.lock().expect("repository mutex poisoned");
        state.next_loan_id += 1;
        let record = Loan {
            loan_id: LoanId(state.next_loan_id),
            customer_id: loan.customer_id,
            amount: loan.amount,
            tenure: loan.tenure,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_installment,
            status: loan.status,
            emis_paid: loan.emis_paid,
            start_date: loan.start_date,
            end_date: loan.end_date,
        };
        state.loans.insert(record.loan_id.0, record.clone());
        Ok(record)
    }
}
