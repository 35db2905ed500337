//! Loan eligibility and issuance service.
//!
//! The core of the crate is [`lending`]: a deterministic pipeline that scores
//! a customer's repayment history, applies a tiered rate policy, checks
//! affordability and exposure limits, and derives the monthly installment for
//! an approved loan. Everything else is thin HTTP marshalling and an injected
//! storage seam.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
