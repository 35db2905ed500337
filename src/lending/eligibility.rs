//! Eligibility evaluator: affordability and exposure gates followed by the
//! tiered score-to-rate policy table.

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Customer, Loan, LoanRequest, LoanStatus};
use super::emi;
use super::scoring::{self, CreditScore};

/// Fraction of monthly income that existing installments may consume before
/// a new loan is declined. The comparison is strict; exactly half passes.
const AFFORDABILITY_CAP: f64 = 0.5;

/// Action taken for a score band once the hard gates have passed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BandRule {
    /// Approve at the rate the customer asked for.
    ApproveAtRequestedRate,
    /// Approve only when the requested rate clears the floor; otherwise
    /// decline and report the floor as the rate that would have qualified.
    ApproveAboveFloor(f64),
    /// Decline regardless of the requested rate, reporting the given rate.
    RejectOutright(f64),
}

/// One row of the policy table: applies to scores strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBand {
    pub above: f64,
    pub rule: BandRule,
}

/// Policy table evaluated top-down; the first matching band wins. Bands are
/// contiguous and exhaustive, so exactly one row applies to any score, with
/// 50, 30, and 10 falling into the lower band.
pub(crate) const POLICY_BANDS: [ScoreBand; 4] = [
    ScoreBand {
        above: 50.0,
        rule: BandRule::ApproveAtRequestedRate,
    },
    ScoreBand {
        above: 30.0,
        rule: BandRule::ApproveAboveFloor(12.0),
    },
    ScoreBand {
        above: 10.0,
        rule: BandRule::ApproveAboveFloor(16.0),
    },
    ScoreBand {
        above: f64::NEG_INFINITY,
        rule: BandRule::RejectOutright(16.0),
    },
];

pub(crate) fn band_for(score: f64) -> &'static ScoreBand {
    POLICY_BANDS
        .iter()
        .find(|band| score > band.above)
        .unwrap_or(&POLICY_BANDS[POLICY_BANDS.len() - 1])
}

/// Evaluation result, produced fresh on every call and never persisted. The
/// installment is unrounded; the rejected case reports the rate at which the
/// same applicant could requalify.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityOutcome {
    pub approved: bool,
    pub requested_rate: f64,
    pub corrected_rate: f64,
    pub tenure: u32,
    pub monthly_installment: f64,
    pub score: CreditScore,
}

/// Run the full decision pipeline for one request.
///
/// `loans` is the customer's complete loan history, most recently created
/// first, exactly as the repository returns it. Each gate is hard: the first
/// failure decides the outcome, with the score always reported.
pub fn evaluate(
    customer: &Customer,
    loans: &[Loan],
    request: &LoanRequest,
    today: NaiveDate,
) -> EligibilityOutcome {
    let score = scoring::credit_score(customer, loans, today);

    let declined = |corrected_rate: f64, score: CreditScore| EligibilityOutcome {
        approved: false,
        requested_rate: request.interest_rate,
        corrected_rate,
        tenure: request.tenure,
        monthly_installment: 0.0,
        score,
    };

    // Affordability gate: installments still running this month, any status.
    let installment_load: f64 = loans
        .iter()
        .filter(|loan| loan.end_date >= today)
        .map(|loan| loan.monthly_installment)
        .sum();
    if installment_load > customer.monthly_income * AFFORDABILITY_CAP {
        return declined(request.interest_rate, score);
    }

    // Exposure gate: the new principal on top of active approved loans must
    // stay within the approved limit.
    let active_principal: f64 = loans
        .iter()
        .filter(|loan| loan.status == LoanStatus::Approved && loan.end_date >= today)
        .map(|loan| loan.amount)
        .sum();
    if active_principal + request.loan_amount > customer.approved_limit {
        return declined(request.interest_rate, score);
    }

    let (approved, corrected_rate) = match band_for(score.value).rule {
        BandRule::ApproveAtRequestedRate => (true, request.interest_rate),
        BandRule::ApproveAboveFloor(floor) => {
            if request.interest_rate > floor {
                (true, request.interest_rate)
            } else {
                (false, floor)
            }
        }
        BandRule::RejectOutright(rate) => (false, rate),
    };

    let monthly_installment = if approved {
        emi::monthly_installment(request.loan_amount, corrected_rate, request.tenure)
    } else {
        0.0
    };

    EligibilityOutcome {
        approved,
        requested_rate: request.interest_rate,
        corrected_rate,
        tenure: request.tenure,
        monthly_installment,
        score,
    }
}
