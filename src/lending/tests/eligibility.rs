use super::common::*;
use crate::lending::domain::LoanRequest;
use crate::lending::eligibility::{band_for, evaluate, BandRule};
use crate::lending::emi::monthly_installment;

#[test]
fn policy_bands_cover_every_score() {
    for score in 0..=100 {
        // band_for always resolves; the catch-all band has no lower bound.
        let _ = band_for(f64::from(score));
    }
}

#[test]
fn boundary_scores_fall_into_the_lower_band() {
    assert_eq!(band_for(50.0).rule, BandRule::ApproveAboveFloor(12.0));
    assert_eq!(band_for(30.0).rule, BandRule::ApproveAboveFloor(16.0));
    assert_eq!(band_for(10.0).rule, BandRule::RejectOutright(16.0));
    assert_eq!(band_for(50.1).rule, BandRule::ApproveAtRequestedRate);
    assert_eq!(band_for(30.1).rule, BandRule::ApproveAboveFloor(12.0));
    assert_eq!(band_for(10.1).rule, BandRule::ApproveAboveFloor(16.0));
    assert_eq!(band_for(0.0).rule, BandRule::RejectOutright(16.0));
}

#[test]
fn affordability_gate_passes_at_exactly_half_income() {
    let customer = customer(50_000.0);
    let mut running = loan(1, 100_000.0, 24, 0, ymd(2025, 5, 1), ymd(2027, 4, 21));
    running.monthly_installment = 25_000.0;

    let outcome = evaluate(&customer, &[running], &loan_request(customer.customer_id), today());

    // The gate passed; with no past history the policy table rejects at the
    // 16% floor instead of echoing the requested rate.
    assert!(!outcome.approved);
    assert_eq!(outcome.corrected_rate, 16.0);
}

#[test]
fn affordability_gate_rejects_above_half_income() {
    let customer = customer(50_000.0);
    let mut running = loan(1, 100_000.0, 24, 0, ymd(2025, 5, 1), ymd(2027, 4, 21));
    running.monthly_installment = 25_000.01;

    let request = loan_request(customer.customer_id);
    let outcome = evaluate(&customer, &[running], &request, today());

    assert!(!outcome.approved);
    // Gate rejections echo the requested rate and still report the score.
    assert_eq!(outcome.corrected_rate, request.interest_rate);
    assert_eq!(outcome.monthly_installment, 0.0);
    assert!(outcome.score.value >= 0.0);
}

#[test]
fn exposure_gate_rejects_when_limit_would_be_exceeded() {
    let customer = customer(50_000.0);
    let active = loan(1, 1_000_000.0, 24, 0, ymd(2025, 5, 1), ymd(2027, 4, 21));

    let mut request = loan_request(customer.customer_id);
    request.loan_amount = 900_000.0; // 1.0M active + 0.9M > 1.8M limit

    let outcome = evaluate(&customer, &[active], &request, today());

    assert!(!outcome.approved);
    assert_eq!(outcome.corrected_rate, request.interest_rate);
    assert_eq!(outcome.monthly_installment, 0.0);
}

#[test]
fn strong_history_approves_at_the_requested_rate() {
    let customer = customer(50_000.0);
    let loans = saturated_history(customer.approved_limit);
    let request = loan_request(customer.customer_id);

    let outcome = evaluate(&customer, &loans, &request, today());

    assert!(outcome.approved);
    assert_eq!(outcome.corrected_rate, request.interest_rate);
    assert_eq!(
        outcome.monthly_installment,
        monthly_installment(request.loan_amount, request.interest_rate, request.tenure)
    );
    assert!((outcome.score.value - 85.0).abs() < 1e-9);
}

/// Two repaid small loans from last year land the score in the (30, 50] band:
/// 25 on-time + 8 count + 0 activity + ~0 volume.
fn mid_band_history() -> Vec<crate::lending::domain::Loan> {
    vec![
        loan(2, 1_000.0, 12, 12, ymd(2024, 3, 1), ymd(2025, 2, 24)),
        loan(1, 1_000.0, 12, 12, ymd(2024, 1, 1), ymd(2024, 12, 26)),
    ]
}

#[test]
fn mid_band_approves_only_above_the_twelve_percent_floor() {
    let customer = customer(50_000.0);
    let loans = mid_band_history();

    let mut request = LoanRequest {
        customer_id: customer.customer_id,
        loan_amount: 500_000.0,
        interest_rate: 13.0,
        tenure: 12,
    };
    let outcome = evaluate(&customer, &loans, &request, today());
    assert!(outcome.score.value > 30.0 && outcome.score.value <= 50.0);
    assert!(outcome.approved);
    assert_eq!(outcome.corrected_rate, 13.0);

    request.interest_rate = 12.0; // floor itself does not qualify
    let outcome = evaluate(&customer, &loans, &request, today());
    assert!(!outcome.approved);
    assert_eq!(outcome.corrected_rate, 12.0);
    assert_eq!(outcome.monthly_installment, 0.0);
}

#[test]
fn low_band_approves_only_above_the_sixteen_percent_floor() {
    let customer = customer(50_000.0);
    // One repaid loan: 25 on-time + 4 count lands in (10, 30].
    let loans = vec![loan(1, 1_000.0, 12, 12, ymd(2024, 1, 1), ymd(2024, 12, 26))];

    let mut request = LoanRequest {
        customer_id: customer.customer_id,
        loan_amount: 500_000.0,
        interest_rate: 17.0,
        tenure: 12,
    };
    let outcome = evaluate(&customer, &loans, &request, today());
    assert!(outcome.score.value > 10.0 && outcome.score.value <= 30.0);
    assert!(outcome.approved);
    assert_eq!(outcome.corrected_rate, 17.0);

    request.interest_rate = 16.0;
    let outcome = evaluate(&customer, &loans, &request, today());
    assert!(!outcome.approved);
    assert_eq!(outcome.corrected_rate, 16.0);
}

#[test]
fn evaluation_is_deterministic() {
    let customer = customer(50_000.0);
    let loans = saturated_history(customer.approved_limit);
    let request = loan_request(customer.customer_id);

    let first = evaluate(&customer, &loans, &request, today());
    let second = evaluate(&customer, &loans, &request, today());

    assert_eq!(first, second);
}
