//! Amortization calculator.

/// Monthly installment for an amortizing loan.
///
/// `EMI = P * r(1+r)^n / ((1+r)^n - 1)` with `r` the per-month rate derived
/// from the annual percentage. A zero rate degenerates to straight-line
/// division. Tenure is contractually at least 1 upstream; a zero tenure still
/// returns 0 rather than dividing by it. The result is unrounded; currency
/// rounding happens at the persistence/response boundary.
pub fn monthly_installment(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> f64 {
    if tenure_months == 0 {
        return 0.0;
    }

    let periods = f64::from(tenure_months);
    if annual_rate_percent == 0.0 {
        return principal / periods;
    }

    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let growth = (1.0 + monthly_rate).powf(periods);
    let denominator = growth - 1.0;
    if denominator == 0.0 {
        // Unreachable for non-negative rates, guarded anyway.
        return principal / periods;
    }

    principal * monthly_rate * growth / denominator
}
