use super::types::MonthlyTrace;

/// Replays the month-by-month cash flow implied by a set of spending factors.
///
/// Interest accrues on the previous month's closing balance and is paid on
/// top of goods spending; any spending beyond income is borrowed.
pub fn derive_trace(
    spending_factors: &[f64],
    monthly_income: &[f64],
    initial_debt: f64,
    monthly_interest_rate: f64,
) -> MonthlyTrace {
    let mut trace = MonthlyTrace::with_capacity(monthly_income.len());
    let mut debt = initial_debt;

    for (&factor, &income) in spending_factors.iter().zip(monthly_income) {
        let goods_spending = (1.0 + factor) * income;
        let interest = debt * monthly_interest_rate;
        let new_debt = goods_spending - income + interest;
        debt += new_debt;

        trace.goods_spending.push(goods_spending);
        trace.interest.push(interest);
        trace.debt.push(debt);
        trace.total_spending.push(goods_spending + interest);
    }
    trace
}

pub fn max_abs_gap(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
