use super::types::TimeToGoal;

/// Nominal annual percentage converted to a monthly fractional rate.
pub(crate) fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Ordinary-annuity future value: the principal compounds monthly and the
/// contribution lands at the end of each period. A zero rate degrades to a
/// plain sum.
pub fn future_value(
    principal: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    months: u32,
) -> f64 {
    if annual_rate_percent == 0.0 {
        return principal + monthly_contribution * months as f64;
    }

    let rate = monthly_rate(annual_rate_percent);
    let growth = (1.0 + rate).powi(months as i32);
    principal * growth + monthly_contribution * ((growth - 1.0) / rate)
}

/// Solves the future-value equation for the contribution that lands exactly
/// on the goal after `months` periods. Never negative; 0 when there is
/// nothing left to save or no time to save it in.
pub fn required_monthly_payment(
    current: f64,
    goal: f64,
    months: u32,
    annual_rate_percent: f64,
) -> f64 {
    let remaining = (goal - current).max(0.0);
    if months == 0 || remaining <= 0.0 {
        return 0.0;
    }

    if annual_rate_percent == 0.0 {
        return remaining / months as f64;
    }

    let rate = monthly_rate(annual_rate_percent);
    let growth = (1.0 + rate).powi(months as i32);
    let annuity_factor = (growth - 1.0) / rate;
    ((goal - current * growth) / annuity_factor).max(0.0)
}

/// Whole months (ceiled) until contributions cover the gap to the goal,
/// via the logarithmic inverse of the annuity formula.
pub fn time_to_goal(
    current: f64,
    goal: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
) -> TimeToGoal {
    if current >= goal {
        return TimeToGoal::Months(0);
    }
    if monthly_contribution <= 0.0 {
        return TimeToGoal::Unreachable;
    }

    let remaining = goal - current;
    if annual_rate_percent == 0.0 {
        return TimeToGoal::Months((remaining / monthly_contribution).ceil() as u32);
    }

    let rate = monthly_rate(annual_rate_percent);
    let ratio = remaining * rate / monthly_contribution;
    // With a negative rate the log argument can leave its domain: decay
    // outpaces the contribution and the goal is never met.
    if 1.0 + ratio <= 0.0 || 1.0 + rate <= 0.0 {
        return TimeToGoal::Unreachable;
    }

    let months = (1.0 + ratio).ln() / (1.0 + rate).ln();
    if !months.is_finite() || months < 0.0 {
        return TimeToGoal::Unreachable;
    }
    TimeToGoal::Months(months.ceil() as u32)
}
