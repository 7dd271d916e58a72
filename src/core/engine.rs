use super::advice::generate_tips;
use super::math::{self, future_value, required_monthly_payment, time_to_goal};
use super::scenarios::generate_scenarios;
use super::types::{CalculationRequest, Plan, PlanOutcome, ProjectedSeries};

/// Display cap for scenario comparison series. Purely a rendering bound;
/// the time-to-goal math is never truncated by it.
pub const SCENARIO_SERIES_CAP_MONTHS: u32 = 120;

/// Axis label for one period: "Now", then months up to a year, then years
/// with a month remainder.
pub fn period_label(period: u32) -> String {
    if period == 0 {
        return "Now".to_string();
    }
    if period <= 12 {
        return format!("{period}m");
    }
    let years = period / 12;
    let remainder = period % 12;
    if remainder == 0 {
        format!("{years}y")
    } else {
        format!("{years}y{remainder}m")
    }
}

/// Builds the full charting series for a plan: compounding balance, simple
/// savings without return, and a flat goal line, one point per period plus
/// the starting point.
pub fn build_series(
    current: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    months: u32,
    goal: f64,
) -> ProjectedSeries {
    let rate = math::monthly_rate(annual_rate_percent);
    let len = months as usize + 1;

    let mut labels = Vec::with_capacity(len);
    let mut with_return = Vec::with_capacity(len);
    let mut without_return = Vec::with_capacity(len);

    let mut balance = current;
    labels.push(period_label(0));
    with_return.push(balance);
    without_return.push(current);

    for period in 1..=months {
        balance = balance * (1.0 + rate) + monthly_contribution;
        labels.push(period_label(period));
        with_return.push(balance);
        without_return.push(current + monthly_contribution * period as f64);
    }

    ProjectedSeries {
        labels,
        with_return,
        without_return,
        goal_line: vec![goal; len],
    }
}

/// Derives the baseline plan from a request. Missing goal, horizon, or
/// income yields the neutral all-zero plan rather than an error.
pub fn calculate_plan(request: &CalculationRequest) -> Plan {
    if !request.has_required_inputs() {
        return Plan::zero();
    }

    let rate = request.effective_rate_percent();
    let remaining = (request.goal - request.current).max(0.0);

    let required_monthly = if request.investing_enabled && rate > 0.0 {
        required_monthly_payment(request.current, request.goal, request.months, rate)
    } else {
        remaining / request.months as f64
    };

    let available_income = request.total_income - request.monthly_expenses;
    let surplus = available_income - required_monthly;
    let savings_rate_percent = required_monthly / request.total_income * 100.0;

    let future_value = future_value(request.current, required_monthly, rate, request.months);
    let total_contributions = required_monthly * request.months as f64;
    let interest_earned = (future_value - request.current - total_contributions).max(0.0);

    Plan {
        remaining,
        required_monthly,
        available_income,
        surplus,
        savings_rate_percent,
        future_value,
        total_contributions,
        interest_earned,
        months_to_goal: time_to_goal(request.current, request.goal, required_monthly, rate),
    }
}

/// One full calculation pass: baseline plan, projection series, what-if
/// scenarios, and advice. Pure; recomputes everything on every call.
pub fn run_plan(request: &CalculationRequest) -> PlanOutcome {
    let plan = calculate_plan(request);
    let feasibility = plan.feasibility(request.total_income);

    if !request.has_required_inputs() {
        return PlanOutcome {
            plan,
            feasibility,
            series: ProjectedSeries {
                labels: vec![period_label(0)],
                with_return: vec![request.current],
                without_return: vec![request.current],
                goal_line: vec![request.goal.max(0.0)],
            },
            scenarios: Vec::new(),
            tips: Vec::new(),
        };
    }

    let series = build_series(
        request.current,
        plan.required_monthly,
        request.effective_rate_percent(),
        request.months,
        request.goal,
    );
    let scenarios = generate_scenarios(&plan, request);
    let tips = generate_tips(&plan, request);

    PlanOutcome {
        plan,
        feasibility,
        series,
        scenarios,
        tips,
    }
}
