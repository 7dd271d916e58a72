use super::math::{required_monthly_payment, time_to_goal};
use super::types::{CalculationRequest, Plan, Scenario, TimeToGoal};

const BOOST_FACTOR: f64 = 1.10;
const EXPENSE_CUT_SHARE: f64 = 0.10;
const RAISE_RETURN_THRESHOLD_PERCENT: f64 = 3.0;
const RAISE_RETURN_RATE_PERCENT: f64 = 4.0;
const SIDE_INCOME_MONTHLY: f64 = 250.0;
const HORIZON_EXTENSION_MONTHS: u32 = 12;

/// Round the contribution up to the next "round" amount; the step widens
/// with the contribution size.
fn round_up_amount(monthly: f64) -> f64 {
    let step = if monthly < 100.0 {
        25.0
    } else if monthly < 500.0 {
        50.0
    } else if monthly < 1_000.0 {
        100.0
    } else {
        250.0
    };
    (monthly / step).ceil() * step
}

fn years_saved(months_saved: u32) -> f64 {
    (months_saved as f64 / 12.0 * 10.0).round() / 10.0
}

/// Time-to-goal for an alternative contribution, reported as (derived
/// months, months saved) only when the saving is strictly positive.
fn months_improvement(
    baseline: TimeToGoal,
    request: &CalculationRequest,
    new_monthly: f64,
    annual_rate_percent: f64,
) -> Option<(u32, u32)> {
    let alternative = time_to_goal(
        request.current,
        request.goal,
        new_monthly,
        annual_rate_percent,
    );
    let saved = baseline.months_saved(alternative);
    if saved == 0 {
        return None;
    }
    alternative.months().map(|derived| (derived, saved))
}

/// Derives the what-if scenarios from the baseline plan. Each lever changes
/// exactly one input and is evaluated against the unmodified baseline;
/// levers whose improvement is not strictly positive are dropped. Output
/// order is the fixed lever order, never re-ranked.
pub fn generate_scenarios(plan: &Plan, request: &CalculationRequest) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    let rate = request.effective_rate_percent();
    let baseline = plan.months_to_goal;
    let monthly = plan.required_monthly;

    // 1. Save 10% more.
    let boosted = monthly * BOOST_FACTOR;
    if let Some((derived_months, months_saved)) =
        months_improvement(baseline, request, boosted, rate)
    {
        scenarios.push(Scenario::BoostContribution {
            new_monthly: boosted,
            derived_months,
            months_saved,
        });
    }

    // 2. Cut expenses by 10% and redirect the difference.
    let extra_savings = request.monthly_expenses * EXPENSE_CUT_SHARE;
    if let Some((derived_months, months_saved)) =
        months_improvement(baseline, request, monthly + extra_savings, rate)
    {
        scenarios.push(Scenario::CutExpenses {
            extra_savings,
            new_monthly: monthly + extra_savings,
            derived_months,
            months_saved,
        });
    }

    // 3. Round the contribution up to a round number.
    let rounded = round_up_amount(monthly);
    if rounded > monthly {
        if let Some((derived_months, months_saved)) =
            months_improvement(baseline, request, rounded, rate)
        {
            scenarios.push(Scenario::RoundUp {
                new_monthly: rounded,
                derived_months,
                months_saved,
            });
        }
    }

    // 4. Invest instead of holding cash. The comparison is deliberately
    // cash-vs-invested: baseline time at 0%, alternative at the fixed rate.
    if rate < RAISE_RETURN_THRESHOLD_PERCENT {
        let cash_baseline = time_to_goal(request.current, request.goal, monthly, 0.0);
        if let Some((derived_months, months_saved)) =
            months_improvement(cash_baseline, request, monthly, RAISE_RETURN_RATE_PERCENT)
        {
            scenarios.push(Scenario::RaiseReturn {
                new_rate_percent: RAISE_RETURN_RATE_PERCENT,
                derived_months,
                months_saved,
                years_saved: years_saved(months_saved),
            });
        }
    }

    // 5. Fixed side income on top of the contribution.
    if let Some((derived_months, months_saved)) =
        months_improvement(baseline, request, monthly + SIDE_INCOME_MONTHLY, rate)
    {
        scenarios.push(Scenario::ExtraIncome {
            extra_income: SIDE_INCOME_MONTHLY,
            new_monthly: monthly + SIDE_INCOME_MONTHLY,
            derived_months,
            months_saved,
            years_saved: years_saved(months_saved),
        });
    }

    // 6. Extend the horizon by a year; the improvement here is a lower
    // payment, not a shorter timeline.
    let new_months = request.months + HORIZON_EXTENSION_MONTHS;
    let new_monthly = required_monthly_payment(request.current, request.goal, new_months, rate);
    let monthly_reduction = monthly - new_monthly;
    if monthly_reduction > 0.0 {
        scenarios.push(Scenario::ExtendHorizon {
            new_months,
            new_monthly,
            monthly_reduction,
        });
    }

    scenarios
}
