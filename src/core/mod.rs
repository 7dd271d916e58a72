mod advice;
mod engine;
mod math;
mod scenarios;
mod types;

pub use advice::generate_tips;
pub use engine::{
    build_series, calculate_plan, period_label, run_plan, SCENARIO_SERIES_CAP_MONTHS,
};
pub use math::{future_value, required_monthly_payment, time_to_goal};
pub use scenarios::generate_scenarios;
pub use types::{
    CalculationRequest, Feasibility, Plan, PlanOutcome, ProjectedSeries, Scenario, TimeToGoal,
    Tip, TipKind,
};
