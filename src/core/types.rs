use serde::Serialize;

/// Validated numeric input bundle for one calculation pass. Rates are
/// percentages (5.0 means 5%); the horizon is in whole months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationRequest {
    pub goal: f64,
    pub current: f64,
    pub months: u32,
    pub annual_rate_percent: f64,
    pub total_income: f64,
    pub monthly_expenses: f64,
    pub investing_enabled: bool,
}

impl CalculationRequest {
    /// Rate actually used in computation. Disabling investing forces the
    /// zero-rate path regardless of the nominal rate the user entered.
    pub fn effective_rate_percent(&self) -> f64 {
        if self.investing_enabled {
            self.annual_rate_percent
        } else {
            0.0
        }
    }

    /// Goal, horizon, and income must all be present for a meaningful plan.
    pub fn has_required_inputs(&self) -> bool {
        self.goal > 0.0 && self.months > 0 && self.total_income > 0.0
    }
}

/// Months until the goal is met, or a sentinel when a non-positive
/// contribution can never get there. Serializes as a number or null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TimeToGoal {
    Months(u32),
    Unreachable,
}

impl TimeToGoal {
    pub fn months(self) -> Option<u32> {
        match self {
            TimeToGoal::Months(m) => Some(m),
            TimeToGoal::Unreachable => None,
        }
    }

    pub fn is_unreachable(self) -> bool {
        matches!(self, TimeToGoal::Unreachable)
    }

    /// Whole months saved relative to `self` as the baseline, floored at 0.
    /// An unreachable time on either side yields no quantifiable saving.
    pub fn months_saved(self, alternative: TimeToGoal) -> u32 {
        match (self, alternative) {
            (TimeToGoal::Months(base), TimeToGoal::Months(alt)) => base.saturating_sub(alt),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub remaining: f64,
    pub required_monthly: f64,
    pub available_income: f64,
    pub surplus: f64,
    pub savings_rate_percent: f64,
    pub future_value: f64,
    pub total_contributions: f64,
    pub interest_earned: f64,
    pub months_to_goal: TimeToGoal,
}

impl Plan {
    pub fn zero() -> Self {
        Self {
            remaining: 0.0,
            required_monthly: 0.0,
            available_income: 0.0,
            surplus: 0.0,
            savings_rate_percent: 0.0,
            future_value: 0.0,
            total_contributions: 0.0,
            interest_earned: 0.0,
            months_to_goal: TimeToGoal::Months(0),
        }
    }

    pub fn feasibility(&self, total_income: f64) -> Feasibility {
        if self.surplus < 0.0 {
            Feasibility::NeedsAdjustment
        } else if self.surplus < total_income * 0.1 {
            Feasibility::Tight
        } else {
            Feasibility::Achievable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feasibility {
    NeedsAdjustment,
    Tight,
    Achievable,
}

/// Balance time series for charting. All four sequences have equal length;
/// index 0 is "Now" with both balance series starting at the current savings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedSeries {
    pub labels: Vec<String>,
    pub with_return: Vec<f64>,
    pub without_return: Vec<f64>,
    pub goal_line: Vec<f64>,
}

/// One "what if" lever, derived from the baseline plan by changing exactly
/// one input. Only emitted when the improvement is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Scenario {
    BoostContribution {
        new_monthly: f64,
        derived_months: u32,
        months_saved: u32,
    },
    CutExpenses {
        extra_savings: f64,
        new_monthly: f64,
        derived_months: u32,
        months_saved: u32,
    },
    RoundUp {
        new_monthly: f64,
        derived_months: u32,
        months_saved: u32,
    },
    RaiseReturn {
        new_rate_percent: f64,
        derived_months: u32,
        months_saved: u32,
        years_saved: f64,
    },
    ExtraIncome {
        extra_income: f64,
        new_monthly: f64,
        derived_months: u32,
        months_saved: u32,
        years_saved: f64,
    },
    ExtendHorizon {
        new_months: u32,
        new_monthly: f64,
        monthly_reduction: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TipKind {
    Success,
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub kind: TipKind,
    pub title: String,
    pub text: String,
    pub priority: u8,
}

/// Everything one calculation pass produces, handed to presentation as a
/// read-only snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    pub plan: Plan,
    pub feasibility: Feasibility,
    pub series: ProjectedSeries,
    pub scenarios: Vec<Scenario>,
    pub tips: Vec<Tip>,
}
