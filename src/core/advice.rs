use super::types::{CalculationRequest, Plan, Tip, TipKind};

const MAX_TIPS: usize = 7;
const EMERGENCY_FUND_MONTHS: f64 = 6.0;

fn tip(kind: TipKind, title: &str, text: String, priority: u8) -> Tip {
    Tip {
        kind,
        title: title.to_string(),
        text,
        priority,
    }
}

/// Whole-unit amount with thousands separators for tip text.
fn format_amount(value: f64) -> String {
    let rounded = value.round().abs() as u64;
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < -0.5 {
        format!("-{out}")
    } else {
        out
    }
}

/// Heuristic advice derived from the plan: a fixed rule table scored by
/// priority, sorted descending, truncated to the display maximum. Ties keep
/// rule order.
pub fn generate_tips(plan: &Plan, request: &CalculationRequest) -> Vec<Tip> {
    let mut tips = Vec::new();
    let rate = request.effective_rate_percent();
    let savings_rate = plan.savings_rate_percent;
    let surplus = plan.surplus;

    if savings_rate > 50.0 {
        tips.push(tip(
            TipKind::Warning,
            "High Savings Rate",
            "Your savings rate is very high (>50%). While admirable, ensure this is sustainable long-term and doesn't compromise your quality of life.".to_string(),
            8,
        ));
    } else if savings_rate > 30.0 {
        tips.push(tip(
            TipKind::Success,
            "Excellent Savings Rate",
            "Your savings rate is excellent! You're on track for strong financial security.".to_string(),
            5,
        ));
    } else if savings_rate < 10.0 {
        tips.push(tip(
            TipKind::Warning,
            "Low Savings Rate",
            "Consider increasing your savings rate to at least 10-20% for better financial health and emergency preparedness.".to_string(),
            9,
        ));
    }

    if surplus < 0.0 {
        tips.push(tip(
            TipKind::Danger,
            "Budget Deficit",
            "Your goal requires more than your available income. Consider extending your timeframe, reducing the goal amount, or increasing income.".to_string(),
            10,
        ));
    } else if surplus < 5_000.0 {
        tips.push(tip(
            TipKind::Warning,
            "Tight Budget",
            "You'll have limited funds for emergencies. Consider building an emergency buffer or extending your savings timeline.".to_string(),
            7,
        ));
    } else if surplus > request.total_income * 0.3 {
        tips.push(tip(
            TipKind::Info,
            "Room for Growth",
            "You have significant surplus income. Consider increasing your goal or diversifying into additional investments.".to_string(),
            4,
        ));
    }

    if rate < 2.0 {
        tips.push(tip(
            TipKind::Info,
            "Conservative Returns",
            "Your expected return is quite conservative. Consider diversifying into higher-yield options like index funds or ETFs for potentially better returns.".to_string(),
            6,
        ));
    } else if rate > 8.0 {
        tips.push(tip(
            TipKind::Warning,
            "High Return Expectations",
            "An 8%+ return carries significant risk. Ensure you're comfortable with potential volatility and consider diversification.".to_string(),
            7,
        ));
    } else if (4.0..=7.0).contains(&rate) {
        tips.push(tip(
            TipKind::Success,
            "Balanced Return",
            "Your return expectations are realistic for a diversified portfolio. Consider index funds or balanced mutual funds.".to_string(),
            3,
        ));
    }

    if request.months > 60 {
        tips.push(tip(
            TipKind::Info,
            "Long-term Goal",
            "Long-term goals benefit significantly from compound growth. Stay consistent with contributions and consider automatic investing.".to_string(),
            5,
        ));
    } else if request.months < 12 {
        tips.push(tip(
            TipKind::Warning,
            "Aggressive Timeline",
            "Your timeline is very aggressive. Consider if this is realistic or if extending the timeframe might reduce financial stress.".to_string(),
            8,
        ));
    }

    let emergency_target = request.monthly_expenses * EMERGENCY_FUND_MONTHS;
    if request.current < emergency_target {
        tips.push(tip(
            TipKind::Info,
            "Emergency Fund",
            format!(
                "Consider building an emergency fund of {} (6 months of expenses) before pursuing this goal.",
                format_amount(emergency_target)
            ),
            6,
        ));
    }

    tips.push(tip(
        TipKind::Info,
        "Automate Your Savings",
        "Set up automatic transfers to your savings account right after payday to ensure consistent progress toward your goal.".to_string(),
        3,
    ));

    tips.push(tip(
        TipKind::Info,
        "Regular Reviews",
        "Review and adjust your plan quarterly. Life changes, and your financial plan should adapt accordingly.".to_string(),
        2,
    ));

    let progress = request.current / request.goal * 100.0;
    if progress > 75.0 {
        tips.push(tip(
            TipKind::Success,
            "Almost There!",
            "You're in the final stretch! Consider what your next financial goal will be after achieving this one.".to_string(),
            4,
        ));
    } else if progress > 50.0 {
        tips.push(tip(
            TipKind::Success,
            "Great Progress",
            "You're over halfway to your goal! Keep up the momentum and stay focused on your target.".to_string(),
            4,
        ));
    }

    if plan.required_monthly > 5_000.0 {
        tips.push(tip(
            TipKind::Info,
            "Tax Optimization",
            "With significant monthly savings, consider tax-advantaged accounts for better after-tax returns.".to_string(),
            5,
        ));
    }

    if request.goal > 500_000.0 {
        tips.push(tip(
            TipKind::Info,
            "Diversification",
            "For large goals, consider diversifying across different asset classes: stocks, bonds, real estate, and international markets.".to_string(),
            4,
        ));
    }

    if surplus < plan.required_monthly * 0.2 {
        tips.push(tip(
            TipKind::Info,
            "Additional Income",
            "Consider side income opportunities: freelancing, part-time work, or passive income streams to accelerate your progress.".to_string(),
            6,
        ));
    }

    tips.sort_by(|a, b| b.priority.cmp(&a.priority));
    tips.truncate(MAX_TIPS);
    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::calculate_plan;

    fn request() -> CalculationRequest {
        CalculationRequest {
            goal: 300_000.0,
            current: 50_000.0,
            months: 48,
            annual_rate_percent: 5.0,
            total_income: 40_000.0,
            monthly_expenses: 15_000.0,
            investing_enabled: true,
        }
    }

    #[test]
    fn amounts_are_grouped_by_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(90_000.0), "90,000");
        assert_eq!(format_amount(1_234_567.4), "1,234,567");
    }

    #[test]
    fn tips_are_capped_and_sorted_by_priority() {
        let request = request();
        let plan = calculate_plan(&request);
        let tips = generate_tips(&plan, &request);

        assert!(!tips.is_empty());
        assert!(tips.len() <= 7);
        for pair in tips.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }

    #[test]
    fn a_deficit_plan_leads_with_the_deficit_warning() {
        let mut request = request();
        request.goal = 2_000_000.0;
        request.months = 24;
        let plan = calculate_plan(&request);
        assert!(plan.surplus < 0.0);

        let tips = generate_tips(&plan, &request);
        assert_eq!(tips[0].title, "Budget Deficit");
        assert_eq!(tips[0].kind, TipKind::Danger);
        assert_eq!(tips[0].priority, 10);
    }

    #[test]
    fn emergency_fund_tip_names_the_six_month_target() {
        let mut request = request();
        request.current = 10_000.0;
        let plan = calculate_plan(&request);
        let tips = generate_tips(&plan, &request);

        let emergency = tips
            .iter()
            .find(|t| t.title == "Emergency Fund")
            .expect("low current savings must trigger the emergency fund tip");
        assert!(emergency.text.contains("90,000"));
    }

    #[test]
    fn disabled_investing_is_advised_as_a_conservative_return() {
        let mut request = request();
        request.investing_enabled = false;
        let plan = calculate_plan(&request);
        let tips = generate_tips(&plan, &request);

        assert!(tips.iter().any(|t| t.title == "Conservative Returns"));
        assert!(tips.iter().all(|t| t.title != "Balanced Return"));
    }
}
