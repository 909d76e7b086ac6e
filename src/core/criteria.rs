use crate::core::normalize::{parse_amount, parse_credit_score, parse_time_in_business};
use crate::models::{
    ClientFields, CriterionKind, CriterionResult, LenderGuidelines, MatchOutcome, ScoringWeights,
};

/// Decides whether a criterion has data on both sides of the pair
pub type Applicability = fn(&ClientFields, &LenderGuidelines) -> bool;

/// Compares the two sides; only called when the criterion applies
pub type Evaluator = fn(&ClientFields, &LenderGuidelines) -> Evaluation;

/// Raw pass/fail verdict with its explanation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub passed: bool,
    pub reason: String,
}

/// A weighted scoring dimension
#[derive(Debug, Clone, Copy)]
pub struct Criterion {
    pub kind: CriterionKind,
    pub weight: f64,
    pub applies: Applicability,
    pub evaluate: Evaluator,
}

impl Criterion {
    /// Evaluate this criterion for a pair, or `None` when it does not apply
    pub fn check(
        &self,
        client: &ClientFields,
        guidelines: &LenderGuidelines,
    ) -> Option<CriterionResult> {
        if !(self.applies)(client, guidelines) {
            return None;
        }

        let Evaluation { passed, reason } = (self.evaluate)(client, guidelines);

        Some(CriterionResult {
            criterion: self.kind,
            result: MatchOutcome::from_passed(passed),
            reason,
        })
    }
}

/// The full criteria list, in reporting order
pub fn criteria(weights: &ScoringWeights) -> [Criterion; 6] {
    [
        Criterion {
            kind: CriterionKind::CreditScore,
            weight: weights.credit_score,
            applies: |c, g| present(&c.credit_score) && g.min_credit_score.is_some(),
            evaluate: evaluate_credit_score,
        },
        Criterion {
            kind: CriterionKind::TimeInBusiness,
            weight: weights.time_in_business,
            applies: |c, g| present(&c.time_in_business) && g.min_time_in_business.is_some(),
            evaluate: evaluate_time_in_business,
        },
        Criterion {
            kind: CriterionKind::LoanAmount,
            weight: weights.loan_amount,
            applies: |c, g| {
                present(&c.equipment_cost)
                    && g.min_equipment_cost.is_some()
                    && g.max_equipment_cost.is_some()
            },
            evaluate: evaluate_loan_amount,
        },
        Criterion {
            kind: CriterionKind::EquipmentType,
            weight: weights.equipment_type,
            applies: |c, g| present(&c.equipment_type) && present(&g.equipment_types),
            evaluate: evaluate_equipment_type,
        },
        Criterion {
            kind: CriterionKind::Industry,
            weight: weights.industry,
            applies: |c, g| present(&c.industry) && present(&g.industries_accepted),
            evaluate: evaluate_industry,
        },
        Criterion {
            kind: CriterionKind::WorkingCapitalInterest,
            weight: weights.working_capital,
            applies: |c, _| c.wants_working_capital(),
            evaluate: |_, _| Evaluation {
                passed: true,
                reason: "Client is interested in working capital funding".to_string(),
            },
        },
    ]
}

#[inline]
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[inline]
fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn evaluate_credit_score(client: &ClientFields, guidelines: &LenderGuidelines) -> Evaluation {
    let client_credit = parse_credit_score(text(&client.credit_score));
    let min_credit = guidelines.min_credit_score.unwrap_or_default();

    if client_credit >= min_credit {
        Evaluation {
            passed: true,
            reason: format!(
                "Client's credit score ({}) meets or exceeds lender requirement ({})",
                client_credit, min_credit
            ),
        }
    } else {
        Evaluation {
            passed: false,
            reason: format!(
                "Client's credit score ({}) is below lender requirement ({})",
                client_credit, min_credit
            ),
        }
    }
}

fn evaluate_time_in_business(client: &ClientFields, guidelines: &LenderGuidelines) -> Evaluation {
    let client_months = parse_time_in_business(text(&client.time_in_business));
    let min_months = guidelines.min_time_in_business.unwrap_or_default();

    if client_months >= min_months {
        Evaluation {
            passed: true,
            reason: format!(
                "Client's time in business ({} months) meets or exceeds lender requirement ({} months)",
                client_months, min_months
            ),
        }
    } else {
        Evaluation {
            passed: false,
            reason: format!(
                "Client's time in business ({} months) is below lender requirement ({} months)",
                client_months, min_months
            ),
        }
    }
}

fn evaluate_loan_amount(client: &ClientFields, guidelines: &LenderGuidelines) -> Evaluation {
    let amount = parse_amount(text(&client.equipment_cost));
    let min = guidelines.min_equipment_cost.unwrap_or_default();
    let max = guidelines.max_equipment_cost.unwrap_or_default();
    let passed = min <= amount && amount <= max;

    let verdict = if passed { "is within" } else { "is outside" };
    Evaluation {
        passed,
        reason: format!(
            "Client's equipment cost ({}) {} lender's range ({} - {})",
            format_currency(amount),
            verdict,
            format_currency(min),
            format_currency(max)
        ),
    }
}

fn evaluate_equipment_type(client: &ClientFields, guidelines: &LenderGuidelines) -> Evaluation {
    let equipment = text(&client.equipment_type).to_lowercase();

    if accepts_category(text(&guidelines.equipment_types), &equipment) {
        Evaluation {
            passed: true,
            reason: format!("Client's equipment type ({}) is accepted by this lender", equipment),
        }
    } else {
        Evaluation {
            passed: false,
            reason: format!(
                "Client's equipment type ({}) is not specifically listed in lender's accepted types",
                equipment
            ),
        }
    }
}

fn evaluate_industry(client: &ClientFields, guidelines: &LenderGuidelines) -> Evaluation {
    let industry = text(&client.industry).to_lowercase();

    if accepts_category(text(&guidelines.industries_accepted), &industry) {
        Evaluation {
            passed: true,
            reason: format!("Client's industry ({}) is served by this lender", industry),
        }
    } else {
        Evaluation {
            passed: false,
            reason: format!(
                "Client's industry ({}) is not specifically listed in lender's served industries",
                industry
            ),
        }
    }
}

/// Check a comma-separated lender list against a client value
///
/// A token matches when it occurs anywhere inside the client value, so
/// "auto" accepts "automation". A bare "all" token accepts everything.
/// Both sides are compared case-insensitively; empty tokens are ignored.
pub fn accepts_category(accepted: &str, value: &str) -> bool {
    let value = value.to_lowercase();

    accepted
        .to_lowercase()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .any(|token| token == "all" || value.contains(token))
}

/// Format as dollars with thousands separators, e.g. `$12,345.00`
fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(kind: CriterionKind, client: &ClientFields, guidelines: &LenderGuidelines) -> Option<CriterionResult> {
        criteria(&ScoringWeights::default())
            .iter()
            .find(|c| c.kind == kind)
            .and_then(|c| c.check(client, guidelines))
    }

    #[test]
    fn test_credit_score_meets_minimum() {
        let client = ClientFields {
            credit_score: Some("680".to_string()),
            ..Default::default()
        };
        let guidelines = LenderGuidelines {
            min_credit_score: Some(650),
            ..Default::default()
        };

        let result = check(CriterionKind::CreditScore, &client, &guidelines).unwrap();
        assert_eq!(result.result, MatchOutcome::Match);
        assert!(result.reason.contains("(680)"));
        assert!(result.reason.contains("(650)"));
    }

    #[test]
    fn test_unparsable_credit_fails_closed() {
        let client = ClientFields {
            credit_score: Some("good".to_string()),
            ..Default::default()
        };
        let guidelines = LenderGuidelines {
            min_credit_score: Some(600),
            ..Default::default()
        };

        let result = check(CriterionKind::CreditScore, &client, &guidelines).unwrap();
        assert_eq!(result.result, MatchOutcome::NoMatch);
        assert!(result.reason.contains("is below"));
    }

    #[test]
    fn test_criterion_skipped_without_guideline() {
        let client = ClientFields {
            credit_score: Some("700".to_string()),
            time_in_business: Some("3 years".to_string()),
            ..Default::default()
        };
        let guidelines = LenderGuidelines::default();

        assert!(check(CriterionKind::CreditScore, &client, &guidelines).is_none());
        assert!(check(CriterionKind::TimeInBusiness, &client, &guidelines).is_none());
    }

    #[test]
    fn test_loan_amount_needs_both_bounds() {
        let client = ClientFields {
            equipment_cost: Some("10000".to_string()),
            ..Default::default()
        };
        let only_min = LenderGuidelines {
            min_equipment_cost: Some(5_000.0),
            ..Default::default()
        };
        assert!(check(CriterionKind::LoanAmount, &client, &only_min).is_none());

        let both = LenderGuidelines {
            min_equipment_cost: Some(5_000.0),
            max_equipment_cost: Some(150_000.0),
            ..Default::default()
        };
        let result = check(CriterionKind::LoanAmount, &client, &both).unwrap();
        assert_eq!(result.result, MatchOutcome::Match);
        assert_eq!(
            result.reason,
            "Client's equipment cost ($10,000.00) is within lender's range ($5,000.00 - $150,000.00)"
        );
    }

    #[test]
    fn test_loan_amount_bounds_are_inclusive() {
        let guidelines = LenderGuidelines {
            min_equipment_cost: Some(5_000.0),
            max_equipment_cost: Some(150_000.0),
            ..Default::default()
        };
        for (cost, expected) in [("5000", MatchOutcome::Match), ("150000", MatchOutcome::Match), ("150001", MatchOutcome::NoMatch)] {
            let client = ClientFields {
                equipment_cost: Some(cost.to_string()),
                ..Default::default()
            };
            let result = check(CriterionKind::LoanAmount, &client, &guidelines).unwrap();
            assert_eq!(result.result, expected, "cost {}", cost);
        }
    }

    #[test]
    fn test_equipment_type_not_listed() {
        let client = ClientFields {
            equipment_type: Some("Truck".to_string()),
            ..Default::default()
        };
        let guidelines = LenderGuidelines {
            equipment_types: Some("Construction, Transportation".to_string()),
            ..Default::default()
        };

        let result = check(CriterionKind::EquipmentType, &client, &guidelines).unwrap();
        assert_eq!(result.result, MatchOutcome::NoMatch);
        assert!(result.reason.contains("(truck)"));
    }

    #[test]
    fn test_all_token_accepts_anything() {
        assert!(accepts_category("Construction, All", "Truck"));
        assert!(accepts_category("ALL", "anything at all"));
        assert!(!accepts_category("All equipment types", "Truck"));
    }

    #[test]
    fn test_substring_matching_is_loose() {
        // Tokens match anywhere inside the client value, including inside
        // unrelated words.
        assert!(accepts_category("auto", "Industrial Automation"));
        assert!(accepts_category("Construction", "road construction equipment"));
        assert!(!accepts_category("Road Construction", "construction"));
    }

    #[test]
    fn test_empty_tokens_ignored() {
        // A trailing or doubled comma leaves an empty token; it is skipped
        // rather than treated as matching every value.
        assert!(!accepts_category("Medical, ,", "Truck"));
        assert!(!accepts_category(",", "Truck"));
    }

    #[test]
    fn test_industry_served() {
        let client = ClientFields {
            industry: Some("Commercial Construction".to_string()),
            ..Default::default()
        };
        let guidelines = LenderGuidelines {
            industries_accepted: Some("Construction, Manufacturing".to_string()),
            ..Default::default()
        };

        let result = check(CriterionKind::Industry, &client, &guidelines).unwrap();
        assert_eq!(result.result, MatchOutcome::Match);
        assert_eq!(
            result.reason,
            "Client's industry (commercial construction) is served by this lender"
        );
    }

    #[test]
    fn test_working_capital_only_on_yes() {
        let guidelines = LenderGuidelines::default();
        let mut client = ClientFields {
            interested_in_working_capital: Some("No".to_string()),
            ..Default::default()
        };
        assert!(check(CriterionKind::WorkingCapitalInterest, &client, &guidelines).is_none());

        client.interested_in_working_capital = Some("Yes".to_string());
        let result = check(CriterionKind::WorkingCapitalInterest, &client, &guidelines).unwrap();
        assert_eq!(result.result, MatchOutcome::Match);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(1_000.0), "$1,000.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-2_500.0), "-$2,500.00");
    }
}
