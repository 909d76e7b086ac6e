use crate::core::criteria::Criterion;
use crate::models::{ClientFields, CriterionResult, LenderGuidelines};

/// Weighted tally for one (client, lender) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scorecard {
    /// Sum of weights of passing criteria
    pub total_score: f64,
    /// Sum of weights of applicable criteria
    pub max_possible_score: f64,
    pub details: Vec<CriterionResult>,
}

impl Scorecard {
    /// Percentage of the applicable weight that passed
    ///
    /// `None` when nothing applied; such a pair has no score at all
    /// rather than a score of zero.
    pub fn percentage(&self) -> Option<f64> {
        if self.max_possible_score <= 0.0 {
            return None;
        }

        Some((self.total_score / self.max_possible_score * 100.0).clamp(0.0, 100.0))
    }
}

/// Run every applicable criterion for a pair and tally the weights
pub fn score_pair(
    client: &ClientFields,
    guidelines: &LenderGuidelines,
    criteria: &[Criterion],
) -> Scorecard {
    let mut card = Scorecard::default();

    for criterion in criteria {
        let Some(result) = criterion.check(client, guidelines) else {
            continue;
        };

        card.max_possible_score += criterion.weight;
        if result.result.is_match() {
            card.total_score += criterion.weight;
        }
        card.details.push(result);
    }

    card
}

/// Calculate a match percentage (0-100) and its itemized reasons
///
/// Returns `None` when no criterion applies to the pair.
pub fn calculate_match_score(
    client: &ClientFields,
    guidelines: &LenderGuidelines,
    criteria: &[Criterion],
) -> Option<(f64, Vec<CriterionResult>)> {
    let card = score_pair(client, guidelines, criteria);
    let score = card.percentage()?;
    Some((score, card.details))
}
