// Core algorithm exports
pub mod criteria;
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use criteria::{accepts_category, criteria, Criterion, Evaluation};
pub use matcher::{rank_lenders, MatchingEngine, Submission};
pub use normalize::{parse_amount, parse_credit_score, parse_time_in_business};
pub use scoring::{calculate_match_score, score_pair, Scorecard};
