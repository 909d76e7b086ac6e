//! Lender Match - weighted rule-based matching of equipment-financing clients
//!
//! This library scores a client's business profile against each lender's
//! guidelines, explains every criterion it checked, and keeps one ranked
//! result set per client in the data store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchingEngine, Submission, rank_lenders, parse_credit_score, parse_time_in_business, parse_amount};
pub use models::{ClientFields, Lender, LenderGuidelines, LenderMatch, CriterionResult, ScoringWeights};
pub use services::{LenderStore, StoreError, InMemoryStore, PostgresClient};
