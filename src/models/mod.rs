// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Client, ClientFields, CriterionKind, CriterionResult, Lender, LenderGuidelines, LenderMatch,
    MatchOutcome, ScoringWeights, StoredMatch,
};
pub use requests::SubmitClientRequest;
pub use responses::{
    ClientMatchesResponse, ErrorResponse, HealthResponse, LenderDetailsResponse,
    SubmitClientResponse,
};
