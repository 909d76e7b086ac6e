use serde::{Deserialize, Serialize};
use crate::models::domain::{Lender, LenderGuidelines, LenderMatch, StoredMatch};

/// Response for the client submission endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClientResponse {
    pub client_id: i64,
    pub matches: Vec<LenderMatch>,
    /// False when scoring succeeded but the result set could not be stored
    pub saved: bool,
}

/// Persisted matches for a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMatchesResponse {
    pub client_id: i64,
    pub matches: Vec<StoredMatch>,
    pub count: usize,
}

/// Lender with its guidelines (if any)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderDetailsResponse {
    pub lender: Lender,
    pub guidelines: Option<LenderGuidelines>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
