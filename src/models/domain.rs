use serde::{Deserialize, Serialize};

/// Client attributes as submitted on the intake form
///
/// Every field is optional at this level; a criterion only runs when the
/// field it reads is present. Credit score, time in business and amounts
/// are kept as free text and normalized lazily by the evaluators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFields {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub time_in_business: Option<String>,
    #[serde(default)]
    pub monthly_revenue: Option<String>,
    #[serde(default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub equipment_cost: Option<String>,
    #[serde(default)]
    pub credit_score: Option<String>,
    #[serde(default)]
    pub interested_in_working_capital: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClientFields {
    /// Drop empty and whitespace-only values so absence is represented
    /// uniformly as `None`.
    pub fn normalized(self) -> Self {
        Self {
            business_name: non_blank(self.business_name),
            industry: non_blank(self.industry),
            time_in_business: non_blank(self.time_in_business),
            monthly_revenue: non_blank(self.monthly_revenue),
            equipment_type: non_blank(self.equipment_type),
            equipment_cost: non_blank(self.equipment_cost),
            credit_score: non_blank(self.credit_score),
            interested_in_working_capital: non_blank(self.interested_in_working_capital),
            contact_email: non_blank(self.contact_email),
            contact_phone: non_blank(self.contact_phone),
            notes: non_blank(self.notes),
        }
    }

    /// True only for an explicit "Yes" opt-in
    pub fn wants_working_capital(&self) -> bool {
        self.interested_in_working_capital.as_deref() == Some("Yes")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A persisted client record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_id: i64,
    #[serde(flatten)]
    pub fields: ClientFields,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A financing provider on the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lender {
    pub lender_id: i64,
    pub name: String,
    pub program_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool { true }

/// Lender guidelines, one-to-one with a lender
///
/// `None` on a scored field means the lender does not screen on it.
/// The trailing text fields are informational and never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderGuidelines {
    pub lender_id: i64,
    #[serde(default)]
    pub min_credit_score: Option<i32>,
    /// Months
    #[serde(default)]
    pub min_time_in_business: Option<i32>,
    #[serde(default)]
    pub min_monthly_revenue: Option<f64>,
    #[serde(default)]
    pub min_equipment_cost: Option<f64>,
    #[serde(default)]
    pub max_equipment_cost: Option<f64>,
    /// Comma-separated
    #[serde(default)]
    pub equipment_types: Option<String>,
    /// Comma-separated
    #[serde(default)]
    pub industries_accepted: Option<String>,
    #[serde(default)]
    pub industries_restricted: Option<String>,
    #[serde(default)]
    pub funding_speed: Option<String>,
    #[serde(default)]
    pub rate_range: Option<String>,
    #[serde(default)]
    pub term_range: Option<String>,
    #[serde(default)]
    pub advance_rate: Option<String>,
}

/// Scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    CreditScore,
    TimeInBusiness,
    LoanAmount,
    EquipmentType,
    Industry,
    WorkingCapitalInterest,
}

impl CriterionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionKind::CreditScore => "credit_score",
            CriterionKind::TimeInBusiness => "time_in_business",
            CriterionKind::LoanAmount => "loan_amount",
            CriterionKind::EquipmentType => "equipment_type",
            CriterionKind::Industry => "industry",
            CriterionKind::WorkingCapitalInterest => "working_capital_interest",
        }
    }
}

impl std::fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Match,
    #[serde(rename = "No Match")]
    NoMatch,
}

impl MatchOutcome {
    pub fn from_passed(passed: bool) -> Self {
        if passed { MatchOutcome::Match } else { MatchOutcome::NoMatch }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Match)
    }
}

/// One itemized line of a match explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: CriterionKind,
    pub result: MatchOutcome,
    pub reason: String,
}

/// Scored (client, lender) pairing produced by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderMatch {
    pub lender_id: i64,
    pub lender_name: String,
    pub description: Option<String>,
    /// Percentage in [0, 100]
    pub match_score: f64,
    pub match_details: Vec<CriterionResult>,
}

/// A match row as read back from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMatch {
    pub client_id: i64,
    pub lender_id: i64,
    pub match_score: f64,
    pub match_details: Vec<CriterionResult>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Per-criterion weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub credit_score: f64,
    pub time_in_business: f64,
    pub loan_amount: f64,
    pub equipment_type: f64,
    pub industry: f64,
    pub working_capital: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            credit_score: 25.0,
            time_in_business: 25.0,
            loan_amount: 25.0,
            equipment_type: 15.0,
            industry: 10.0,
            working_capital: 15.0,
        }
    }
}
