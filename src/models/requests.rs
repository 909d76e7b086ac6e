use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::domain::ClientFields;

/// Client intake form submission
///
/// The required fields mirror the intake form; everything else may be
/// omitted and simply disables the matching criterion that reads it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitClientRequest {
    #[validate(length(min = 1, message = "Please provide business name"))]
    #[serde(alias = "business_name", rename = "businessName")]
    pub business_name: String,
    #[validate(length(min = 1, message = "Please provide credit score"))]
    #[serde(alias = "credit_score", rename = "creditScore")]
    pub credit_score: String,
    #[validate(length(min = 1, message = "Please provide time in business"))]
    #[serde(alias = "time_in_business", rename = "timeInBusiness")]
    pub time_in_business: String,
    #[validate(length(min = 1, message = "Please provide equipment type"))]
    #[serde(alias = "equipment_type", rename = "equipmentType")]
    pub equipment_type: String,
    #[validate(length(min = 1, message = "Please provide equipment cost"))]
    #[serde(alias = "equipment_cost", rename = "equipmentCost")]
    pub equipment_cost: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", alias = "monthly_revenue", rename = "monthlyRevenue")]
    pub monthly_revenue: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", alias = "interested_in_wc", rename = "interestedInWorkingCapital")]
    pub interested_in_working_capital: Option<String>,
    #[validate(email)]
    #[serde(default, deserialize_with = "blank_as_none", alias = "contact_email", rename = "contactEmail")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", alias = "contact_phone", rename = "contactPhone")]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

/// Treat an empty or whitespace-only optional field as missing
///
/// The intake form posts unanswered optional fields as `""`, which must not
/// reach validators such as the email check.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

impl SubmitClientRequest {
    /// Convert into engine input; blank optional values become `None`.
    pub fn into_fields(self) -> ClientFields {
        ClientFields {
            business_name: Some(self.business_name),
            industry: self.industry,
            time_in_business: Some(self.time_in_business),
            monthly_revenue: self.monthly_revenue,
            equipment_type: Some(self.equipment_type),
            equipment_cost: Some(self.equipment_cost),
            credit_score: Some(self.credit_score),
            interested_in_working_capital: self.interested_in_working_capital,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            notes: self.notes,
        }
        .normalized()
    }

    /// Names of required fields that are blank after trimming
    pub fn blank_required_fields(&self) -> Vec<&'static str> {
        [
            ("business name", &self.business_name),
            ("credit score", &self.credit_score),
            ("time in business", &self.time_in_business),
            ("equipment type", &self.equipment_type),
            ("equipment cost", &self.equipment_cost),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitClientRequest {
        serde_json::from_value(serde_json::json!({
            "businessName": "Acme Paving",
            "creditScore": "650-700",
            "timeInBusiness": "2 years",
            "equipmentType": "Paver",
            "equipmentCost": "$45,000",
            "industry": "Construction"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_request_passes_validation() {
        let req = request();
        assert!(req.validate().is_ok());
        assert!(req.blank_required_fields().is_empty());
    }

    #[test]
    fn test_empty_required_field_fails_validation() {
        let mut req = request();
        req.credit_score = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_whitespace_required_field_is_reported() {
        let mut req = request();
        req.equipment_type = "  ".to_string();
        assert_eq!(req.blank_required_fields(), vec!["equipment type"]);
    }

    #[test]
    fn test_invalid_email_fails_validation() {
        let mut req = request();
        req.contact_email = Some("not-an-email".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_optional_fields_pass_validation() {
        let req: SubmitClientRequest = serde_json::from_value(serde_json::json!({
            "businessName": "Acme Paving",
            "creditScore": "650-700",
            "timeInBusiness": "2 years",
            "equipmentType": "Paver",
            "equipmentCost": "$45,000",
            "contactEmail": "",
            "contactPhone": "",
            "industry": "   ",
            "notes": null
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert!(req.contact_email.is_none());
        assert!(req.contact_phone.is_none());
        assert!(req.industry.is_none());
        assert!(req.notes.is_none());
    }

    #[test]
    fn test_snake_case_aliases_accepted() {
        let req: SubmitClientRequest = serde_json::from_value(serde_json::json!({
            "business_name": "Acme",
            "credit_score": "700+",
            "time_in_business": "18 months",
            "equipment_type": "Truck",
            "equipment_cost": "10000",
            "interested_in_wc": "Yes"
        }))
        .unwrap();

        let fields = req.into_fields();
        assert!(fields.wants_working_capital());
        assert_eq!(fields.time_in_business.as_deref(), Some("18 months"));
    }
}
