//! # Proposal DTOs
//!
//! Items arrive loosely typed (`amount` may be a number or a numeric string)
//! and are sanitized before storage: descriptions are trimmed, and items with
//! an empty description or a non-positive amount are dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::store::{Proposal, ProposalForCreate, ProposalItem};

use super::company::CompanyInfo;

/// One item as submitted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposalItemInput {
    pub description: Value,
    pub amount: Value,
}

impl ProposalItemInput {
    /// Coerce into a stored item, or `None` if the item is not usable.
    pub fn sanitize(&self) -> Option<ProposalItem> {
        let description = match &self.description {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        };
        let amount = match &self.amount {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };

        if description.is_empty() || !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        Some(ProposalItem { description, amount })
    }
}

/// Proposal creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProposalRequest {
    pub title: String,
    pub client_name: String,
    pub client_email: String,
    pub client_company: String,
    pub items: Vec<ProposalItemInput>,
}

/// Why a proposal request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalRejection {
    /// Title, client name or items missing.
    MissingFields,
    /// Items were present but none survived sanitizing.
    NoValidItems,
}

impl ProposalRejection {
    pub fn message(&self) -> &'static str {
        match self {
            ProposalRejection::MissingFields => "Title, client name and at least one item are required",
            ProposalRejection::NoValidItems => "Provide valid items with a description and an amount",
        }
    }
}

impl CreateProposalRequest {
    /// Trim and sanitize into a creatable proposal.
    pub fn validate(self) -> Result<ProposalForCreate, ProposalRejection> {
        let title = self.title.trim().to_string();
        let client_name = self.client_name.trim().to_string();
        if title.is_empty() || client_name.is_empty() || self.items.is_empty() {
            return Err(ProposalRejection::MissingFields);
        }

        let items: Vec<ProposalItem> = self.items.iter().filter_map(ProposalItemInput::sanitize).collect();
        if items.is_empty() {
            return Err(ProposalRejection::NoValidItems);
        }

        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Ok(ProposalForCreate {
            title,
            client_name,
            client_email: optional(&self.client_email),
            client_company: optional(&self.client_company),
            items,
        })
    }
}

/// Proposal list entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub id: i64,
    pub title: String,
    pub client_name: String,
    pub total: f64,
    pub created_at: String,
}

impl From<&Proposal> for ProposalSummary {
    fn from(p: &Proposal) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            client_name: p.client_name.clone(),
            total: p.total,
            created_at: lib_utils::format_time(p.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalCreatedResponse {
    pub proposal: ProposalSummary,
}

/// Full proposal with items and the issuing company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetail {
    pub id: i64,
    pub title: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_company: Option<String>,
    pub total: f64,
    pub created_at: String,
    pub items: Vec<ProposalItem>,
    pub company: Option<CompanyInfo>,
}

impl ProposalDetail {
    pub fn new(p: Proposal, company: Option<CompanyInfo>) -> Self {
        let items = p.items();
        Self {
            id: p.id,
            created_at: lib_utils::format_time(p.created_at),
            title: p.title,
            client_name: p.client_name,
            client_email: p.client_email,
            client_company: p.client_company,
            total: p.total,
            items,
            company,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetailResponse {
    pub proposal: ProposalDetail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(description: Value, amount: Value) -> ProposalItemInput {
        ProposalItemInput { description, amount }
    }

    #[test]
    fn test_sanitize_coerces_and_filters() {
        assert_eq!(
            item(json!("  Design "), json!("150.5")).sanitize(),
            Some(ProposalItem { description: "Design".to_string(), amount: 150.5 })
        );
        assert_eq!(item(json!(""), json!(10)).sanitize(), None);
        assert_eq!(item(json!("Free"), json!(0)).sanitize(), None);
        assert_eq!(item(json!("Refund"), json!(-5)).sanitize(), None);
        assert_eq!(item(json!("Bad"), json!("abc")).sanitize(), None);
        assert_eq!(item(json!("Nothing"), Value::Null).sanitize(), None);
    }

    #[test]
    fn test_validate_requires_fields() {
        let req = CreateProposalRequest {
            title: "Site".to_string(),
            client_name: "  ".to_string(),
            items: vec![item(json!("Design"), json!(10))],
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err(), ProposalRejection::MissingFields);
    }

    #[test]
    fn test_validate_rejects_when_no_item_survives() {
        let req = CreateProposalRequest {
            title: "Site".to_string(),
            client_name: "ACME".to_string(),
            items: vec![item(json!(""), json!(10)), item(json!("x"), json!(0))],
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err(), ProposalRejection::NoValidItems);
    }

    #[test]
    fn test_validate_keeps_valid_items() {
        let req: CreateProposalRequest = serde_json::from_value(json!({
            "title": " Website ",
            "clientName": "ACME",
            "clientEmail": "",
            "items": [
                {"description": "Design", "amount": 100},
                {"description": "Hosting", "amount": "20.5"},
                {"description": "", "amount": 5}
            ]
        }))
        .unwrap();

        let proposal = req.validate().unwrap();
        assert_eq!(proposal.title, "Website");
        assert_eq!(proposal.client_email, None);
        assert_eq!(proposal.items.len(), 2);
        assert_eq!(proposal.total(), 120.5);
    }
}
