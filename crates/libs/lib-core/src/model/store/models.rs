use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role. Stored as its uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Standard,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "STANDARD",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STANDARD" => Ok(Role::Standard),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Unknown stored values read as `Standard` (least privilege).
impl From<String> for Role {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Account entity representing a complete account record from the database.
///
/// Not `Serialize`: the password hash must never cross the API boundary.
/// Handlers map to the response DTOs instead.
#[derive(Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Data structure for creating a new account.
///
/// Email must already be normalized and the password already hashed.
#[derive(Clone)]
pub struct AccountForCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl AccountForCreate {
    /// Create a new `AccountForCreate` instance.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
        }
    }
}

/// Per-account company branding used on proposals.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct CompanySettings {
    pub id: i64,
    pub account_id: i64,
    pub company_name: String,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written by a company upsert. Empty optionals are stored as NULL.
#[derive(Debug, Clone, Default)]
pub struct CompanyForUpsert {
    pub company_name: String,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
}

/// One priced line of a proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProposalItem {
    pub description: String,
    pub amount: f64,
}

/// Proposal record. Items are kept as a JSON array in `items_json`.
#[derive(Debug, Clone, FromRow)]
pub struct Proposal {
    pub id: i64,
    pub account_id: i64,
    pub title: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_company: Option<String>,
    pub items_json: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// Decode the stored items.
    ///
    /// Entries that no longer decode, or have a blank description or a
    /// non-positive amount, are skipped.
    pub fn items(&self) -> Vec<ProposalItem> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(&self.items_json).unwrap_or_default();
        raw.into_iter()
            .filter_map(|v| serde_json::from_value::<ProposalItem>(v).ok())
            .filter(|item| !item.description.trim().is_empty() && item.amount > 0.0)
            .collect()
    }
}

/// Data structure for creating a proposal. Items must already be sanitized.
#[derive(Debug, Clone)]
pub struct ProposalForCreate {
    pub title: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_company: Option<String>,
    pub items: Vec<ProposalItem>,
}

impl ProposalForCreate {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}
