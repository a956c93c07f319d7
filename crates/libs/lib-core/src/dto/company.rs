//! Company branding DTOs (`GET`/`POST /api/company`).

use serde::{Deserialize, Serialize};

use crate::model::store::{CompanyForUpsert, CompanySettings};

/// Company settings request. All fields are trimmed; empty optionals are
/// stored as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyRequest {
    pub company_name: String,
    pub cnpj: String,
    pub address: String,
    pub logo_url: String,
}

impl CompanyRequest {
    /// Trimmed upsert payload. `None` when the company name is empty.
    pub fn into_upsert(self) -> Option<CompanyForUpsert> {
        let company_name = self.company_name.trim().to_string();
        if company_name.is_empty() {
            return None;
        }
        Some(CompanyForUpsert {
            company_name,
            cnpj: non_empty(&self.cnpj),
            address: non_empty(&self.address),
            logo_url: non_empty(&self.logo_url),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Company settings as returned to clients. Absent values render as `""`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub company_name: String,
    pub cnpj: String,
    pub address: String,
    pub logo_url: String,
}

impl From<CompanySettings> for CompanyInfo {
    fn from(settings: CompanySettings) -> Self {
        Self {
            company_name: settings.company_name,
            cnpj: settings.cnpj.unwrap_or_default(),
            address: settings.address.unwrap_or_default(),
            logo_url: settings.logo_url.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub company: Option<CompanyInfo>,
}
