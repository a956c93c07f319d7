//! # Proposal Handlers
//!
//! All queries are scoped to the authenticated account. A proposal owned by
//! someone else is reported as not found.

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};
use lib_core::dto::{
    CompanyInfo, CreateProposalRequest, ProposalCreatedResponse, ProposalDetail,
    ProposalDetailResponse, ProposalListResponse, ProposalSummary,
};
use lib_core::model::store::{CompanyRepository, ProposalRepository};
use lib_core::{AppError, DbPool, Result};
use tracing::info;

use crate::middleware::CtxAccount;

/// `GET /api/proposals` - summaries, newest first.
pub async fn list_proposals(
    State(pool): State<DbPool>,
    Extension(ctx): Extension<CtxAccount>,
) -> Result<Json<ProposalListResponse>> {
    let proposals = ProposalRepository::list_for_account(&pool, ctx.account_id).await?;
    Ok(Json(ProposalListResponse {
        proposals: proposals.iter().map(ProposalSummary::from).collect(),
    }))
}

/// `POST /api/proposals`
///
/// Items are sanitized; the total is computed server-side from what survives.
pub async fn create_proposal(
    State(pool): State<DbPool>,
    Extension(ctx): Extension<CtxAccount>,
    Json(req): Json<CreateProposalRequest>,
) -> Result<(StatusCode, Json<ProposalCreatedResponse>)> {
    let proposal = req
        .validate()
        .map_err(|rejection| AppError::InvalidInput(rejection.message().to_string()))?;

    let created = ProposalRepository::create(&pool, ctx.account_id, proposal).await?;
    info!(
        "[PROPOSAL] Account {} created proposal {} (total {:.2})",
        ctx.account_id, created.id, created.total
    );

    Ok((
        StatusCode::CREATED,
        Json(ProposalCreatedResponse {
            proposal: ProposalSummary::from(&created),
        }),
    ))
}

/// `GET /api/proposals/{id}` - full proposal with items and company branding.
pub async fn get_proposal(
    State(pool): State<DbPool>,
    Extension(ctx): Extension<CtxAccount>,
    Path(id): Path<String>,
) -> Result<Json<ProposalDetailResponse>> {
    let id = parse_id(&id).ok_or_else(|| AppError::InvalidInput("Invalid proposal id".to_string()))?;

    let proposal = ProposalRepository::find_for_account(&pool, ctx.account_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

    let company = CompanyRepository::find_by_account(&pool, ctx.account_id)
        .await?
        .map(CompanyInfo::from);

    Ok(Json(ProposalDetailResponse {
        proposal: ProposalDetail::new(proposal, company),
    }))
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use super::parse_id;
    use crate::test_utils::{body_json, get_request, json_request, register_account, send, test_app};

    fn proposal_body() -> Value {
        json!({
            "title": " Website ",
            "clientName": "ACME",
            "clientEmail": "buyer@acme.test",
            "items": [
                {"description": " Design ", "amount": 100},
                {"description": "Hosting", "amount": "20.5"},
                {"description": "", "amount": 50},
                {"description": "Discount", "amount": -10}
            ]
        })
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
    }

    #[tokio::test]
    async fn test_create_list_and_detail() {
        let (app, _state) = test_app().await;
        let token = register_account(&app, "ana@example.com", "hunter22").await;

        send(
            &app,
            json_request("POST", "/api/company", json!({"companyName": "Ana Design"}), Some(&token)),
        )
        .await;

        let response = send(&app, json_request("POST", "/api/proposals", proposal_body(), Some(&token))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["proposal"]["title"], "Website");
        assert_eq!(created["proposal"]["total"], 120.5);
        let id = created["proposal"]["id"].as_i64().unwrap();

        let list = body_json(send(&app, get_request("/api/proposals", Some(&token))).await).await;
        assert_eq!(list["proposals"].as_array().unwrap().len(), 1);

        let detail = body_json(
            send(&app, get_request(&format!("/api/proposals/{id}"), Some(&token))).await,
        )
        .await;
        let items = detail["proposal"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["description"], "Design");
        assert_eq!(detail["proposal"]["clientEmail"], "buyer@acme.test");
        assert_eq!(detail["proposal"]["company"]["companyName"], "Ana Design");
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (app, _state) = test_app().await;
        let token = register_account(&app, "ana@example.com", "hunter22").await;

        let missing = json!({"title": "Site", "clientName": "ACME", "items": []});
        let response = send(&app, json_request("POST", "/api/proposals", missing, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let worthless = json!({"title": "Site", "clientName": "ACME", "items": [{"description": "x", "amount": 0}]});
        let response = send(&app, json_request("POST", "/api/proposals", worthless, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_accounts_proposal_is_not_found() {
        let (app, _state) = test_app().await;
        let ana = register_account(&app, "ana@example.com", "hunter22").await;
        let bob = register_account(&app, "bob@example.com", "hunter22").await;

        let created = body_json(
            send(&app, json_request("POST", "/api/proposals", proposal_body(), Some(&ana))).await,
        )
        .await;
        let id = created["proposal"]["id"].as_i64().unwrap();

        let response = send(&app, get_request(&format!("/api/proposals/{id}"), Some(&bob))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let list = body_json(send(&app, get_request("/api/proposals", Some(&bob))).await).await;
        assert!(list["proposals"].as_array().unwrap().is_empty());

        let response = send(&app, get_request("/api/proposals/abc", Some(&ana))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_browser_client_payloads() {
        let (app, _state) = test_app().await;
        let token = register_account(&app, "ana@example.com", "hunter22").await;

        let company = json!({
            "companyName": "Ana Design",
            "cnpj": "12.345.678/0001-90",
            "address": "Rua A, 10",
            "logoUrl": "https://cdn.example.com/logo.png"
        });
        let response = send(&app, json_request("POST", "/api/company", company, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let saved = body_json(response).await;
        assert_eq!(saved["company"]["companyName"], "Ana Design");
        assert_eq!(saved["company"]["logoUrl"], "https://cdn.example.com/logo.png");

        let proposal = json!({
            "title": "Rebrand",
            "clientName": "ACME",
            "clientEmail": "buyer@acme.test",
            "clientCompany": "ACME Ltda",
            "items": [{"description": "Logo", "amount": "300"}]
        });
        let response = send(&app, json_request("POST", "/api/proposals", proposal, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["proposal"]["clientName"], "ACME");
        assert!(created["proposal"]["createdAt"].is_string());
        let id = created["proposal"]["id"].as_i64().unwrap();

        let detail = body_json(
            send(&app, get_request(&format!("/api/proposals/{id}"), Some(&token))).await,
        )
        .await;
        assert_eq!(detail["proposal"]["clientCompany"], "ACME Ltda");
        assert_eq!(detail["proposal"]["company"]["cnpj"], "12.345.678/0001-90");

        let me = body_json(send(&app, get_request("/api/me", Some(&token))).await).await;
        assert_eq!(me["stats"]["totalProposals"], 1);
        assert_eq!(me["stats"]["lastProposalAt"], created["proposal"]["createdAt"]);

        let response = send(&app, get_request("/api/proposals", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Not authenticated");
    }
}
