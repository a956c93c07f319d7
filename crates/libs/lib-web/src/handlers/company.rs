//! Company branding endpoints.

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use lib_core::dto::{CompanyInfo, CompanyRequest, CompanyResponse};
use lib_core::model::store::CompanyRepository;
use lib_core::{AppError, DbPool, Result};
use tracing::info;

use crate::middleware::CtxAccount;

/// `GET /api/company` - `{"company": null}` until configured.
pub async fn get_company(
    State(pool): State<DbPool>,
    Extension(ctx): Extension<CtxAccount>,
) -> Result<Json<CompanyResponse>> {
    let company = CompanyRepository::find_by_account(&pool, ctx.account_id).await?;
    Ok(Json(CompanyResponse {
        company: company.map(CompanyInfo::from),
    }))
}

/// `POST /api/company` - `201` on first save, `200` on update.
pub async fn save_company(
    State(pool): State<DbPool>,
    Extension(ctx): Extension<CtxAccount>,
    Json(req): Json<CompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>)> {
    let upsert = req
        .into_upsert()
        .ok_or_else(|| AppError::InvalidInput("Company name is required".to_string()))?;

    let (settings, created) = CompanyRepository::upsert(&pool, ctx.account_id, upsert).await?;
    info!("[COMPANY] Account {} saved company settings", ctx.account_id);

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(CompanyResponse {
            company: Some(CompanyInfo::from(settings)),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils::{body_json, get_request, json_request, register_account, send, test_app};

    #[tokio::test]
    async fn test_company_lifecycle() {
        let (app, _state) = test_app().await;
        let token = register_account(&app, "ana@example.com", "hunter22").await;

        let body = body_json(send(&app, get_request("/api/company", Some(&token))).await).await;
        assert!(body["company"].is_null());

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/company",
                json!({"companyName": " Ana Design ", "cnpj": "12.345.678/0001-90"}),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["company"]["companyName"], "Ana Design");
        assert_eq!(body["company"]["address"], "");

        let response = send(
            &app,
            json_request("POST", "/api/company", json!({"companyName": "Ana Studio"}), Some(&token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(send(&app, get_request("/api/company", Some(&token))).await).await;
        assert_eq!(body["company"]["companyName"], "Ana Studio");
        assert_eq!(body["company"]["cnpj"], "");
    }

    #[tokio::test]
    async fn test_company_name_required() {
        let (app, _state) = test_app().await;
        let token = register_account(&app, "ana@example.com", "hunter22").await;

        let response = send(
            &app,
            json_request("POST", "/api/company", json!({"companyName": "   "}), Some(&token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_company_requires_session() {
        let (app, _state) = test_app().await;
        let response = send(
            &app,
            json_request("POST", "/api/company", json!({"companyName": "X"}), None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
