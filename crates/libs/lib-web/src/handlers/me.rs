//! `GET /api/me` - current account and dashboard statistics.

use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use lib_core::dto::{MeResponse, MeStats, MeUser};
use lib_core::model::store::ProposalRepository;
use lib_core::{AppError, DbPool, Result, SessionService};
use tracing::warn;

use crate::middleware::CtxAccount;

/// Returns `401` when the session is valid but its account is gone.
pub async fn me(
    State(sessions): State<Arc<SessionService>>,
    State(pool): State<DbPool>,
    Extension(ctx): Extension<CtxAccount>,
) -> Result<Json<MeResponse>> {
    let account = sessions.account(ctx.account_id).await?.ok_or_else(|| {
        warn!("[AUTH] Session for missing account {}", ctx.account_id);
        AppError::Unauthorized
    })?;

    let total_proposals = ProposalRepository::count_for_account(&pool, account.id).await?;
    let last_proposal_at = ProposalRepository::latest_for_account(&pool, account.id)
        .await?
        .map(lib_utils::format_time);

    Ok(Json(MeResponse {
        user: MeUser {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
        },
        stats: MeStats {
            total_proposals,
            last_proposal_at,
        },
    }))
}
