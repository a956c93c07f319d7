//! # Proposal Repository
//!
//! Proposals are always scoped to their owning account; no query here reads
//! another account's rows.

use chrono::{DateTime, Utc};
use sqlx::query_as;

use super::models::{Proposal, ProposalForCreate};
use super::DbPool;

pub struct ProposalRepository;

impl ProposalRepository {
    /// All proposals of an account, newest first.
    pub async fn list_for_account(pool: &DbPool, account_id: i64) -> Result<Vec<Proposal>, sqlx::Error> {
        query_as::<_, Proposal>(
            "SELECT * FROM proposals WHERE account_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(pool)
        .await
    }

    /// A single proposal, only if it belongs to `account_id`.
    pub async fn find_for_account(
        pool: &DbPool,
        account_id: i64,
        id: i64,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        query_as::<_, Proposal>("SELECT * FROM proposals WHERE id = ? AND account_id = ?")
            .bind(id)
            .bind(account_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_for_account(pool: &DbPool, account_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM proposals WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Creation time of the account's most recent proposal.
    pub async fn latest_for_account(
        pool: &DbPool,
        account_id: i64,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT created_at FROM proposals WHERE account_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(created_at,)| created_at))
    }

    /// Insert a proposal. The total is the sum of the item amounts.
    pub async fn create(
        pool: &DbPool,
        account_id: i64,
        proposal: ProposalForCreate,
    ) -> Result<Proposal, sqlx::Error> {
        let total = proposal.total();
        let items_json = serde_json::to_string(&proposal.items)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<_, Proposal>(
            r#"
            INSERT INTO proposals
                (account_id, title, client_name, client_email, client_company, items_json, total, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(proposal.title)
        .bind(proposal.client_name)
        .bind(proposal.client_email)
        .bind(proposal.client_company)
        .bind(items_json)
        .bind(total)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}
