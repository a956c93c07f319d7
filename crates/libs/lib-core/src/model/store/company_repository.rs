//! # Company Repository
//!
//! One row of company branding per account.

use chrono::Utc;
use sqlx::query_as;

use super::models::{CompanyForUpsert, CompanySettings};
use super::DbPool;

pub struct CompanyRepository;

impl CompanyRepository {
    /// Company settings of an account, if configured.
    pub async fn find_by_account(
        pool: &DbPool,
        account_id: i64,
    ) -> Result<Option<CompanySettings>, sqlx::Error> {
        query_as::<_, CompanySettings>("SELECT * FROM company_settings WHERE account_id = ?")
            .bind(account_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace an account's company settings.
    ///
    /// Returns the stored row and `true` when it was newly created.
    pub async fn upsert(
        pool: &DbPool,
        account_id: i64,
        company: CompanyForUpsert,
    ) -> Result<(CompanySettings, bool), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM company_settings WHERE account_id = ?")
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await?;

        let settings = match existing {
            Some((id,)) => {
                query_as::<_, CompanySettings>(
                    r#"
                    UPDATE company_settings
                    SET company_name = ?, cnpj = ?, address = ?, logo_url = ?, updated_at = ?
                    WHERE id = ?
                    RETURNING *
                    "#,
                )
                .bind(company.company_name)
                .bind(company.cnpj)
                .bind(company.address)
                .bind(company.logo_url)
                .bind(Utc::now())
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                query_as::<_, CompanySettings>(
                    r#"
                    INSERT INTO company_settings (account_id, company_name, cnpj, address, logo_url, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    RETURNING *
                    "#,
                )
                .bind(account_id)
                .bind(company.company_name)
                .bind(company.cnpj)
                .bind(company.address)
                .bind(company.logo_url)
                .bind(Utc::now())
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok((settings, existing.is_none()))
    }
}
