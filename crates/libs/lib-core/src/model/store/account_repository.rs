//! # Account Repository
//!
//! Database access for accounts (the credential store).
//!
//! Emails are stored exactly as given; callers normalize them first with
//! [`lib_utils::normalize_email`].

use chrono::Utc;
use sqlx::query_as;

use super::models::{Account, AccountForCreate, Role};
use super::DbPool;

/// Account repository for database operations.
pub struct AccountRepository;

impl AccountRepository {
    /// Find an account by its (normalized) email address.
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        query_as::<_, Account>("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by its ID.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Account>, sqlx::Error> {
        query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new account with role `STANDARD`.
    ///
    /// # Errors
    ///
    /// A duplicate email surfaces as a unique-constraint violation; see
    /// [`is_unique_violation`].
    pub async fn create(pool: &DbPool, account: AccountForCreate) -> Result<Account, sqlx::Error> {
        query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(account.name)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(Role::Standard.as_str())
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// Change an account's role. Returns `None` when the account does not exist.
    pub async fn set_role(pool: &DbPool, id: i64, role: Role) -> Result<Option<Account>, sqlx::Error> {
        query_as::<_, Account>("UPDATE accounts SET role = ? WHERE id = ? RETURNING *")
            .bind(role.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Whether a store error is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
