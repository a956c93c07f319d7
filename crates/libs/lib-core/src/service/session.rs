//! # Session Façade
//!
//! Registration, authentication, session tokens and promotion over the
//! account store.
//!
//! Argon2 work is CPU-bound and deliberately slow, so every hash and verify
//! runs on Tokio's blocking pool.
//!
//! The façade performs no authorization; [`promote`](SessionService::promote)
//! is gated by [`AdminPolicy`](super::AdminPolicy) or by operator access.

use lib_auth::{hash_password, prepare_decoy, verify_decoy, verify_password, TokenIssuer};
use lib_utils::normalize_email;
use tokio::task;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::model::store::account_repository::is_unique_violation;
use crate::model::store::{Account, AccountForCreate, AccountRepository, DbPool, Role};

pub struct SessionService {
    pool: DbPool,
    tokens: TokenIssuer,
}

impl SessionService {
    /// Build the façade. Fails with [`AppError::Config`] when the signing
    /// secret is missing or the session TTL is out of range, and with
    /// [`AppError::Internal`] when the decoy digest cannot be built.
    pub fn new(pool: DbPool, config: &Config) -> Result<Self> {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.session_ttl_hours)?;
        prepare_decoy()?;
        Ok(Self { pool, tokens })
    }

    /// Create a `STANDARD` account.
    ///
    /// The email is normalized (trimmed, lowercased) before the duplicate
    /// check and the insert. A concurrent insert of the same email is caught
    /// by the UNIQUE constraint and reported as [`AppError::DuplicateEmail`]
    /// as well.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Account> {
        let email = normalize_email(email);

        if AccountRepository::find_by_email(&self.pool, &email).await?.is_some() {
            debug!("[REGISTER] Email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password = password.to_string();
        let password_hash = task::spawn_blocking(move || hash_password(&password)).await??;

        let account = AccountRepository::create(
            &self.pool,
            AccountForCreate::new(name.trim().to_string(), email, password_hash),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateEmail
            } else {
                AppError::from(e)
            }
        })?;

        info!("[REGISTER] Account {} created", account.id);
        Ok(account)
    }

    /// Check an email/password pair.
    ///
    /// Returns `None` for an unknown email and for a wrong password alike.
    /// An unknown email still pays for one full verification.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Account>> {
        let email = normalize_email(email);
        let account = AccountRepository::find_by_email(&self.pool, &email).await?;
        let password = password.to_string();

        let Some(account) = account else {
            task::spawn_blocking(move || verify_decoy(&password)).await??;
            debug!("[LOGIN] Authentication failed");
            return Ok(None);
        };

        let hash = account.password_hash.clone();
        let valid = task::spawn_blocking(move || verify_password(&password, &hash)).await?;

        if valid {
            debug!("[LOGIN] Account {} authenticated", account.id);
            Ok(Some(account))
        } else {
            debug!("[LOGIN] Authentication failed");
            Ok(None)
        }
    }

    /// Mint a session token for an account.
    pub fn issue_session(&self, account_id: i64) -> Result<String> {
        Ok(self.tokens.issue(account_id)?)
    }

    /// Account id carried by a valid token.
    pub fn resolve_session(&self, token: Option<&str>) -> Option<i64> {
        self.tokens.verify(token)
    }

    /// Session lifetime in seconds.
    pub fn session_ttl_secs(&self) -> i64 {
        self.tokens.ttl().num_seconds()
    }

    /// Grant `ADMIN` to an account. Idempotent.
    pub async fn promote(&self, account_id: i64) -> Result<Account> {
        let account = AccountRepository::set_role(&self.pool, account_id, Role::Admin)
            .await?
            .ok_or_else(|| {
                warn!("[ADMIN] Promotion of missing account {}", account_id);
                AppError::NotFound("Account not found".to_string())
            })?;

        info!("[ADMIN] Account {} promoted to {}", account.id, account.role);
        Ok(account)
    }

    pub async fn account(&self, account_id: i64) -> Result<Option<Account>> {
        Ok(AccountRepository::find_by_id(&self.pool, account_id).await?)
    }

    /// Look up an account by email (normalized here).
    pub async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(AccountRepository::find_by_email(&self.pool, &normalize_email(email)).await?)
    }
}

#[cfg(test)]
pub(crate) async fn test_service() -> SessionService {
    let pool = crate::model::store::memory_pool().await.unwrap();
    SessionService::new(pool, &crate::config::test_config()).unwrap()
}
