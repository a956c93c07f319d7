//! # Admin Promotion Policy
//!
//! The one place that decides whether a request may promote an account.
//!
//! Checks run in a fixed order:
//! 1. `ADMIN_ENABLE_SECRET` must be configured, else [`AppError::Config`].
//! 2. The provided `x-admin-secret` must match, else [`AppError::Forbidden`].
//!    Either side may be percent-encoded.
//! 3. The caller must hold a valid session, else [`AppError::Unauthorized`].

use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::model::store::Account;

use super::session::SessionService;

#[derive(Clone, Default)]
pub struct AdminPolicy {
    secret: Option<String>,
}

impl AdminPolicy {
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { secret }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.admin_enable_secret.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check the provided admin secret.
    pub fn authorize(&self, provided: Option<&str>) -> Result<()> {
        let Some(configured) = self.secret.as_deref() else {
            warn!("[ADMIN] Promotion attempted but ADMIN_ENABLE_SECRET is not set");
            return Err(AppError::Config("ADMIN_ENABLE_SECRET is not set".to_string()));
        };

        let provided = provided.unwrap_or_default().trim();
        if secrets_match(provided, configured) {
            Ok(())
        } else {
            warn!("[ADMIN] Rejected promotion: admin secret mismatch");
            Err(AppError::Forbidden)
        }
    }

    /// Authorize, resolve the caller's session, then promote the caller.
    pub async fn promote(
        &self,
        sessions: &SessionService,
        provided_secret: Option<&str>,
        session_token: Option<&str>,
    ) -> Result<Account> {
        self.authorize(provided_secret)?;

        let account_id = sessions
            .resolve_session(session_token)
            .ok_or(AppError::Unauthorized)?;

        let account = sessions.promote(account_id).await?;
        info!("[ADMIN] Self-promotion granted to account {}", account.id);
        Ok(account)
    }
}

/// Constant-time comparison that also accepts the percent-decoded form of
/// either side.
fn secrets_match(provided: &str, configured: &str) -> bool {
    let decoded_provided = percent_decoded(provided);
    let decoded_configured = percent_decoded(configured);

    // Evaluate every variant so the timing does not depend on which matched
    let direct = ct_eq(provided, configured);
    let provided_encoded = ct_eq(&decoded_provided, configured);
    let configured_encoded = ct_eq(provided, &decoded_configured);

    direct | provided_encoded | configured_encoded
}

fn percent_decoded(value: &str) -> String {
    urlencoding::decode(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn ct_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
