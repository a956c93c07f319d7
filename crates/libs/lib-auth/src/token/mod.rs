//! # Session Tokens
//!
//! HS256 JWTs carrying the account id (`sub`), issue time and expiry.
//!
//! Tokens are stateless: nothing is stored server-side and there is no
//! revocation list, so a token stays valid until `exp` (logout only clears the
//! client's copy).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// JWT claims for a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Account id carried in `sub`.
    pub fn account_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::TokenInvalid(format!("non-numeric subject '{}'", self.sub)))
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is exact: a token is dead the second `exp` passes.
    validation.leeway = 0;
    validation
}

/// Issues and verifies session tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Build an issuer.
    ///
    /// An empty secret, or a TTL that is not a positive number of hours that
    /// fits a `Duration`, is a configuration error.
    pub fn new(secret: &str, ttl_hours: i64) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::MissingSecret);
        }

        let ttl = Duration::try_hours(ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or(Error::InvalidTtl(ttl_hours))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: validation(),
            ttl,
        })
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `account_id` expiring one TTL from now.
    pub fn issue(&self, account_id: i64) -> Result<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| Error::TokenEncode("expiry out of range".to_string()))?;
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::TokenEncode(e.to_string()))
    }

    /// Account id of a valid token, `None` otherwise.
    ///
    /// Missing, malformed, forged, and expired tokens all yield `None`.
    pub fn verify(&self, token: Option<&str>) -> Option<i64> {
        let token = token.filter(|t| !t.is_empty())?;

        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("[TOKEN] Rejected: {}", e);
                return None;
            }
        };

        match claims.account_id() {
            Ok(id) => Some(id),
            Err(e) => {
                debug!("[TOKEN] Rejected: {}", e);
                None
            }
        }
    }
}
