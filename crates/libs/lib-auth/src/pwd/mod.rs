//! # Password Hashing
//!
//! Password hashing and verification using Argon2id.
//!
//! Cost parameters are fixed so every stored digest has the same work factor;
//! the random salt and the parameters are embedded in the PHC string, so
//! verification never needs anything but the digest itself.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::{Error, Result};

/// Memory cost in KiB (19 MiB).
const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes.
const TIME_COST: u32 = 2;
/// Degree of parallelism.
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| Error::PwdHash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password. Each call uses a fresh salt, so equal inputs yield different digests.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PwdHash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against a stored digest.
///
/// A malformed digest is a mismatch, not an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

static DECOY_HASH: OnceLock<String> = OnceLock::new();

/// Build the throwaway digest used by [`verify_decoy`].
///
/// Called once at service construction so a hashing failure surfaces at startup.
/// Later calls are no-ops.
pub fn prepare_decoy() -> Result<()> {
    if DECOY_HASH.get().is_none() {
        let hash = hash_password("decoy-password-never-matches")?;
        // A concurrent caller may have won the race; either digest will do.
        let _ = DECOY_HASH.set(hash);
    }
    Ok(())
}

/// Run a full verification against a throwaway digest and discard the result.
///
/// Used when no account matches, so "unknown email" costs the same as "wrong password".
pub fn verify_decoy(password: &str) -> Result<()> {
    prepare_decoy()?;
    let hash = DECOY_HASH
        .get()
        .ok_or_else(|| Error::PwdHash("decoy digest unavailable".to_string()))?;
    let _ = verify_password(password, hash);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "TestPassword123!";
        let hash = hash_password(password).expect("Password hashing should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash));
        assert!(!verify_password("WrongPassword", &hash));
    }

    #[test]
    fn test_same_password_different_digest() {
        let first = hash_password("same-input").expect("hash");
        let second = hash_password("same-input").expect("hash");

        assert_ne!(first, second);
        assert!(verify_password("same-input", &first));
        assert!(verify_password("same-input", &second));
    }

    #[test]
    fn test_malformed_digest_is_mismatch() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_fixed_cost_parameters() {
        let hash = hash_password("cost-check").expect("hash");
        assert!(hash.contains("m=19456,t=2,p=1"));
    }

    #[test]
    fn test_decoy_is_prepared_once() {
        prepare_decoy().expect("decoy digest should build");
        let first = DECOY_HASH.get().cloned().expect("decoy stored");

        prepare_decoy().expect("second call is a no-op");
        assert_eq!(DECOY_HASH.get(), Some(&first));
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_decoy_runs_a_real_verification() {
        verify_decoy("whatever").expect("decoy verification should run");
        verify_decoy("").expect("decoy verification should run");
        assert!(DECOY_HASH.get().is_some());
    }
}
