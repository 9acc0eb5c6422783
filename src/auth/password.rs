use anyhow::anyhow;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{error, warn};

/// Hashes a plaintext password into a PHC string with a fresh salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {e}"))
}

/// `Ok(false)` on mismatch. Errors only when the stored hash cannot be used.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is unreadable");
        anyhow!("stored password hash is unreadable: {e}")
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {e}")),
    }
}

lazy_static! {
    static ref DUMMY_HASH: Option<String> = hash_password("account-service-dummy").ok();
}

/// Computes the dummy hash up front so the first unknown-email login does not pay for it.
pub fn warm_up() {
    if DUMMY_HASH.is_none() {
        warn!("dummy password hash unavailable; unknown-email logins will answer faster");
    }
}

/// Burns one verification for logins against unknown emails.
pub fn verify_against_dummy(plain: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plain, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_only_accepts_its_password() {
        let hash = hash_password("longenough").unwrap();
        assert!(verify_password("longenough", &hash).unwrap());
        assert!(!verify_password("longenough ", &hash).unwrap());
        assert!(!verify_password("another-secret", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_hashes() {
        let a = hash_password("longenough").unwrap();
        let b = hash_password("longenough").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("longenough", &a).unwrap());
        assert!(verify_password("longenough", &b).unwrap());
    }

    #[test]
    fn unreadable_stored_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("longenough", "plaintext-column").is_err());
    }

    #[test]
    fn warm_up_prepares_a_dummy_that_matches_no_login() {
        warm_up();
        let hash = DUMMY_HASH.as_deref().expect("dummy hash computed");
        assert!(!verify_password("longenough", hash).unwrap());
        verify_against_dummy("longenough");
    }
}
