//! Credential store: salted one-way password hashing.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// Argon2id v1.3 with the crate's default cost. Verification reads the
/// parameters back from the stored PHC string, so raising the cost later
/// keeps old hashes valid.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

fn credential_error(op: &'static str, e: password_hash::Error) -> anyhow::Error {
    error!(error = %e, op, "credential store failure");
    anyhow::anyhow!("{op}: {e}")
}

/// Hashes `plain` with a fresh random salt, returning a PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| credential_error("hash password", e))
}

/// Returns whether `plain` matches `stored`. Only a real mismatch is
/// `false`; an unparsable hash or any other verifier failure is an error.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| credential_error("parse stored hash", e))?;
    match hasher().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(credential_error("verify password", e)),
    }
}
