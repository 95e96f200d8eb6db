//! Password verifier material for the authentication side of an account.
//!
//! Uses its own random salt, independent of the content-key salt, so the
//! stored verifier can never be used as an encryption key.

use crate::error::CryptoResult;
use crate::key::{DerivedKey, KdfParams, Salt, derive_key};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Salt and PBKDF2 output for checking a password.
#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordVerifier {
    pub salt: Salt,
    pub verifier: [u8; 32],
    pub params: KdfParams,
}

impl std::fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordVerifier")
            .field("salt", &self.salt)
            .field("verifier", &"[REDACTED]")
            .field("params", &self.params)
            .finish()
    }
}

/// Derives a verifier for `password` under a fresh random salt.
pub fn make_password_verifier(
    password: &str,
    params: &KdfParams,
) -> CryptoResult<PasswordVerifier> {
    let salt = Salt::random()?;
    Ok(make_password_verifier_with_salt(password, salt, params))
}

pub fn make_password_verifier_with_salt(
    password: &str,
    salt: Salt,
    params: &KdfParams,
) -> PasswordVerifier {
    let derived: DerivedKey = derive_key(password, &salt, params);
    PasswordVerifier {
        salt,
        verifier: *derived.as_bytes(),
        params: *params,
    }
}

/// Checks `password` against stored verifier material in constant time.
pub fn verify_password(password: &str, stored: &PasswordVerifier) -> bool {
    let candidate = derive_key(password, &stored.salt, &stored.params);
    candidate.as_bytes().as_slice().ct_eq(stored.verifier.as_slice()).into()
}
