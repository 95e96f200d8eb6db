//! Password-based key derivation (PBKDF2-HMAC-SHA256).

use crate::error::{CryptoError, CryptoResult};
use pbkdf2::pbkdf2_hmac;
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::num::NonZeroU32;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Size of a derived key in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of a salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Default PBKDF2 iteration count. Raise it as hardware gets faster.
pub const DEFAULT_ITERATIONS: u32 = 200_000;

/// Domain prefix for per-account content salts.
const ACCOUNT_SALT_DOMAIN: &[u8] = b"cardvault/v1/content-key-salt\0";

/// Domain prefix for per-account login credential salts.
const LOGIN_SALT_DOMAIN: &[u8] = b"cardvault/v1/login\0";

/// Salt fed to the KDF.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generates a random salt from the OS CSPRNG.
    pub fn random() -> CryptoResult<Self> {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::KeyDerivation(format!("OS RNG unavailable: {e}")))?;
        Ok(Self(bytes))
    }

    /// Salt used for the content key of `account`.
    ///
    /// Distinct per account so a precomputed dictionary only ever targets a
    /// single user, and reproducible on any client from the login name alone.
    pub fn for_account(account: &str) -> Self {
        Self::in_domain(ACCOUNT_SALT_DOMAIN, account)
    }

    /// Salt for the credential sent to the storage API when logging in.
    ///
    /// Never equal to the content salt of the same account.
    pub fn for_login(account: &str) -> Self {
        Self::in_domain(LOGIN_SALT_DOMAIN, account)
    }

    fn in_domain(domain: &[u8], account: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update(account.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; SALT_SIZE];
        bytes.copy_from_slice(&digest[..SALT_SIZE]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a salt from a stored slice, rejecting the wrong length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; SALT_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::KeyDerivation(format!(
                "salt must be {SALT_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt(")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// KDF work factor. Always valid once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    iterations: NonZeroU32,
}

impl KdfParams {
    pub fn new(iterations: u32) -> CryptoResult<Self> {
        let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
            CryptoError::KeyDerivation("iteration count must be non-zero".to_string())
        })?;
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: NonZeroU32::new(DEFAULT_ITERATIONS).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// A 256-bit symmetric key. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl Eq for DerivedKey {}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derives the 256-bit content key from a password.
///
/// Deterministic for fixed inputs and CPU-heavy by design. Async callers
/// should run it on a blocking worker.
pub fn derive_key(secret: &str, salt: &Salt, params: &KdfParams) -> DerivedKey {
    let mut out = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt.as_bytes(), params.iterations(), &mut out);
    let key = DerivedKey(out);
    out.zeroize();
    key
}

/// Derives the password the storage API sees for `account`.
///
/// PBKDF2 under [`Salt::for_login`], hex-encoded. The server can check it but
/// cannot turn it into the content key, which uses a different salt.
pub fn derive_login_credential(
    account: &str,
    secret: &str,
    params: &KdfParams,
) -> Zeroizing<String> {
    let key = derive_key(secret, &Salt::for_login(account), params);
    Zeroizing::new(hex::encode(key.as_bytes()))
}

/// General form of the KDF: arbitrary salt bytes and output length.
pub fn derive_key_material(
    secret: &str,
    salt: &[u8],
    iterations: u32,
    output_length: usize,
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    if iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be non-zero".to_string(),
        ));
    }
    if output_length == 0 {
        return Err(CryptoError::KeyDerivation(
            "output length must be non-zero".to_string(),
        ));
    }

    let mut out = Zeroizing::new(vec![0u8; output_length]);
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, iterations, &mut out);
    Ok(out)
}

/// Generates a random 256-bit key.
pub fn generate_random_key() -> CryptoResult<DerivedKey> {
    let mut bytes = [0u8; KEY_SIZE];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::KeyDerivation(format!("OS RNG unavailable: {e}")))?;
    let key = DerivedKey(bytes);
    bytes.zeroize();
    Ok(key)
}
