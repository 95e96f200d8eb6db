//! Base64 wire form of an [`Envelope`], as exchanged with the storage API.

use crate::envelope::{self, Envelope};
use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;
use crate::record::PlaintextRecord;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// `nonce_b64` / `enc_data_b64` pair, standard alphabet with padding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnvelope {
    pub nonce_b64: String,
    pub enc_data_b64: String,
}

impl Envelope {
    pub fn to_wire(&self) -> WireEnvelope {
        WireEnvelope {
            nonce_b64: STANDARD.encode(self.nonce),
            enc_data_b64: STANDARD.encode(&self.ciphertext),
        }
    }

    /// Decodes a wire envelope. Bad base64 is an `Encoding` error; a nonce of
    /// the wrong length is treated like any other tampering.
    pub fn from_wire(wire: &WireEnvelope) -> CryptoResult<Self> {
        let (nonce, ciphertext) = decode_parts(wire)?;
        let nonce = nonce
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::AuthenticationFailure)?;
        Ok(Self { nonce, ciphertext })
    }
}

fn decode_parts(wire: &WireEnvelope) -> CryptoResult<(Vec<u8>, Vec<u8>)> {
    let nonce = STANDARD
        .decode(&wire.nonce_b64)
        .map_err(|e| CryptoError::Encoding(format!("nonce_b64: {e}")))?;
    let ciphertext = STANDARD
        .decode(&wire.enc_data_b64)
        .map_err(|e| CryptoError::Encoding(format!("enc_data_b64: {e}")))?;
    Ok((nonce, ciphertext))
}

/// Decodes and opens a wire envelope in one step.
pub fn open_wire(key: &DerivedKey, wire: &WireEnvelope) -> CryptoResult<PlaintextRecord> {
    let (nonce, ciphertext) = decode_parts(wire)?;
    envelope::open(key, &nonce, &ciphertext)
}
