//! Per-message initialization vectors.

use {
    base64::{Engine, engine::general_purpose::STANDARD},
    rand::RngCore,
    std::fmt,
};

use crate::{
    error::{KeyVaultError, Result},
    headers,
};

/// IV length in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// A 128-bit initialization vector.
///
/// Not secret: it travels with the message in the `KeyVault-IV` header.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InitializationVector([u8; IV_LEN]);

impl InitializationVector {
    /// Draw a fresh IV from the OS-seeded CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Decode the value of a `KeyVault-IV` header.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|e| KeyVaultError::InvalidHeader {
                header: headers::IV,
                reason: e.to_string(),
            })?;
        let bytes: [u8; IV_LEN] =
            decoded
                .try_into()
                .map_err(|bytes: Vec<u8>| KeyVaultError::InvalidHeader {
                    header: headers::IV,
                    reason: format!("expected {IV_LEN} bytes, got {}", bytes.len()),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for InitializationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitializationVector({})", self.to_base64())
    }
}
