//! Cipher trait for swappable block-cipher backends.

use crate::{error::Result, iv::InitializationVector, kdf::DerivedKey};

/// Symmetric encryption of message bodies under a derived key and IV.
///
/// Implementations hold no per-call state, so one instance can serve
/// concurrent hooks.
pub trait Cipher: Send + Sync {
    /// Short algorithm identifier, used in logs.
    fn algorithm(&self) -> &'static str;

    /// Encrypt `plaintext`. Deterministic for identical inputs.
    fn encrypt(
        &self,
        key: &DerivedKey,
        iv: &InitializationVector,
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Decrypt a body previously produced by [`encrypt`](Self::encrypt).
    fn decrypt(
        &self,
        key: &DerivedKey,
        iv: &InitializationVector,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;
}
