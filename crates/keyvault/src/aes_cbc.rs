//! AES-256-CBC implementation of the [`Cipher`] trait.

use aes::{
    Aes256,
    cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7},
};

use crate::{
    error::{KeyVaultError, Result},
    iv::InitializationVector,
    kdf::DerivedKey,
    traits::Cipher,
};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// AES-256 in CBC mode with PKCS#7 padding.
///
/// Ciphertext length is the plaintext length rounded up to the next whole
/// block; a full padding block is added when the plaintext is already
/// block-aligned. CBC carries no authentication tag: a wrong key or IV is
/// only detected when the padding happens not to verify.
pub struct Aes256CbcCipher;

impl Cipher for Aes256CbcCipher {
    fn algorithm(&self) -> &'static str {
        "aes-256-cbc"
    }

    fn encrypt(
        &self,
        key: &DerivedKey,
        iv: &InitializationVector,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let encryptor = Aes256CbcEnc::new(key.as_bytes().into(), iv.as_bytes().into());
        Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    fn decrypt(
        &self,
        key: &DerivedKey,
        iv: &InitializationVector,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(KeyVaultError::InvalidCiphertext(format!(
                "length {} is not a positive multiple of the {BLOCK_LEN}-byte block size",
                ciphertext.len()
            )));
        }

        let decryptor = Aes256CbcDec::new(key.as_bytes().into(), iv.as_bytes().into());
        decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| KeyVaultError::InvalidCiphertext("padding check failed".to_string()))
    }
}
