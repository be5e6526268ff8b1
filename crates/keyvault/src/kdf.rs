//! SHA-256 derivation of a cipher key from a vault secret.

use {
    sha2::{Digest, Sha256},
    std::fmt,
    zeroize::Zeroizing,
};

/// Length of a derived key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// A 256-bit symmetric key derived from a secret's raw value.
///
/// Zeroed on drop and redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Hash the UTF-8 bytes of `secret` into a [`DerivedKey`].
pub fn derive_key(secret: &str) -> DerivedKey {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&digest);
    DerivedKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_deterministic() {
        assert_eq!(derive_key("password"), derive_key("password"));
    }

    #[test]
    fn different_secrets_different_keys() {
        assert_ne!(derive_key("password1"), derive_key("password2"));
    }

    #[test]
    fn matches_sha256_digest() {
        // SHA-256("password") = 5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8
        let key = derive_key("password");
        assert_eq!(&key.as_bytes()[..4], &[0x5e, 0x88, 0x48, 0x98]);
        assert_eq!(&key.as_bytes()[28..], &[0x1d, 0x15, 0x42, 0xd8]);
    }

    #[test]
    fn debug_is_redacted() {
        let rendered = format!("{:?}", derive_key("password"));
        assert_eq!(rendered, "DerivedKey([REDACTED])");
    }
}
