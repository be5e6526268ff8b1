//! Key Vault plugin error types.

use crate::identity::SecretIdentity;

/// Errors produced by the Key Vault plugin.
///
/// The send and receive hooks never return the inner variants directly:
/// every failure is wrapped in [`KeyVaultError::EncryptionFailed`] or
/// [`KeyVaultError::DecryptionFailed`], with the cause available through
/// [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum KeyVaultError {
    /// Invalid or missing construction parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The secret could not be fetched (credentials, network, not found, timeout).
    #[error("secret {identity} is unavailable: {source}")]
    SecretUnavailable {
        identity: SecretIdentity,
        #[source]
        source: anyhow::Error,
    },

    /// Ciphertext is malformed, was tampered with, or was sealed with another key.
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// An encryption header on an incoming message could not be parsed.
    #[error("invalid {header} header: {reason}")]
    InvalidHeader {
        header: &'static str,
        reason: String,
    },

    /// The send hook failed; the message was left untouched.
    #[error("failed to encrypt message")]
    EncryptionFailed(#[source] Box<KeyVaultError>),

    /// The receive hook failed.
    #[error("failed to decrypt message")]
    DecryptionFailed(#[source] Box<KeyVaultError>),
}

impl KeyVaultError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The innermost busvault error, looking through the hook wrappers.
    pub fn root_cause(&self) -> &KeyVaultError {
        match self {
            Self::EncryptionFailed(inner) | Self::DecryptionFailed(inner) => inner.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, KeyVaultError>;
