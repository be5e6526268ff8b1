//! Key Vault backed envelope encryption for message-bus payloads.
//!
//! A secret fetched from a remote vault is hashed with SHA-256 into an
//! AES-256 key, cached per `(name, version)` for the life of the process,
//! and used to AES-CBC encrypt outgoing message bodies. The IV and the key
//! identity travel with each message as `KeyVault-*` headers so the
//! receiving side can resolve the same key and decrypt.
//! Trait-based [`Cipher`] and [`SecretProvider`] seams keep the cipher and
//! the vault client swappable.

pub mod aes_cbc;
pub mod cache;
pub mod config;
pub mod error;
pub mod headers;
pub mod identity;
pub mod iv;
pub mod kdf;
pub mod plugin;
pub mod provider;
pub mod traits;

pub use {
    aes_cbc::Aes256CbcCipher,
    cache::KeyCache,
    config::{KeyVaultPluginConfig, VaultCredentials},
    error::{KeyVaultError, Result},
    identity::SecretIdentity,
    iv::InitializationVector,
    kdf::{DerivedKey, derive_key},
    plugin::KeyVaultPlugin,
    provider::{InMemorySecretProvider, SecretProvider},
    traits::Cipher,
};
