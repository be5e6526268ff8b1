//! The Key Vault message plugin: encrypt on send, decrypt on receive.

use {
    async_trait::async_trait,
    busvault_common::{Message, MessagePlugin},
    secrecy::Secret,
    std::time::{Duration, Instant},
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use busvault_metrics::{counter, histogram, keyvault as keyvault_metrics, labels};

use crate::{
    aes_cbc::Aes256CbcCipher,
    cache::KeyCache,
    config::KeyVaultPluginConfig,
    error::{KeyVaultError, Result},
    headers,
    identity::SecretIdentity,
    iv::InitializationVector,
    kdf::DerivedKey,
    provider::SecretProvider,
    traits::Cipher,
};

/// Encrypts outgoing message bodies and decrypts incoming ones with a key
/// derived from a vault secret.
///
/// Generic over [`Cipher`] but defaults to [`Aes256CbcCipher`]. Each plugin
/// owns its own [`KeyCache`]; keys are fetched at most once per identity
/// except when concurrent lookups race.
pub struct KeyVaultPlugin<P, C: Cipher = Aes256CbcCipher> {
    identity: SecretIdentity,
    provider: P,
    cipher: C,
    cache: KeyCache,
    fetch_timeout: Option<Duration>,
}

impl<P: SecretProvider> KeyVaultPlugin<P, Aes256CbcCipher> {
    /// Create a plugin with the default AES-256-CBC cipher.
    pub fn new(config: &KeyVaultPluginConfig, provider: P) -> Result<Self> {
        Self::with_cipher(config, provider, Aes256CbcCipher)
    }
}

impl<P: SecretProvider, C: Cipher> KeyVaultPlugin<P, C> {
    /// Create a plugin with a custom cipher.
    ///
    /// Fails with [`KeyVaultError::Configuration`] if `config` is invalid.
    pub fn with_cipher(config: &KeyVaultPluginConfig, provider: P, cipher: C) -> Result<Self> {
        config.validate()?;

        info!(
            secret_name = %config.secret_name,
            secret_version = %config.secret_version,
            algorithm = cipher.algorithm(),
            "key vault plugin configured"
        );

        Ok(Self {
            identity: config.identity(),
            provider,
            cipher,
            cache: KeyCache::new(),
            fetch_timeout: config.fetch_timeout(),
        })
    }

    /// Identity of the secret used for outgoing messages.
    pub fn identity(&self) -> &SecretIdentity {
        &self.identity
    }

    pub fn cache(&self) -> &KeyCache {
        &self.cache
    }

    /// Send path. Encrypts the body and attaches the envelope headers.
    ///
    /// A message that already carries any envelope header is left untouched,
    /// so running the hook twice never double-encrypts. On failure the
    /// message is not modified.
    pub async fn encrypt_message(&self, message: &mut Message) -> Result<()> {
        if headers::is_tagged(message) {
            debug!("message already carries key vault headers, passing through");
            #[cfg(feature = "metrics")]
            counter!(keyvault_metrics::MESSAGES_PASSED_THROUGH_TOTAL, labels::DIRECTION => "send")
                .increment(1);
            return Ok(());
        }

        let (iv, ciphertext) = self.seal(&message.body).await.map_err(|e| {
            warn!(secret_name = %self.identity.name, error = %e, "message encryption failed");
            #[cfg(feature = "metrics")]
            counter!(keyvault_metrics::ENCRYPTION_FAILURES_TOTAL).increment(1);
            KeyVaultError::EncryptionFailed(Box::new(e))
        })?;

        // Nothing below can fail: headers and body change together.
        message.set_property(headers::IV, iv.to_base64());
        message.set_property(headers::KEY_NAME, self.identity.name.clone());
        message.set_property(headers::KEY_VERSION, self.identity.version.clone());
        message.body = ciphertext;

        debug!(
            secret_name = %self.identity.name,
            body_len = message.body.len(),
            "message encrypted"
        );
        #[cfg(feature = "metrics")]
        counter!(keyvault_metrics::MESSAGES_ENCRYPTED_TOTAL).increment(1);

        Ok(())
    }

    /// Receive path. Strips the envelope headers and decrypts the body.
    ///
    /// Messages without both the IV and key-name headers are not ours and
    /// pass through. The key identity comes from the headers, not from this
    /// plugin's configuration. Once the headers have been parsed they are
    /// removed, and they stay removed even if decryption then fails.
    pub async fn decrypt_message(&self, message: &mut Message) -> Result<()> {
        if !headers::is_encrypted(message) {
            debug!("message has no key vault headers, passing through");
            #[cfg(feature = "metrics")]
            counter!(keyvault_metrics::MESSAGES_PASSED_THROUGH_TOTAL, labels::DIRECTION => "receive")
                .increment(1);
            return Ok(());
        }

        self.open(message).await.map_err(|e| {
            warn!(error = %e, "message decryption failed");
            #[cfg(feature = "metrics")]
            counter!(keyvault_metrics::DECRYPTION_FAILURES_TOTAL).increment(1);
            KeyVaultError::DecryptionFailed(Box::new(e))
        })?;

        debug!(body_len = message.body.len(), "message decrypted");
        #[cfg(feature = "metrics")]
        counter!(keyvault_metrics::MESSAGES_DECRYPTED_TOTAL).increment(1);

        Ok(())
    }

    async fn seal(&self, body: &[u8]) -> Result<(InitializationVector, Vec<u8>)> {
        let iv = InitializationVector::generate();
        let key = self.resolve_key(&self.identity).await?;
        let ciphertext = self.cipher.encrypt(&key, &iv, body)?;
        Ok((iv, ciphertext))
    }

    async fn open(&self, message: &mut Message) -> Result<()> {
        let iv = InitializationVector::from_base64(message.property(headers::IV).unwrap_or_default())?;
        let name = message
            .property(headers::KEY_NAME)
            .unwrap_or_default()
            .to_string();
        if name.trim().is_empty() {
            return Err(KeyVaultError::InvalidHeader {
                header: headers::KEY_NAME,
                reason: "empty secret name".to_string(),
            });
        }
        let version = message
            .property(headers::KEY_VERSION)
            .unwrap_or_default()
            .to_string();

        headers::strip(message);

        let key = self.resolve_key(&SecretIdentity::new(name, version)).await?;
        message.body = self.cipher.decrypt(&key, &iv, &message.body)?;
        Ok(())
    }

    async fn resolve_key(&self, identity: &SecretIdentity) -> Result<DerivedKey> {
        self.cache
            .get_or_fetch(identity, || self.fetch_secret(identity))
            .await
    }

    async fn fetch_secret(&self, identity: &SecretIdentity) -> anyhow::Result<Secret<String>> {
        let start = Instant::now();
        let fetch = self
            .provider
            .fetch_secret(&identity.name, &identity.version);

        let result = match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .unwrap_or_else(|_| Err(anyhow::anyhow!("secret fetch timed out after {limit:?}"))),
            None => fetch.await,
        };

        #[cfg(feature = "metrics")]
        {
            histogram!(keyvault_metrics::SECRET_FETCH_DURATION_SECONDS)
                .record(start.elapsed().as_secs_f64());
            if result.is_err() {
                counter!(keyvault_metrics::SECRET_FETCH_FAILURES_TOTAL).increment(1);
            }
        }

        debug!(
            secret_name = %identity.name,
            secret_version = %identity.version,
            elapsed_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "secret fetch finished"
        );

        result
    }
}

#[async_trait]
impl<P: SecretProvider, C: Cipher> MessagePlugin for KeyVaultPlugin<P, C> {
    type Error = KeyVaultError;

    fn name(&self) -> &str {
        "busvault.keyvault"
    }

    async fn before_send(&self, message: &mut Message) -> Result<()> {
        self.encrypt_message(message).await
    }

    async fn after_receive(&self, message: &mut Message) -> Result<()> {
        self.decrypt_message(message).await
    }
}
