//! Plugin configuration and validation.

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    std::{fmt, time::Duration},
    url::Url,
};

use crate::{
    error::{KeyVaultError, Result},
    identity::SecretIdentity,
};

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`KeyVaultPlugin`](crate::KeyVaultPlugin).
///
/// Can be built in code or deserialized, e.g. from a `[keyvault]` TOML
/// table:
///
/// ```toml
/// secret_name = "service-bus"
/// vault_endpoint = "https://contoso.vault.azure.net/"
/// credential_id = "00000000-0000-0000-0000-000000000000"
/// credential_secret = "..."
/// ```
#[derive(Clone, Deserialize)]
pub struct KeyVaultPluginConfig {
    /// Secret whose hash encrypts outgoing messages.
    #[serde(default)]
    pub secret_name: String,
    /// Pinned secret version. Empty selects the latest version.
    #[serde(default)]
    pub secret_version: String,
    /// Vault base URL, e.g. `https://{vault-name}.vault.azure.net/`.
    #[serde(default)]
    pub vault_endpoint: String,
    /// Client id used to authenticate against the vault.
    #[serde(default)]
    pub credential_id: String,
    /// Client secret used to authenticate against the vault.
    #[serde(default = "empty_secret")]
    pub credential_secret: Secret<String>,
    /// Upper bound on a single secret fetch. `0` disables the bound.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl KeyVaultPluginConfig {
    pub fn new(
        secret_name: impl Into<String>,
        vault_endpoint: impl Into<String>,
        credential_id: impl Into<String>,
        credential_secret: impl Into<String>,
    ) -> Self {
        Self {
            secret_name: secret_name.into(),
            secret_version: String::new(),
            vault_endpoint: vault_endpoint.into(),
            credential_id: credential_id.into(),
            credential_secret: Secret::new(credential_secret.into()),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_secret_version(mut self, version: impl Into<String>) -> Self {
        self.secret_version = version.into();
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout_secs = timeout.map_or(0, |t| t.as_secs().max(1));
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| KeyVaultError::configuration(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every required field. Called by the plugin constructor.
    pub fn validate(&self) -> Result<()> {
        if self.secret_name.trim().is_empty() {
            return Err(KeyVaultError::configuration("secret_name is required"));
        }
        self.endpoint_url()?;
        if self.credential_id.trim().is_empty() {
            return Err(KeyVaultError::configuration("credential_id is required"));
        }
        if self.credential_secret.expose_secret().trim().is_empty() {
            return Err(KeyVaultError::configuration(
                "credential_secret is required",
            ));
        }
        Ok(())
    }

    /// The identity outgoing messages are encrypted with.
    pub fn identity(&self) -> SecretIdentity {
        SecretIdentity::new(self.secret_name.clone(), self.secret_version.clone())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }

    /// Credentials for whoever builds the concrete [`SecretProvider`](crate::SecretProvider).
    pub fn credentials(&self) -> Result<VaultCredentials> {
        Ok(VaultCredentials {
            endpoint: self.endpoint_url()?,
            client_id: self.credential_id.clone(),
            client_secret: self.credential_secret.clone(),
        })
    }

    fn endpoint_url(&self) -> Result<Url> {
        if self.vault_endpoint.trim().is_empty() {
            return Err(KeyVaultError::configuration("vault_endpoint is required"));
        }
        let url = Url::parse(self.vault_endpoint.trim()).map_err(|e| {
            KeyVaultError::configuration(format!("vault_endpoint is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(KeyVaultError::configuration(format!(
                "vault_endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }
}

impl fmt::Debug for KeyVaultPluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyVaultPluginConfig")
            .field("secret_name", &self.secret_name)
            .field("secret_version", &self.secret_version)
            .field("vault_endpoint", &self.vault_endpoint)
            .field("credential_id", &self.credential_id)
            .field("credential_secret", &"[REDACTED]")
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .finish()
    }
}

/// Vault endpoint and client credentials, validated.
#[derive(Clone)]
pub struct VaultCredentials {
    pub endpoint: Url,
    pub client_id: String,
    pub client_secret: Secret<String>,
}

impl fmt::Debug for VaultCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultCredentials")
            .field("endpoint", &self.endpoint.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
