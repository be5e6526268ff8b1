//! Secret provider seam and an in-memory implementation.
//!
//! The plugin treats the vault as an opaque source of secret strings. A
//! concrete client (HTTP, token acquisition, retries) implements
//! [`SecretProvider`] outside this crate, typically built from the plugin's
//! [`VaultCredentials`](crate::VaultCredentials).

use {
    async_trait::async_trait,
    secrecy::Secret,
    std::{collections::HashMap, sync::Arc},
    tokio::sync::RwLock,
};

/// Resolves `(name, version)` to a raw secret value.
///
/// An empty `version` asks for the latest version. Any resolution failure
/// (authentication, not found, network, cancellation) is reported as an
/// error; the plugin does not distinguish between them.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn fetch_secret(&self, name: &str, version: &str) -> anyhow::Result<Secret<String>>;
}

#[async_trait]
impl<P: SecretProvider + ?Sized> SecretProvider for Arc<P> {
    async fn fetch_secret(&self, name: &str, version: &str) -> anyhow::Result<Secret<String>> {
        (**self).fetch_secret(name, version).await
    }
}

/// In-memory secret store for tests and local development.
///
/// Each name keeps its versions in insertion order; the latest version is
/// the most recently inserted one.
#[derive(Default)]
pub struct InMemorySecretProvider {
    secrets: RwLock<HashMap<String, Vec<(String, Secret<String>)>>>,
}

impl InMemorySecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` as `version` of `name`, replacing an existing value for
    /// that version. The stored version becomes the latest.
    pub async fn insert(
        &self,
        name: impl Into<String>,
        version: impl Into<String>,
        value: impl Into<String>,
    ) {
        let version = version.into();
        let mut secrets = self.secrets.write().await;
        let versions = secrets.entry(name.into()).or_default();
        versions.retain(|(existing, _)| *existing != version);
        versions.push((version, Secret::new(value.into())));
    }
}

#[async_trait]
impl SecretProvider for InMemorySecretProvider {
    async fn fetch_secret(&self, name: &str, version: &str) -> anyhow::Result<Secret<String>> {
        let secrets = self.secrets.read().await;
        let versions = secrets
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("secret '{name}' not found"))?;

        let found = if version.is_empty() {
            versions.last()
        } else {
            versions.iter().find(|(v, _)| v == version)
        };

        found
            .map(|(_, value)| value.clone())
            .ok_or_else(|| anyhow::anyhow!("secret '{name}' has no version '{version}'"))
    }
}
