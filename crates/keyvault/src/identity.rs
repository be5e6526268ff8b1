//! Secret identity: the `(name, version)` pair naming a vault secret.

use {
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Identifies one secret value in the vault.
///
/// An empty `version` means "latest". Two identities are equal only if both
/// fields match exactly, so `("a", "")` and `("a", "v1")` are cached
/// separately even when "v1" happens to be the latest version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretIdentity {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl SecretIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Identity of the latest version of `name`.
    pub fn latest(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    pub fn is_latest(&self) -> bool {
        self.version.is_empty()
    }
}

impl fmt::Display for SecretIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_latest() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.name, self.version)
        }
    }
}
