//! Encryption envelope headers attached to message user properties.

use busvault_common::Message;

/// Base64-encoded initialization vector.
pub const IV: &str = "KeyVault-IV";
/// Name of the secret the body key was derived from.
pub const KEY_NAME: &str = "KeyVault-KeyName";
/// Version of that secret; empty when the latest version was used.
pub const KEY_VERSION: &str = "KeyVault-KeyVersion";

/// Every header the plugin writes.
pub const ALL: [&str; 3] = [IV, KEY_NAME, KEY_VERSION];

/// True if any envelope header is present, meaning the message was already
/// processed by a send hook.
pub fn is_tagged(message: &Message) -> bool {
    ALL.iter().any(|header| message.has_property(header))
}

/// True if the message carries both the IV and the key name, which is what
/// the receive hook needs to decrypt it.
pub fn is_encrypted(message: &Message) -> bool {
    message.has_property(IV) && message.has_property(KEY_NAME)
}

/// Remove every envelope header from the message.
pub fn strip(message: &mut Message) {
    for header in ALL {
        message.remove_property(header);
    }
}
