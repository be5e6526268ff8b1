//! Message-bus payload model.

use {
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

/// A message travelling through the bus.
///
/// The hosting client owns the message. Plugins receive it by mutable
/// reference and rewrite the body and user properties in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Broker-level identifier. `None` until a sender or plugin assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Opaque payload bytes.
    #[serde(default)]
    pub body: Vec<u8>,
    /// Application headers carried alongside the body.
    #[serde(default)]
    pub user_properties: HashMap<String, String>,
}

impl Message {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_properties.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a user property, if present.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.user_properties.get(name).map(String::as_str)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.user_properties.contains_key(name)
    }

    /// Insert or overwrite a user property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.user_properties.insert(name.into(), value.into());
    }

    /// Remove a user property, returning its previous value.
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        self.user_properties.remove(name)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_has_no_headers() {
        let msg = Message::new(b"hello".to_vec());
        assert_eq!(msg.body, b"hello");
        assert!(msg.message_id.is_none());
        assert!(msg.user_properties.is_empty());
    }

    #[test]
    fn property_accessors() {
        let mut msg = Message::new("payload").with_property("a", "1");
        assert!(msg.has_property("a"));
        assert_eq!(msg.property("a"), Some("1"));

        msg.set_property("a", "2");
        assert_eq!(msg.property("a"), Some("2"));

        assert_eq!(msg.remove_property("a").as_deref(), Some("2"));
        assert!(!msg.has_property("a"));
        assert!(msg.remove_property("a").is_none());
    }

    #[test]
    fn serde_skips_missing_message_id() {
        let msg = Message::new("x").with_property("k", "v");
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("message_id").is_none());

        let parsed: Message = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, msg);
    }
}
