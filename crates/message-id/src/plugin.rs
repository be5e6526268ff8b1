use {
    async_trait::async_trait,
    busvault_common::{Message, MessagePlugin},
    std::{fmt, sync::Arc},
    tracing::{debug, warn},
};

#[cfg(feature = "metrics")]
use busvault_metrics::{counter, message_id as message_id_metrics};

use crate::error::MessageIdError;

/// Produces an id for a message that has none.
pub type IdGenerator = Arc<dyn Fn(&Message) -> anyhow::Result<String> + Send + Sync>;

/// Assigns a message id to outgoing messages that do not carry one.
#[derive(Clone)]
pub struct MessageIdPlugin {
    generator: IdGenerator,
}

impl MessageIdPlugin {
    pub fn new<F>(generator: F) -> Self
    where
        F: Fn(&Message) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            generator: Arc::new(generator),
        }
    }

    /// Random v4 UUIDs rendered as 32 hex digits without hyphens.
    pub fn uuid() -> Self {
        Self::new(|_| Ok(uuid::Uuid::new_v4().simple().to_string()))
    }

    /// Set `message.message_id` unless it is already present and non-empty.
    pub fn assign(&self, message: &mut Message) -> Result<(), MessageIdError> {
        if message.message_id.as_deref().is_some_and(|id| !id.is_empty()) {
            #[cfg(feature = "metrics")]
            counter!(message_id_metrics::PRESERVED_TOTAL).increment(1);
            return Ok(());
        }

        let id = (self.generator)(message).map_err(|e| {
            warn!(error = %e, "message id generator failed");
            #[cfg(feature = "metrics")]
            counter!(message_id_metrics::GENERATOR_FAILURES_TOTAL).increment(1);
            MessageIdError::Generator(e)
        })?;
        if id.trim().is_empty() {
            return Err(MessageIdError::EmptyId);
        }

        debug!(message_id = %id, "message id assigned");
        #[cfg(feature = "metrics")]
        counter!(message_id_metrics::ASSIGNED_TOTAL).increment(1);

        message.message_id = Some(id);
        Ok(())
    }
}

impl fmt::Debug for MessageIdPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageIdPlugin").finish_non_exhaustive()
    }
}

#[async_trait]
impl MessagePlugin for MessageIdPlugin {
    type Error = MessageIdError;

    fn name(&self) -> &str {
        "busvault.message-id"
    }

    async fn before_send(&self, message: &mut Message) -> Result<(), MessageIdError> {
        self.assign(message)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        std::{error::Error as _, sync::atomic::{AtomicUsize, Ordering}},
    };

    #[tokio::test]
    async fn assigns_id_when_missing() {
        let plugin = MessageIdPlugin::new(|_| Ok("id-1".to_string()));
        let mut msg = Message::new("body");
        plugin.before_send(&mut msg).await.unwrap();
        assert_eq!(msg.message_id.as_deref(), Some("id-1"));
    }

    #[tokio::test]
    async fn existing_id_is_preserved() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let plugin = MessageIdPlugin::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("generated".to_string())
        });

        let mut msg = Message::new("body").with_message_id("original");
        plugin.before_send(&mut msg).await.unwrap();
        assert_eq!(msg.message_id.as_deref(), Some("original"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_existing_id_is_replaced() {
        let plugin = MessageIdPlugin::new(|_| Ok("fresh".to_string()));
        let mut msg = Message::new("body").with_message_id("");
        plugin.before_send(&mut msg).await.unwrap();
        assert_eq!(msg.message_id.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn generator_sees_the_message() {
        let plugin = MessageIdPlugin::new(|msg| {
            Ok(format!(
                "order-{}",
                msg.property("order").unwrap_or("unknown")
            ))
        });
        let mut msg = Message::new("body").with_property("order", "42");
        plugin.before_send(&mut msg).await.unwrap();
        assert_eq!(msg.message_id.as_deref(), Some("order-42"));
    }

    #[tokio::test]
    async fn generator_failure_is_wrapped() {
        let plugin = MessageIdPlugin::new(|_| anyhow::bail!("sequence exhausted"));
        let mut msg = Message::new("body");

        let err = plugin.before_send(&mut msg).await.unwrap_err();
        assert!(matches!(err, MessageIdError::Generator(_)));
        assert_eq!(err.source().unwrap().to_string(), "sequence exhausted");
        assert!(msg.message_id.is_none());
    }

    #[tokio::test]
    async fn blank_generated_id_is_rejected() {
        let plugin = MessageIdPlugin::new(|_| Ok("   ".to_string()));
        let mut msg = Message::new("body");
        let err = plugin.before_send(&mut msg).await.unwrap_err();
        assert!(matches!(err, MessageIdError::EmptyId));
        assert!(msg.message_id.is_none());
    }

    #[tokio::test]
    async fn uuid_ids_are_unique_and_unhyphenated() {
        let plugin = MessageIdPlugin::uuid();
        let mut a = Message::new("a");
        let mut b = Message::new("b");
        plugin.before_send(&mut a).await.unwrap();
        plugin.before_send(&mut b).await.unwrap();

        let a = a.message_id.unwrap();
        assert_eq!(a.len(), 32);
        assert!(!a.contains('-'));
        assert_ne!(Some(a), b.message_id);
    }

    #[tokio::test]
    async fn receive_is_pass_through() {
        let plugin = MessageIdPlugin::uuid();
        assert_eq!(plugin.name(), "busvault.message-id");
        let mut msg = Message::new("body");
        plugin.after_receive(&mut msg).await.unwrap();
        assert!(msg.message_id.is_none());
    }
}
