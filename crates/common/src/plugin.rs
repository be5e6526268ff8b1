//! Send / receive lifecycle implemented by message plugins.
//!
//! The hosting bus client invokes [`MessagePlugin::before_send`] on every
//! outgoing message and [`MessagePlugin::after_receive`] on every incoming
//! one, on whatever task it is already running. Plugins never spawn work of
//! their own.

use {async_trait::async_trait, std::error::Error as StdError};

use crate::message::Message;

/// Trait implemented by every busvault plugin.
///
/// Both hooks default to leaving the message untouched, so a plugin only
/// overrides the direction it cares about.
#[async_trait]
pub trait MessagePlugin: Send + Sync {
    /// Error surfaced to the host when a hook aborts message processing.
    type Error: StdError + Send + Sync + 'static;

    /// A stable, human-readable name for this plugin.
    fn name(&self) -> &str;

    /// Called before a message is handed to the broker.
    async fn before_send(&self, message: &mut Message) -> Result<(), Self::Error> {
        let _ = message;
        Ok(())
    }

    /// Called after a message is read from the broker, before the
    /// application sees it.
    async fn after_receive(&self, message: &mut Message) -> Result<(), Self::Error> {
        let _ = message;
        Ok(())
    }
}
