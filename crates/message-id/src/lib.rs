//! Message id assignment for outgoing messages.
//!
//! ```rust,ignore
//! let plugin = MessageIdPlugin::uuid();
//! plugin.before_send(&mut message).await?;
//! ```
//!
//! An id that is already set is never replaced.

pub mod error;
pub mod plugin;

pub use {
    error::MessageIdError,
    plugin::{IdGenerator, MessageIdPlugin},
};
