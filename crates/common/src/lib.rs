//! Shared types used across all busvault crates.
//!
//! [`Message`] is the message-bus payload handed to plugins and
//! [`MessagePlugin`] is the send / receive lifecycle that every plugin
//! implements.

pub mod message;
pub mod plugin;

pub use {message::Message, plugin::MessagePlugin};
