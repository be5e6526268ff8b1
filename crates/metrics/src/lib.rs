//! Metrics collection and export for busvault.
//!
//! Plugins record through the `metrics` crate facade using the names in
//! [`definitions`]. Nothing is recorded anywhere until the host installs a
//! recorder; with the `prometheus` feature, [`init_metrics`] installs a
//! Prometheus recorder whose text output is available from
//! [`MetricsHandle::render`].
//!
//! ```rust,ignore
//! use busvault_metrics::{counter, keyvault};
//!
//! counter!(keyvault::MESSAGES_ENCRYPTED_TOTAL).increment(1);
//! ```

mod definitions;
mod recorder;

pub use {
    definitions::*,
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
