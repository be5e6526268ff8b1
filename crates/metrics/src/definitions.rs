//! Metric name and label definitions.
//!
//! Every metric recorded by busvault plugins is named here so the exported
//! set stays consistent and documented in one place.

/// Key Vault encryption plugin metrics
pub mod keyvault {
    /// Outgoing messages whose body was encrypted
    pub const MESSAGES_ENCRYPTED_TOTAL: &str = "busvault_keyvault_messages_encrypted_total";
    /// Incoming messages whose body was decrypted
    pub const MESSAGES_DECRYPTED_TOTAL: &str = "busvault_keyvault_messages_decrypted_total";
    /// Messages passed through untouched (labels: direction)
    pub const MESSAGES_PASSED_THROUGH_TOTAL: &str =
        "busvault_keyvault_messages_passed_through_total";
    /// Send hooks that failed
    pub const ENCRYPTION_FAILURES_TOTAL: &str = "busvault_keyvault_encryption_failures_total";
    /// Receive hooks that failed
    pub const DECRYPTION_FAILURES_TOTAL: &str = "busvault_keyvault_decryption_failures_total";
    /// Derived-key lookups served from the cache
    pub const KEY_CACHE_HITS_TOTAL: &str = "busvault_keyvault_key_cache_hits_total";
    /// Derived-key lookups that required a secret fetch
    pub const KEY_CACHE_MISSES_TOTAL: &str = "busvault_keyvault_key_cache_misses_total";
    /// Number of derived keys currently cached
    pub const KEY_CACHE_ENTRIES: &str = "busvault_keyvault_key_cache_entries";
    /// Secret fetch failures (including timeouts)
    pub const SECRET_FETCH_FAILURES_TOTAL: &str = "busvault_keyvault_secret_fetch_failures_total";
    /// Secret fetch duration in seconds
    pub const SECRET_FETCH_DURATION_SECONDS: &str =
        "busvault_keyvault_secret_fetch_duration_seconds";
}

/// Message id plugin metrics
pub mod message_id {
    /// Message ids assigned to outgoing messages
    pub const ASSIGNED_TOTAL: &str = "busvault_message_id_assigned_total";
    /// Messages that already carried an id
    pub const PRESERVED_TOTAL: &str = "busvault_message_id_preserved_total";
    /// Generator failures
    pub const GENERATOR_FAILURES_TOTAL: &str = "busvault_message_id_generator_failures_total";
}

/// Common label keys
pub mod labels {
    pub const DIRECTION: &str = "direction";
    pub const ERROR_TYPE: &str = "error_type";
}

/// Standard histogram buckets for different metric types
pub mod buckets {
    use once_cell::sync::Lazy;

    /// Remote secret fetch buckets (in seconds)
    /// Covers 5ms to 60s
    pub static SECRET_FETCH: Lazy<Vec<f64>> = Lazy::new(|| {
        vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]
    });
}
