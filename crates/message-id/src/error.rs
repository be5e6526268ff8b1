/// Errors produced while assigning a message id.
#[derive(Debug, thiserror::Error)]
pub enum MessageIdError {
    /// The configured generator returned an error.
    #[error("message id generator failed")]
    Generator(#[source] anyhow::Error),

    /// The configured generator returned a blank id.
    #[error("message id generator returned an empty id")]
    EmptyId,
}
