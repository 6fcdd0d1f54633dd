/// Error returned when a record could not be turned into an output line.
///
/// Rendering itself only fails when the attribute set cannot be serialized;
/// the second variant covers the single write to the sink.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("failed to serialize log fields: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write log line: {0}")]
    Write(#[from] std::io::Error),
}

/// Error type returned by [`crate::init::init`] and friends.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("a global tracing subscriber was already installed by another component")]
    ForeignSubscriber,
}
