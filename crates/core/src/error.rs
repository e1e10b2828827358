/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// Configuration rejected at the boundary before it can reach the
    /// engine (zero-length sequence, empty value range, out-of-range
    /// delay, malformed preset file).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A sort run is already active for the controller's sequence.
    #[error("a sort run is already active")]
    RunActive,
    /// Generic message for internal faults such as a poisoned lock or a
    /// panicked worker.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl SortVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for SortVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SortVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
