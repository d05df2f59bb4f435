//! Chat producer errors.

/// Failure of a [`ChatProducer`](crate::producer::ChatProducer).
///
/// The canned producer never fails; these exist for real generation
/// pipelines plugged in behind the same interface.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ProducerError {
    /// The producer could not start (backend down, not configured).
    #[error("producer unavailable: {0}")]
    Unavailable(String),
    /// Generation failed after the stream started.
    #[error("generation failed: {0}")]
    Generation(String),
}

impl ProducerError {
    /// Short classification string for logging/metrics.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Generation(_) => "generation",
        }
    }
}
