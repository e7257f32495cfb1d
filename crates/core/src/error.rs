#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
