//! Error types for SentiScope

/// Result type alias using SentiScope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SentiScope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Text scorer construction or execution errors
    #[error("analyzer error: {0}")]
    Analyzer(String),

    /// Emotion classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Image decoding or preprocessing errors
    #[error("image error: {0}")]
    Image(String),

    /// Tabular input that could not be read
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Tabular input without a required column
    #[error("CSV must contain a '{0}' column")]
    MissingColumn(String),

    /// A model handle that failed to load at startup
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new analyzer error
    pub fn analyzer(msg: impl Into<String>) -> Self {
        Self::Analyzer(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new image error
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a new missing-column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// Create a new model-unavailable error
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingColumn(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = Error::missing_column("text");
        assert_eq!(err.to_string(), "CSV must contain a 'text' column");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_processing_errors_are_not_client_errors() {
        assert!(!Error::classifier("boom").is_client_error());
        assert!(!Error::dataset("bad quote").is_client_error());
    }
}
