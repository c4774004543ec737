//! Error types for key estimation

use std::fmt;

/// Errors that can occur during key estimation
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio could not be decoded (malformed or unsupported container/codec)
    DecodingError(String),

    /// Classifier inference failed (model not ready, shape mismatch, bad output)
    InferenceError(String),

    /// Nothing to normalize: no frame was counted, or the top-3 probabilities sum to zero
    DegenerateProfile(String),

    /// Numerical error (overflow, non-finite intermediate, etc.)
    NumericalError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::InferenceError(msg) => write!(f, "Inference error: {}", msg),
            AnalysisError::DegenerateProfile(msg) => write!(f, "Degenerate profile: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::DecodingError(format!("I/O failure: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AnalysisError::DegenerateProfile("empty histogram".to_string());
        assert_eq!(err.to_string(), "Degenerate profile: empty histogram");

        let err = AnalysisError::InferenceError("bad shape".to_string());
        assert_eq!(err.to_string(), "Inference error: bad shape");
    }

    #[test]
    fn test_io_error_maps_to_decoding() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.wav");
        let err: AnalysisError = io.into();
        assert!(matches!(err, AnalysisError::DecodingError(_)));
    }
}
