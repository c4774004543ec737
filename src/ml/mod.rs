//! Key classification
//!
//! The classifier is injected by the caller. Any trained model that maps the
//! 23-value feature vector (batch 1, width 23, depth 1) to 24 raw key scores
//! can implement [`Classifier`]; [`TemplateClassifier`] is a model-free
//! reference implementation.

pub mod template_classifier;

pub use template_classifier::TemplateClassifier;

use crate::error::AnalysisError;
use crate::features::chroma::FeatureVector;

/// Maps a feature vector to one raw score per key
///
/// Scores are in classifier output order: C..B major, then Cm..Bm. They need
/// not be normalized; ranking applies a softmax regardless.
pub trait Classifier: Send + Sync {
    /// Score the 24 keys
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InferenceError` if the model cannot run
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f32>, AnalysisError>;
}

impl<F> Classifier for F
where
    F: Fn(&FeatureVector) -> Result<Vec<f32>, AnalysisError> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f32>, AnalysisError> {
        self(features)
    }
}
