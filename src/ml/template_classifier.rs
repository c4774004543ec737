//! Template-matching classifier
//!
//! Scores each key by the correlation between the feature vector's twelve
//! pitch-class values and that key's Krumhansl-Kessler profile. Both sides are
//! mean-centered and unit-norm, so each score is a Pearson correlation in
//! [-1, 1], multiplied by a temperature before ranking.

use super::Classifier;
use crate::analysis::result::{ALL_KEYS, KEY_COUNT};
use crate::error::AnalysisError;
use crate::features::chroma::{FeatureVector, PITCH_CLASSES};
use crate::features::key::KeyTemplates;

/// Default score multiplier; sharpens the softmax over correlations
pub const DEFAULT_TEMPERATURE: f32 = 10.0;

/// Classifier that correlates the profile with 24 key templates
#[derive(Debug, Clone)]
pub struct TemplateClassifier {
    templates: Vec<[f32; PITCH_CLASSES]>,
    temperature: f32,
}

impl TemplateClassifier {
    /// Krumhansl-Kessler templates with the default temperature
    pub fn new() -> Self {
        Self::with_templates(&KeyTemplates::new(), DEFAULT_TEMPERATURE)
    }

    /// Build from explicit templates
    pub fn with_templates(templates: &KeyTemplates, temperature: f32) -> Self {
        let templates = ALL_KEYS
            .iter()
            .map(|&key| center_and_scale(templates.get(key)))
            .collect();
        Self {
            templates,
            temperature,
        }
    }

    /// Score multiplier
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl Default for TemplateClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for TemplateClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f32>, AnalysisError> {
        let profile = features.pitch_classes();
        let scores: Vec<f32> = self
            .templates
            .iter()
            .map(|t| dot_product(profile, t) * self.temperature)
            .collect();

        debug_assert_eq!(scores.len(), KEY_COUNT);
        log::debug!("Template scores computed for {} keys", scores.len());
        Ok(scores)
    }
}

/// Subtract the mean and scale to unit Euclidean norm
fn center_and_scale(template: &[f32; PITCH_CLASSES]) -> [f32; PITCH_CLASSES] {
    let mean = template.iter().sum::<f32>() / PITCH_CLASSES as f32;
    let mut out = [0.0; PITCH_CLASSES];
    for (o, &v) in out.iter_mut().zip(template) {
        *o = v - mean;
    }
    let norm = out.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for o in &mut out {
            *o /= norm;
        }
    }
    out
}

/// Compute dot product between two vectors.
fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::Key;
    use crate::features::chroma::{build_feature_vector, normalize, ChromaHistogram};

    fn features_from_counts(counts: [u32; 12]) -> FeatureVector {
        build_feature_vector(&normalize(&ChromaHistogram::from_counts(counts)).unwrap())
    }

    fn best_key(scores: &[f32]) -> Key {
        let best = (0..scores.len())
            .max_by(|&a, &b| scores[a].total_cmp(&scores[b]))
            .unwrap();
        Key::from_index(best).unwrap()
    }

    #[test]
    fn test_scores_shape() {
        let classifier = TemplateClassifier::new();
        let features = features_from_counts([5, 0, 3, 0, 4, 3, 0, 5, 0, 3, 0, 2]);
        let scores = classifier.predict(&features).unwrap();
        assert_eq!(scores.len(), 24);
        for s in &scores {
            assert!(s.abs() <= classifier.temperature() + 1e-4);
        }
    }

    #[test]
    fn test_flat_profile_scores_zero() {
        let classifier = TemplateClassifier::new();
        let features = features_from_counts([7; 12]);
        let scores = classifier.predict(&features).unwrap();
        assert_eq!(scores.len(), KEY_COUNT);
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_c_major_scale_profile() {
        // Weighted like a tune in C major: tonic and dominant heavy, diatonic only
        let features = features_from_counts([12, 0, 6, 0, 8, 7, 0, 10, 0, 6, 0, 4]);
        let scores = TemplateClassifier::new().predict(&features).unwrap();
        assert_eq!(best_key(&scores), Key::Major(0));
    }

    #[test]
    fn test_a_minor_profile() {
        // A, C, E heavy with G# leading tone
        let features = features_from_counts([8, 0, 5, 0, 8, 5, 0, 3, 4, 12, 0, 4]);
        let scores = TemplateClassifier::new().predict(&features).unwrap();
        assert_eq!(best_key(&scores), Key::Minor(9));
    }

    #[test]
    fn test_perfect_template_scores_temperature() {
        let templates = KeyTemplates::new();
        let classifier = TemplateClassifier::with_templates(&templates, 1.0);
        // Feed the D major template itself as counts (scaled to integers)
        let d_major = templates.get(Key::Major(2));
        let mut counts = [0u32; 12];
        for (c, &v) in counts.iter_mut().zip(d_major) {
            *c = (v * 100.0).round() as u32;
        }
        let scores = classifier.predict(&features_from_counts(counts)).unwrap();
        assert!((scores[Key::Major(2).index()] - 1.0).abs() < 1e-3);
    }
}
