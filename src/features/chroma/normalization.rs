//! Profile normalization and classifier feature expansion

use super::{ChromaHistogram, FeatureVector, NormalizedProfile, FEATURE_LEN, PITCH_CLASSES, WRAP_LEN};
use crate::error::AnalysisError;

/// Norms at or below this are treated as a flat profile
const EPSILON: f32 = 1e-6;

/// Divide every count by the total so the profile sums to 1.0
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateProfile` if the histogram is empty
pub fn normalize(histogram: &ChromaHistogram) -> Result<NormalizedProfile, AnalysisError> {
    let total = histogram.total();
    if total == 0 {
        return Err(AnalysisError::DegenerateProfile(
            "No frame landed on a pitch class; nothing to normalize".to_string(),
        ));
    }

    let total = total as f64;
    let mut values = [0.0f32; PITCH_CLASSES];
    for (v, &count) in values.iter_mut().zip(histogram.counts()) {
        *v = (count as f64 / total) as f32;
    }

    Ok(NormalizedProfile { values })
}

/// Expand a profile into the 23-value classifier input
///
/// 1. Subtract the mean of the 12 values
/// 2. Divide by the Euclidean norm of the centered values
/// 3. Append the first 11 values so B wraps around to C
///
/// A flat profile has a zero norm after centering; it is left as all zeros.
pub fn build_feature_vector(profile: &NormalizedProfile) -> FeatureVector {
    let input = profile.values();
    let mean = input.iter().sum::<f32>() / PITCH_CLASSES as f32;

    let mut centered = [0.0f32; PITCH_CLASSES];
    for (c, &v) in centered.iter_mut().zip(input) {
        *c = v - mean;
    }

    let norm = centered.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > EPSILON {
        for c in &mut centered {
            *c /= norm;
        }
    } else {
        log::warn!("Flat pitch-class profile (norm {:.2e}), feature vector is all zeros", norm);
        centered = [0.0; PITCH_CLASSES];
    }

    let mut values = [0.0f32; FEATURE_LEN];
    values[..PITCH_CLASSES].copy_from_slice(&centered);
    values[PITCH_CLASSES..].copy_from_slice(&centered[..WRAP_LEN]);

    FeatureVector { values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sums_to_one() {
        let histogram = ChromaHistogram::from_counts([5, 0, 3, 0, 7, 2, 0, 9, 0, 4, 0, 1]);
        let profile = normalize(&histogram).unwrap();
        let sum: f32 = profile.values().iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "sum was {}", sum);
        assert!((profile.values()[7] - 9.0 / 31.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_empty_is_degenerate() {
        let result = normalize(&ChromaHistogram::new());
        assert!(matches!(result, Err(AnalysisError::DegenerateProfile(_))));
    }

    #[test]
    fn test_feature_vector_wraps() {
        let histogram = ChromaHistogram::from_counts([10, 1, 6, 1, 8, 7, 1, 9, 1, 6, 1, 5]);
        let features = build_feature_vector(&normalize(&histogram).unwrap());
        let v = features.as_slice();

        assert_eq!(v.len(), FEATURE_LEN);
        for i in 0..WRAP_LEN {
            assert_eq!(v[i], v[PITCH_CLASSES + i]);
        }
        assert_eq!(features.shape(), [1, 23, 1]);
    }

    #[test]
    fn test_feature_vector_centered_unit_norm() {
        let histogram = ChromaHistogram::from_counts([3, 0, 1, 0, 2, 1, 0, 3, 0, 1, 0, 1]);
        let features = build_feature_vector(&normalize(&histogram).unwrap());
        let head = features.pitch_classes();

        let mean: f32 = head.iter().sum::<f32>() / 12.0;
        let norm: f32 = head.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!(mean.abs() < 1e-6);
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_feature_vector_single_class() {
        let mut counts = [0u32; 12];
        counts[9] = 4;
        let features = build_feature_vector(&normalize(&ChromaHistogram::from_counts(counts)).unwrap());
        let v = features.as_slice();

        // Centered one-hot: 11/12 vs -1/12, normalized by sqrt(11/12)
        let expected_peak = (11.0f32 / 12.0).sqrt();
        assert!((v[9] - expected_peak).abs() < 1e-5);
        assert!(v[0] < 0.0);
        assert_eq!(v[0], v[12]);
    }

    #[test]
    fn test_flat_profile_is_zero_vector() {
        let features = build_feature_vector(&normalize(&ChromaHistogram::from_counts([2; 12])).unwrap());
        assert!(features.as_slice().iter().all(|&x| x == 0.0));
    }
}
