//! Classifier score ranking
//!
//! Raw scores for the 24 keys go through a softmax, are ordered by descending
//! probability and cut to the top three, which are renormalized to sum to 1.0.
//!
//! Ties are broken by classifier output index (lower index first). The order
//! is defined by the comparator itself and does not depend on sort stability.

use std::cmp::Ordering;

use super::result::{Key, Prediction, RankedResult, KEY_COUNT, TOP_N};
use crate::error::AnalysisError;

/// Exponential normalization of `scores` into a probability distribution
///
/// The maximum score is subtracted first so large scores cannot overflow.
/// Returns an empty vector for empty input.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Rank raw classifier scores into the top three keys
///
/// # Arguments
///
/// * `raw_scores` - 24 scores: C..B major, then Cm..Bm
///
/// # Errors
///
/// - `AnalysisError::InferenceError` if there are not exactly 24 scores or any is not finite
/// - `AnalysisError::DegenerateProfile` if the top three probabilities sum to zero
///
/// # Example
///
/// ```
/// use pcp_key::analysis::ranking::rank_predictions;
///
/// let mut scores = vec![0.0f32; 24];
/// scores[21] = 8.0; // Am
/// let ranked = rank_predictions(&scores)?;
/// assert_eq!(ranked.best().label(), "Am");
/// # Ok::<(), pcp_key::AnalysisError>(())
/// ```
pub fn rank_predictions(raw_scores: &[f32]) -> Result<RankedResult, AnalysisError> {
    if raw_scores.len() != KEY_COUNT {
        return Err(AnalysisError::InferenceError(format!(
            "Classifier returned {} scores, expected {}",
            raw_scores.len(),
            KEY_COUNT
        )));
    }
    if let Some(i) = raw_scores.iter().position(|s| !s.is_finite()) {
        return Err(AnalysisError::InferenceError(format!(
            "Classifier score {} is not finite ({})",
            i, raw_scores[i]
        )));
    }

    let probabilities = softmax(raw_scores);
    rank_probabilities(&probabilities)
}

/// Rank an already normalized distribution over the 24 keys
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` if there are not exactly 24 probabilities
/// - `AnalysisError::DegenerateProfile` if the top three sum to zero (or to a non-finite value)
pub fn rank_probabilities(probabilities: &[f32]) -> Result<RankedResult, AnalysisError> {
    if probabilities.len() != KEY_COUNT {
        return Err(AnalysisError::InvalidInput(format!(
            "Expected {} probabilities, got {}",
            KEY_COUNT,
            probabilities.len()
        )));
    }

    let mut order: Vec<usize> = (0..KEY_COUNT).collect();
    order.sort_by(|&a, &b| by_probability_then_index(probabilities, a, b));

    let top = &order[..TOP_N];
    let top_sum: f32 = top.iter().map(|&i| probabilities[i]).sum();
    if !(top_sum > 0.0 && top_sum.is_finite()) {
        return Err(AnalysisError::DegenerateProfile(format!(
            "Top {} probabilities sum to {}; cannot renormalize",
            TOP_N, top_sum
        )));
    }

    let mut predictions = [Prediction {
        key: Key::Major(0),
        probability: 0.0,
    }; TOP_N];
    for (slot, &index) in predictions.iter_mut().zip(top) {
        *slot = Prediction {
            key: Key::from_index(index).ok_or_else(|| {
                AnalysisError::NumericalError(format!("Key index {} out of range", index))
            })?,
            probability: probabilities[index] / top_sum,
        };
    }

    log::debug!(
        "Ranked keys: {} ({:.3}), {} ({:.3}), {} ({:.3})",
        predictions[0].label(),
        predictions[0].probability,
        predictions[1].label(),
        predictions[1].probability,
        predictions[2].label(),
        predictions[2].probability
    );

    Ok(RankedResult::new(predictions))
}

/// Descending probability, ascending index on ties
fn by_probability_then_index(probabilities: &[f32], a: usize, b: usize) -> Ordering {
    probabilities[b]
        .total_cmp(&probabilities[a])
        .then_with(|| a.cmp(&b))
}
