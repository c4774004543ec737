//! Chroma extraction modules
//!
//! Collapse per-frame pitch estimates into a 12-bin pitch-class profile:
//! - Pitch-class accumulation (histogram of in-tune frames)
//! - Profile extraction over a whole sample buffer
//! - Normalization and classifier feature expansion

pub mod accumulator;
pub mod extractor;
pub mod normalization;

pub use accumulator::{pitch_class, ChromaAccumulator};
pub use extractor::{extract_profile, ChromaExtraction, FrameStats};
pub use normalization::{build_feature_vector, normalize};

use serde::{Deserialize, Serialize};

/// Number of pitch classes (C through B)
pub const PITCH_CLASSES: usize = 12;

/// Number of leading profile values repeated after the twelfth
pub const WRAP_LEN: usize = 11;

/// Length of the classifier feature vector
pub const FEATURE_LEN: usize = PITCH_CLASSES + WRAP_LEN;

/// Pitch class names, index 0 = C
pub const PITCH_CLASS_NAMES: [&str; PITCH_CLASSES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Count of in-tune frames per pitch class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromaHistogram {
    counts: [u32; PITCH_CLASSES],
}

impl ChromaHistogram {
    /// Empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Histogram with the given counts
    pub fn from_counts(counts: [u32; PITCH_CLASSES]) -> Self {
        Self { counts }
    }

    /// Counts per pitch class, index 0 = C
    pub fn counts(&self) -> &[u32; PITCH_CLASSES] {
        &self.counts
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Add one frame to `pitch_class` (taken modulo 12)
    pub fn increment(&mut self, pitch_class: usize) {
        let slot = &mut self.counts[pitch_class % PITCH_CLASSES];
        *slot = slot.saturating_add(1);
    }
}

/// Histogram scaled to sum to 1.0
///
/// Only produced by [`normalize`], which refuses an empty histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    values: [f32; PITCH_CLASSES],
}

impl NormalizedProfile {
    /// Relative weight per pitch class, index 0 = C
    pub fn values(&self) -> &[f32; PITCH_CLASSES] {
        &self.values
    }

    /// Index of the heaviest pitch class (lowest index on ties)
    pub fn dominant_pitch_class(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if v > self.values[best] {
                best = i;
            }
        }
        best
    }
}

/// Classifier input: centered, unit-norm profile followed by its first 11 values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f32; FEATURE_LEN],
}

impl FeatureVector {
    /// Feature values in classifier order
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Tensor shape expected by the classifier: batch, width, depth
    pub fn shape(&self) -> [usize; 3] {
        [1, FEATURE_LEN, 1]
    }

    /// The twelve transformed pitch-class values, without the wrap-around
    pub fn pitch_classes(&self) -> &[f32] {
        &self.values[..PITCH_CLASSES]
    }
}
