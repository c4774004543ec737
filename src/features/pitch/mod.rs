//! Pitch estimation modules
//!
//! Per-frame fundamental frequency estimation:
//! - YIN detector with a reusable scratch buffer
//! - Pitch estimate type shared with chroma accumulation

pub mod yin;

pub use yin::YinDetector;

/// Result of pitch estimation on one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchEstimate {
    /// A period was found
    Voiced {
        /// Fundamental frequency in Hz
        frequency: f32,
        /// Interpolated lag in samples
        lag: f32,
        /// Voicing probability (0.0-1.0)
        probability: f32,
    },
    /// No lag fell below the threshold
    Unvoiced,
}

impl PitchEstimate {
    /// Frequency in Hz, if voiced
    pub fn frequency(&self) -> Option<f32> {
        match self {
            PitchEstimate::Voiced { frequency, .. } => Some(*frequency),
            PitchEstimate::Unvoiced => None,
        }
    }

    /// Voicing probability (0.0 for unvoiced frames)
    pub fn probability(&self) -> f32 {
        match self {
            PitchEstimate::Voiced { probability, .. } => *probability,
            PitchEstimate::Unvoiced => 0.0,
        }
    }

    /// True if a pitch was found
    pub fn is_voiced(&self) -> bool {
        matches!(self, PitchEstimate::Voiced { .. })
    }
}
