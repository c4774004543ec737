//! Pitch-class profile extraction
//!
//! Runs the frame segmenter, the YIN detector and the accumulator over a whole
//! buffer, strictly in frame order, then normalizes the histogram once.

use serde::{Deserialize, Serialize};

use super::accumulator::ChromaAccumulator;
use super::normalization::normalize;
use super::{ChromaHistogram, NormalizedProfile};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::pitch::YinDetector;
use crate::io::sample_buffer::Frames;

/// Per-run frame statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Frames passed to the pitch detector
    pub analyzed: usize,
    /// Frames with a detected pitch
    pub voiced: usize,
    /// Voiced frames close enough to a semitone to be counted
    pub counted: usize,
}

/// Output of [`extract_profile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromaExtraction {
    /// Raw counts, kept for display
    pub histogram: ChromaHistogram,
    /// Counts divided by their total
    pub profile: NormalizedProfile,
    /// Frame statistics
    pub stats: FrameStats,
}

/// Extract the normalized pitch-class profile of a mono signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Frame size, hop size, YIN threshold and tuning parameters
///
/// # Returns
///
/// Raw histogram, normalized profile and frame statistics
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` for an empty signal, a zero sample rate or an invalid config
/// - `AnalysisError::DegenerateProfile` if no frame was counted (silence, noise,
///   atonal material, or audio shorter than one frame)
///
/// # Example
///
/// ```no_run
/// use pcp_key::features::chroma::extract_profile;
/// use pcp_key::AnalysisConfig;
///
/// let samples: Vec<f32> = (0..44100)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
///     .collect();
/// let extraction = extract_profile(&samples, 44100, &AnalysisConfig::default())?;
/// assert_eq!(extraction.profile.dominant_pitch_class(), 9); // A
/// # Ok::<(), pcp_key::AnalysisError>(())
/// ```
pub fn extract_profile(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<ChromaExtraction, AnalysisError> {
    config.validate()?;

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    let frames = Frames::new(samples, config.frame_size, config.hop_size)?;
    let frame_count = frames.frame_count();

    log::debug!(
        "Extracting pitch-class profile: {} samples at {} Hz, frame={}, hop={}, {} frames",
        samples.len(),
        sample_rate,
        config.frame_size,
        config.hop_size,
        frame_count
    );

    if frame_count == 0 {
        log::warn!(
            "Frame size ({}) larger than audio length ({}), no frames to analyze",
            config.frame_size,
            samples.len()
        );
    }

    let mut detector = YinDetector::new(config.frame_size, config.yin_threshold)?;
    let mut accumulator = ChromaAccumulator::new(config.reference_frequency, config.tuning_tolerance);
    let mut analyzed = 0usize;

    for frame in frames {
        let estimate = detector.estimate_pitch(frame, sample_rate)?;
        accumulator.accumulate(&estimate);
        analyzed += 1;
    }

    let stats = FrameStats {
        analyzed,
        voiced: accumulator.voiced_frames(),
        counted: accumulator.counted_frames(),
    };

    log::debug!(
        "Frames: {} analyzed, {} voiced, {} counted",
        stats.analyzed,
        stats.voiced,
        stats.counted
    );

    let histogram = accumulator.into_histogram();
    let profile = normalize(&histogram)?;

    Ok(ChromaExtraction {
        histogram,
        profile,
        stats,
    })
}
