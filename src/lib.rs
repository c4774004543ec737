//! # pcp-key
//!
//! Musical key estimation from pitch-class profiles.
//!
//! ## Features
//!
//! - **Pitch Estimation**: YIN on overlapping 1024-sample frames
//! - **Pitch-Class Profile**: histogram of frames that land within a tenth of a semitone of a note
//! - **Classifier Input**: mean-centered, unit-norm profile extended to 23 values with B→C wrap-around
//! - **Ranking**: softmax over 24 key scores, top 3 renormalized
//!
//! ## Quick Start
//!
//! ```no_run
//! use pcp_key::{analyze_audio, AnalysisConfig, TemplateClassifier};
//!
//! // Load audio samples (mono, f32)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//!
//! let classifier = TemplateClassifier::new();
//! let result = analyze_audio(&samples, sample_rate, &classifier, &AnalysisConfig::default())?;
//!
//! for p in result.ranked.predictions() {
//!     println!("{}: {:.1}%", p.label(), p.probability * 100.0);
//! }
//! # Ok::<(), pcp_key::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Bytes → Decoder → Frames → YIN → Chroma histogram → Feature vector → Classifier → Top-3 keys
//! ```
//!
//! Decoding and classification are collaborators behind the [`AudioDecoder`]
//! and [`Classifier`] traits. Everything in between is synchronous and runs
//! one frame at a time; each call owns its own detector and histogram.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod ml;
pub mod preprocessing;

use std::path::Path;
use std::time::Instant;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::ranking::{rank_predictions, softmax};
pub use analysis::result::{Key, KeyAnalysis, Prediction, RankedResult};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::chroma::{
    build_feature_vector, extract_profile, normalize, ChromaExtraction, ChromaHistogram,
    FeatureVector, NormalizedProfile,
};
pub use features::pitch::{PitchEstimate, YinDetector};
pub use io::decoder::{AudioDecoder, SymphoniaDecoder};
pub use io::sample_buffer::SampleBuffer;
pub use ml::{Classifier, TemplateClassifier};
pub use preprocessing::channel_mixer::ChannelMixMode;

/// Main analysis function
///
/// Extracts the pitch-class profile of `samples`, builds the classifier input,
/// runs `classifier` and ranks its scores.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `classifier` - Key classifier (23 features in, 24 scores out)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `KeyAnalysis` with the top three keys, histogram, profile, features and metadata
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` for empty input, zero sample rate or invalid config
/// - `AnalysisError::DegenerateProfile` if no frame was counted or ranking cannot renormalize
/// - `AnalysisError::InferenceError` if the classifier fails or breaks its output contract
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    classifier: &dyn Classifier,
    config: &AnalysisConfig,
) -> Result<KeyAnalysis, AnalysisError> {
    let start_time = Instant::now();

    log::debug!("Starting key analysis: {} samples at {} Hz", samples.len(), sample_rate);

    let extraction = extract_profile(samples, sample_rate, config)?;
    let features = build_feature_vector(&extraction.profile);

    let raw_scores = classifier.predict(&features)?;
    let ranked = rank_predictions(&raw_scores)?;

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Key analysis finished: {} ({:.3}) in {:.2} ms",
        ranked.best().label(),
        ranked.best().probability,
        processing_time_ms
    );

    Ok(KeyAnalysis {
        ranked,
        histogram: extraction.histogram,
        profile: extraction.profile,
        features,
        metadata: AnalysisMetadata {
            duration_seconds: samples.len() as f32 / sample_rate as f32,
            sample_rate,
            frames: extraction.stats,
            processing_time_ms,
            ..AnalysisMetadata::default()
        },
    })
}

/// Decode `bytes` with `decoder` and analyze the result
///
/// # Errors
///
/// `AnalysisError::DecodingError` from the decoder, otherwise as [`analyze_audio`]
pub fn analyze_bytes(
    bytes: &[u8],
    decoder: &dyn AudioDecoder,
    classifier: &dyn Classifier,
    config: &AnalysisConfig,
) -> Result<KeyAnalysis, AnalysisError> {
    let buffer = decoder.decode(bytes)?;
    analyze_audio(buffer.samples(), buffer.sample_rate(), classifier, config)
}

/// Read, decode and analyze an audio file
///
/// Uses [`SymphoniaDecoder`] with the file extension as a format hint and
/// `config.channel_mix` for multichannel files.
///
/// # Errors
///
/// `AnalysisError::DecodingError` if the file cannot be read or decoded,
/// otherwise as [`analyze_audio`]
pub fn analyze_file(
    path: impl AsRef<Path>,
    classifier: &dyn Classifier,
    config: &AnalysisConfig,
) -> Result<KeyAnalysis, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Analyzing file: {}", path.display());

    let bytes = std::fs::read(path)?;
    let mut decoder = SymphoniaDecoder::new(config.channel_mix);
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        decoder = decoder.with_extension(ext);
    }

    analyze_bytes(&bytes, &decoder, classifier, config)
}
