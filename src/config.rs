//! Configuration parameters for key estimation

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::ChannelMixMode;

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Framing
    /// Frame size in samples for pitch estimation (default: 1024)
    pub frame_size: usize,

    /// Hop size in samples between frames (default: 256, a quarter frame)
    pub hop_size: usize,

    // Pitch estimation
    /// YIN absolute threshold on the normalized difference (default: 0.5)
    /// Must lie strictly between 0 and 1
    pub yin_threshold: f32,

    // Chroma accumulation
    /// Reference frequency of MIDI note 69 (default: 440.0 Hz, A4)
    pub reference_frequency: f32,

    /// Distance from an exact semitone, in semitones, within which a frame is counted (default: 0.1)
    pub tuning_tolerance: f32,

    // Decoding
    /// How multichannel audio is reduced to mono (default: First)
    pub channel_mix: ChannelMixMode,
}

impl AnalysisConfig {
    /// Set the frame size and keep the hop at a quarter of it
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self.hop_size = (frame_size / 4).max(1);
        self
    }

    /// Check that every parameter is in range
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size < 6 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame size must be >= 6, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        if !(self.yin_threshold > 0.0 && self.yin_threshold < 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "YIN threshold must be in (0, 1), got {}",
                self.yin_threshold
            )));
        }
        if !(self.reference_frequency.is_finite() && self.reference_frequency > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Reference frequency must be positive, got {}",
                self.reference_frequency
            )));
        }
        if !(self.tuning_tolerance > 0.0 && self.tuning_tolerance <= 0.5) {
            return Err(AnalysisError::InvalidInput(format!(
                "Tuning tolerance must be in (0, 0.5], got {}",
                self.tuning_tolerance
            )));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            hop_size: 256,
            yin_threshold: 0.5,
            reference_frequency: 440.0,
            tuning_tolerance: 0.1,
            channel_mix: ChannelMixMode::First,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hop_size, config.frame_size / 4);
    }

    #[test]
    fn test_with_frame_size_keeps_quarter_hop() {
        let config = AnalysisConfig::default().with_frame_size(2048);
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.hop_size, 512);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = AnalysisConfig::default();
        config.yin_threshold = 1.0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.frame_size = 4;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.hop_size = 0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.tuning_tolerance = 0.0;
        assert!(config.validate().is_err());
    }
}
