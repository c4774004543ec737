//! Integration tests for key estimation

use std::io::Cursor;

use pcp_key::{
    analyze_audio, analyze_bytes, analyze_file, AnalysisConfig, AnalysisError, AudioDecoder,
    ChannelMixMode, FeatureVector, Key, SymphoniaDecoder, TemplateClassifier,
};
use rayon::prelude::*;

const SAMPLE_RATE: u32 = 44100;

/// Sine tone at `frequency` Hz
fn tone(frequency: f32, seconds: f32, amplitude: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..n)
        .map(|i| {
            amplitude * (2.0 * std::f32::consts::PI * frequency * i as f32 / SAMPLE_RATE as f32).sin()
        })
        .collect()
}

/// Concatenate tones, one per frequency
fn melody(frequencies: &[f32], note_seconds: f32) -> Vec<f32> {
    frequencies
        .iter()
        .flat_map(|&f| tone(f, note_seconds, 0.5))
        .collect()
}

/// Encode interleaved samples as a 16-bit WAV file in memory
fn wav_bytes(channels: &[Vec<f32>]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("create WAV writer");
        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        for i in 0..frames {
            for channel in channels {
                let s = (channel[i].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer.write_sample(s).expect("write sample");
            }
        }
        writer.finalize().expect("finalize WAV");
    }
    cursor.into_inner()
}

/// Classifier stub: always scores C major highest
fn c_major_stub(_: &FeatureVector) -> Result<Vec<f32>, AnalysisError> {
    let mut scores = vec![0.0f32; 24];
    scores[0] = 10.0;
    Ok(scores)
}

// C4 E4 G4 C5 G4 E4 C4 G4
const C_MAJOR_ARPEGGIO: [f32; 8] = [261.63, 329.63, 392.00, 523.25, 392.00, 329.63, 261.63, 392.00];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_stub_classifier() {
        let samples = tone(440.0, 2.0, 0.5);
        let result = analyze_audio(&samples, SAMPLE_RATE, &c_major_stub, &AnalysisConfig::default())
            .expect("Analysis should succeed");

        let ranked = result.ranked.predictions();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].label(), "C");
        assert!(ranked[0].probability > 0.9);
        let sum: f32 = ranked.iter().map(|p| p.probability).sum();
        assert!((sum - 1.0).abs() < 1e-6);

        // The profile still reflects the audio, not the classifier
        assert_eq!(result.profile.dominant_pitch_class(), 9);
        assert_eq!(result.metadata.sample_rate, SAMPLE_RATE);
        assert!((result.metadata.duration_seconds - 2.0).abs() < 1e-3);
        assert!(result.metadata.frames.counted > 0);
        assert!(result.metadata.processing_time_ms >= 0.0);
    }

    #[test]
    fn test_classifier_receives_wrapped_features() {
        let samples = melody(&C_MAJOR_ARPEGGIO, 0.25);
        let checking = |features: &FeatureVector| -> Result<Vec<f32>, AnalysisError> {
            let v = features.as_slice();
            assert_eq!(v.len(), 23);
            assert_eq!(features.shape(), [1, 23, 1]);
            for i in 0..11 {
                assert_eq!(v[i], v[12 + i]);
            }
            Ok(vec![1.0; 24])
        };

        let result = analyze_audio(&samples, SAMPLE_RATE, &checking, &AnalysisConfig::default())
            .expect("Analysis should succeed");
        // Uniform scores rank by classifier index
        assert_eq!(result.key(), Key::Major(0));
    }

    #[test]
    fn test_template_classifier_c_major_arpeggio() {
        let samples = melody(&C_MAJOR_ARPEGGIO, 0.25);
        let classifier = TemplateClassifier::new();
        let result = analyze_audio(&samples, SAMPLE_RATE, &classifier, &AnalysisConfig::default())
            .expect("Analysis should succeed");

        let counts = result.histogram.counts();
        assert!(counts[0] > 0 && counts[4] > 0 && counts[7] > 0);
        assert_eq!(
            result.key(),
            Key::Major(0),
            "Expected C, got {} (histogram {:?})",
            result.key().name(),
            counts
        );
    }

    #[test]
    fn test_silence_is_degenerate() {
        let samples = vec![0.0f32; SAMPLE_RATE as usize];
        let result = analyze_audio(&samples, SAMPLE_RATE, &c_major_stub, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::DegenerateProfile(_))));
    }

    #[test]
    fn test_classifier_failure_propagates() {
        let failing = |_: &FeatureVector| -> Result<Vec<f32>, AnalysisError> {
            Err(AnalysisError::InferenceError("model not loaded".to_string()))
        };
        let samples = tone(440.0, 1.0, 0.5);
        let result = analyze_audio(&samples, SAMPLE_RATE, &failing, &AnalysisConfig::default());
        assert_eq!(
            result.unwrap_err(),
            AnalysisError::InferenceError("model not loaded".to_string())
        );
    }

    #[test]
    fn test_classifier_wrong_output_length() {
        let short = |_: &FeatureVector| -> Result<Vec<f32>, AnalysisError> { Ok(vec![0.0; 12]) };
        let samples = tone(440.0, 1.0, 0.5);
        let result = analyze_audio(&samples, SAMPLE_RATE, &short, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InferenceError(_))));
    }

    #[test]
    fn test_decode_mono_wav() {
        let bytes = wav_bytes(&[tone(440.0, 1.0, 0.5)]);
        let buffer = SymphoniaDecoder::default()
            .with_extension("wav")
            .decode(&bytes)
            .expect("WAV should decode");

        assert_eq!(buffer.sample_rate(), SAMPLE_RATE);
        assert_eq!(buffer.len(), SAMPLE_RATE as usize);
        let peak = buffer.samples().iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!((peak - 0.5).abs() < 0.01, "peak was {}", peak);
    }

    #[test]
    fn test_analyze_bytes_wav() {
        let bytes = wav_bytes(&[tone(440.0, 1.5, 0.5)]);
        let decoder = SymphoniaDecoder::default();
        let result = analyze_bytes(&bytes, &decoder, &c_major_stub, &AnalysisConfig::default())
            .expect("Analysis should succeed");
        assert_eq!(result.profile.dominant_pitch_class(), 9);
        assert_eq!(result.metadata.sample_rate, SAMPLE_RATE);
    }

    #[test]
    fn test_stereo_channel_mix() {
        // Tone only on the right channel
        let left = vec![0.0f32; SAMPLE_RATE as usize];
        let right = tone(440.0, 1.0, 0.8);
        let bytes = wav_bytes(&[left, right]);

        let first = SymphoniaDecoder::new(ChannelMixMode::First);
        let result = analyze_bytes(&bytes, &first, &c_major_stub, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::DegenerateProfile(_))));

        let average = SymphoniaDecoder::new(ChannelMixMode::Average);
        let result = analyze_bytes(&bytes, &average, &c_major_stub, &AnalysisConfig::default())
            .expect("Averaged channels carry the tone");
        assert_eq!(result.profile.dominant_pitch_class(), 9);
    }

    #[test]
    fn test_undecodable_bytes() {
        let bytes = b"definitely not an audio file".to_vec();
        let result = analyze_bytes(
            &bytes,
            &SymphoniaDecoder::default(),
            &c_major_stub,
            &AnalysisConfig::default(),
        );
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_analyze_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("pcp_key_test_{}.wav", std::process::id()));
        std::fs::write(&path, wav_bytes(&[tone(392.0, 1.0, 0.5)])).expect("write temp WAV");

        let result = analyze_file(&path, &c_major_stub, &AnalysisConfig::default());
        let _ = std::fs::remove_file(&path);

        let result = result.expect("Analysis should succeed");
        assert_eq!(result.profile.dominant_pitch_class(), 7); // G
    }

    #[test]
    fn test_missing_file() {
        let result = analyze_file(
            "/nonexistent/definitely/missing.wav",
            &c_major_stub,
            &AnalysisConfig::default(),
        );
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_parallel_runs_match_sequential() {
        let inputs: Vec<Vec<f32>> = [261.63f32, 293.66, 329.63, 349.23, 392.00, 440.00]
            .iter()
            .map(|&f| tone(f, 0.5, 0.5))
            .collect();
        let config = AnalysisConfig::default();
        let classifier = TemplateClassifier::new();

        let sequential: Vec<_> = inputs
            .iter()
            .map(|s| analyze_audio(s, SAMPLE_RATE, &classifier, &config).map(|r| r.histogram))
            .collect();
        let parallel: Vec<_> = inputs
            .par_iter()
            .map(|s| analyze_audio(s, SAMPLE_RATE, &classifier, &config).map(|r| r.histogram))
            .collect();

        assert_eq!(sequential, parallel);
    }
}
