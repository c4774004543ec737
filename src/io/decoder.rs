//! Audio decoding using Symphonia
//!
//! Decoding is a collaborator of the analysis pipeline: anything implementing
//! [`AudioDecoder`] can feed it. [`SymphoniaDecoder`] is the default adapter
//! and handles every container/codec Symphonia's default registry knows.

use std::io::Cursor;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use super::sample_buffer::SampleBuffer;
use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::{mix_to_mono, ChannelMixMode};

/// Turns encoded audio bytes into mono samples
pub trait AudioDecoder: Send + Sync {
    /// Decode a complete file held in memory
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DecodingError` for malformed or unsupported input
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer, AnalysisError>;
}

/// Decoder backed by Symphonia's default format and codec registries
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    channel_mix: ChannelMixMode,
    extension: Option<String>,
}

impl SymphoniaDecoder {
    /// Create a decoder with the given channel reduction
    pub fn new(channel_mix: ChannelMixMode) -> Self {
        Self {
            channel_mix,
            extension: None,
        }
    }

    /// Hint the container format by file extension (e.g. "wav", "mp3")
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer, AnalysisError> {
        log::debug!(
            "Decoding {} bytes (hint: {:?}, mix: {:?})",
            bytes.len(),
            self.extension,
            self.channel_mix
        );

        if bytes.is_empty() {
            return Err(AnalysisError::DecodingError("Empty input".to_string()));
        }

        let source = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = &self.extension {
            hint.with_extension(ext);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|e| AnalysisError::DecodingError(format!("Unrecognized container: {}", e)))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AnalysisError::DecodingError("Track has no sample rate".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AnalysisError::DecodingError(format!("Unsupported codec: {}", e)))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => {
                    log::warn!(
                        "Stream reset required; stopping after {} decoded samples",
                        samples.len()
                    );
                    break;
                }
                Err(e) => {
                    return Err(AnalysisError::DecodingError(format!("Failed to read packet: {}", e)))
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => samples.extend(buffer_to_mono(decoded, self.channel_mix)),
                Err(SymphoniaError::DecodeError(msg)) => {
                    // Corrupted packets are skipped, the rest of the stream is still usable
                    log::warn!("Skipping undecodable packet: {}", msg);
                    skipped_packets += 1;
                }
                Err(e) => return Err(AnalysisError::DecodingError(e.to_string())),
            }
        }

        if samples.is_empty() {
            return Err(AnalysisError::DecodingError(
                "Stream contained no decodable samples".to_string(),
            ));
        }

        log::debug!(
            "Decoded {} samples at {} Hz ({} packets skipped)",
            samples.len(),
            sample_rate,
            skipped_packets
        );

        Ok(SampleBuffer::new(samples, sample_rate))
    }
}

fn buffer_to_mono(decoded: AudioBufferRef<'_>, mode: ChannelMixMode) -> Vec<f32> {
    match decoded {
        AudioBufferRef::U8(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::U16(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::U24(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::U32(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::S8(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::S16(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::S24(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::S32(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::F32(buf) => planes_to_mono(&*buf, mode),
        AudioBufferRef::F64(buf) => planes_to_mono(&*buf, mode),
    }
}

fn planes_to_mono<S>(buf: &symphonia::core::audio::AudioBuffer<S>, mode: ChannelMixMode) -> Vec<f32>
where
    S: Sample + IntoSample<f32>,
{
    let channels = buf.spec().channels.count();
    let planes: Vec<Vec<f32>> = (0..channels)
        .map(|ch| buf.chan(ch).iter().map(|&s| s.into_sample()).collect())
        .collect();
    let views: Vec<&[f32]> = planes.iter().map(|p| p.as_slice()).collect();
    mix_to_mono(&views, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_decoding_error() {
        let decoder = SymphoniaDecoder::default();
        let result = decoder.decode(&[]);
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_garbage_input_is_decoding_error() {
        let decoder = SymphoniaDecoder::default().with_extension("wav");
        let bytes = vec![0x42u8; 512];
        let result = decoder.decode(&bytes);
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }
}
