//! Decoded sample storage and frame windowing
//!
//! A [`SampleBuffer`] is produced once by a decoder and never mutated. Analysis
//! walks it with [`Frames`], a restartable iterator of fixed-size overlapping
//! windows. A trailing partial window is dropped rather than padded.

use crate::error::AnalysisError;

/// Mono audio samples with their sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from mono samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Samples in playback order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 for a zero sample rate)
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Iterate over overlapping analysis frames
    pub fn frames(&self, frame_size: usize, hop_size: usize) -> Result<Frames<'_>, AnalysisError> {
        Frames::new(&self.samples, frame_size, hop_size)
    }

    /// Take the samples out of the buffer
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

/// Iterator over `frame_size` windows starting every `hop_size` samples
///
/// Yields borrowed slices at offsets `0, hop, 2*hop, ...` while
/// `offset + frame_size <= len`. Call [`SampleBuffer::frames`] again for a
/// fresh pass.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    samples: &'a [f32],
    frame_size: usize,
    hop_size: usize,
    offset: usize,
}

impl<'a> Frames<'a> {
    /// Create a frame iterator over `samples`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero
    pub fn new(samples: &'a [f32], frame_size: usize, hop_size: usize) -> Result<Self, AnalysisError> {
        if frame_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Frame size must be > 0".to_string(),
            ));
        }
        if hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        Ok(Self {
            samples,
            frame_size,
            hop_size,
            offset: 0,
        })
    }

    /// Total number of frames a fresh iterator yields
    pub fn frame_count(&self) -> usize {
        frame_count(self.samples.len(), self.frame_size, self.hop_size)
    }

    /// Offset in samples of the next frame
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.offset.checked_add(self.frame_size)?;
        if end > self.samples.len() {
            return None;
        }
        let frame = &self.samples[self.offset..end];
        self.offset += self.hop_size;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.offset + self.frame_size > self.samples.len() {
            0
        } else {
            (self.samples.len() - self.offset - self.frame_size) / self.hop_size + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// Number of full frames in `len` samples
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if frame_size == 0 || hop_size == 0 || len < frame_size {
        0
    } else {
        (len - frame_size) / hop_size + 1
    }
}
