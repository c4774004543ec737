//! YIN fundamental frequency estimation
//!
//! Time-domain pitch estimation on one frame at a time. The detector owns a
//! scratch buffer of `floor(frame_size / 2)` lags that is reused for every
//! frame of a file and zeroed at the start of each estimate.
//!
//! Algorithm:
//! 1. Difference function: d(tau) = sum_i (x[i] - x[i + tau])^2
//! 2. Cumulative mean normalized difference: d'(0) = 1, d'(tau) = tau * d(tau) / sum_{j=1..tau} d(j)
//! 3. Absolute threshold: first tau >= 2 with d'(tau) < threshold, then descend to the local minimum
//! 4. Parabolic interpolation of the selected lag
//! 5. frequency = sample_rate / lag
//!
//! # Reference
//!
//! de Cheveigné, A., & Kawahara, H. (2002). YIN, a fundamental frequency estimator
//! for speech and music. *The Journal of the Acoustical Society of America*, 111(4), 1917-1930.

use super::PitchEstimate;
use crate::error::AnalysisError;

/// Smallest frame that leaves lags 0, 1 and 2 to search
pub const MIN_FRAME_SIZE: usize = 6;

/// First lag considered by the threshold search
const MIN_TAU: usize = 2;

/// Stateful YIN pitch detector
#[derive(Debug, Clone)]
pub struct YinDetector {
    frame_size: usize,
    half_buffer_size: usize,
    threshold: f32,
    probability: f32,
    yin_buffer: Vec<f32>,
}

impl YinDetector {
    /// Create a detector for frames of `frame_size` samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `frame_size < 6` or `threshold` is not in (0, 1)
    pub fn new(frame_size: usize, threshold: f32) -> Result<Self, AnalysisError> {
        if frame_size < MIN_FRAME_SIZE {
            return Err(AnalysisError::InvalidInput(format!(
                "YIN frame size must be >= {}, got {}",
                MIN_FRAME_SIZE, frame_size
            )));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "YIN threshold must be in (0, 1), got {}",
                threshold
            )));
        }

        let half_buffer_size = frame_size / 2;
        Ok(Self {
            frame_size,
            half_buffer_size,
            threshold,
            probability: 0.0,
            yin_buffer: vec![0.0; half_buffer_size],
        })
    }

    /// Frame length this detector was built for
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Number of lags examined, `floor(frame_size / 2)`
    pub fn half_buffer_size(&self) -> usize {
        self.half_buffer_size
    }

    /// Absolute threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Voicing probability of the last estimate (0.0 when unvoiced)
    pub fn probability(&self) -> f32 {
        self.probability
    }

    /// Normalized difference values of the last estimate
    pub fn cmnd(&self) -> &[f32] {
        &self.yin_buffer
    }

    /// Estimate the fundamental frequency of one frame
    ///
    /// Only the first `frame_size` samples of `frame` are read.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the frame is shorter than
    /// `frame_size` or `sample_rate` is zero. A frame without a clear period is
    /// not an error; it yields [`PitchEstimate::Unvoiced`].
    pub fn estimate_pitch(
        &mut self,
        frame: &[f32],
        sample_rate: u32,
    ) -> Result<PitchEstimate, AnalysisError> {
        if frame.len() < self.frame_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame has {} samples, detector expects {}",
                frame.len(),
                self.frame_size
            )));
        }
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate".to_string(),
            ));
        }

        self.difference(frame);
        self.cumulative_mean_normalized_difference();

        let Some(tau) = self.absolute_threshold() else {
            return Ok(PitchEstimate::Unvoiced);
        };

        let lag = self.parabolic_interpolation(tau);
        let frequency = sample_rate as f32 / lag;
        if !(lag > 0.0 && frequency.is_finite()) {
            log::warn!("Discarding lag {} at tau {}", lag, tau);
            self.probability = 0.0;
            return Ok(PitchEstimate::Unvoiced);
        }

        Ok(PitchEstimate::Voiced {
            frequency,
            lag,
            probability: self.probability,
        })
    }

    /// Step 1: squared difference for every lag. Overwrites the whole scratch buffer.
    fn difference(&mut self, frame: &[f32]) {
        let half = self.half_buffer_size;
        self.yin_buffer.fill(0.0);

        for (tau, slot) in self.yin_buffer.iter_mut().enumerate() {
            *slot = frame[..half]
                .iter()
                .zip(&frame[tau..tau + half])
                .map(|(a, b)| {
                    let delta = a - b;
                    delta * delta
                })
                .sum();
        }
    }

    /// Step 2: rescale so lags are comparable. d'(0) = 1.
    ///
    /// While the running sum is still zero (flat signal) the ratio is 0/0 and is
    /// pinned to 1.0, which can never cross the threshold.
    fn cumulative_mean_normalized_difference(&mut self) {
        self.yin_buffer[0] = 1.0;
        let mut running_sum = 0.0f32;

        for tau in 1..self.half_buffer_size {
            running_sum += self.yin_buffer[tau];
            self.yin_buffer[tau] = if running_sum > 0.0 {
                self.yin_buffer[tau] * tau as f32 / running_sum
            } else {
                1.0
            };
        }
    }

    /// Step 3: first dip below the threshold, followed down to its local minimum
    fn absolute_threshold(&mut self) -> Option<usize> {
        let buf = &self.yin_buffer;
        let half = self.half_buffer_size;

        let mut tau = MIN_TAU;
        while tau < half {
            if buf[tau] < self.threshold {
                while tau + 1 < half && buf[tau + 1] < buf[tau] {
                    tau += 1;
                }
                self.probability = 1.0 - buf[tau];
                return Some(tau);
            }
            tau += 1;
        }

        self.probability = 0.0;
        None
    }

    /// Step 4: sub-sample refinement of the selected lag
    fn parabolic_interpolation(&self, tau: usize) -> f32 {
        let buf = &self.yin_buffer;
        let x0 = if tau < 1 { tau } else { tau - 1 };
        let x2 = if tau + 1 < self.half_buffer_size { tau + 1 } else { tau };

        let s0 = buf[x0];
        let s1 = buf[tau];
        let s2 = buf[x2];

        if x0 == tau {
            return if s1 <= s2 { tau as f32 } else { x2 as f32 };
        }
        if x2 == tau {
            return if s1 <= s0 { tau as f32 } else { x0 as f32 };
        }

        let denominator = 2.0 * (2.0 * s1 - s2 - s0);
        if denominator == 0.0 {
            return tau as f32;
        }
        tau as f32 + (s2 - s0) / denominator
    }
}
