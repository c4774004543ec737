//! Pitch-class accumulation
//!
//! Maps each voiced frame to a MIDI note and counts it only if it lands close
//! to an exact semitone. Off-pitch frames (vibrato, glides, noise) are dropped.

use super::{ChromaHistogram, PITCH_CLASSES};
use crate::features::pitch::PitchEstimate;

/// Pitch class of `frequency`, if it lies within `tolerance` semitones of a note
///
/// `midi = 69 + 12 * log2(frequency / reference)`. The fractional part is
/// `midi - floor(midi)`, so it stays in [0, 1) for notes below MIDI 0 as well,
/// and the class is `round(midi)` wrapped into 0..12 with a Euclidean modulo.
pub fn pitch_class(frequency: f32, reference: f32, tolerance: f32) -> Option<usize> {
    if !(frequency > 0.0 && frequency.is_finite()) {
        return None;
    }

    let midi = 69.0 + 12.0 * (frequency / reference).log2();
    let cents = midi - midi.floor();
    if !(cents < tolerance || cents > 1.0 - tolerance) {
        return None;
    }

    let note = midi.round() as i64;
    Some(note.rem_euclid(PITCH_CLASSES as i64) as usize)
}

/// Running pitch-class histogram for one analysis run
#[derive(Debug, Clone)]
pub struct ChromaAccumulator {
    histogram: ChromaHistogram,
    reference_frequency: f32,
    tolerance: f32,
    voiced: usize,
    counted: usize,
}

impl ChromaAccumulator {
    /// Create an empty accumulator
    ///
    /// * `reference_frequency` - Frequency of MIDI note 69 (440.0 for A4)
    /// * `tolerance` - Accepted distance from a semitone, in semitones (0.1)
    pub fn new(reference_frequency: f32, tolerance: f32) -> Self {
        Self {
            histogram: ChromaHistogram::new(),
            reference_frequency,
            tolerance,
            voiced: 0,
            counted: 0,
        }
    }

    /// Add one frame's estimate. Returns true if it was counted.
    pub fn accumulate(&mut self, estimate: &PitchEstimate) -> bool {
        let Some(frequency) = estimate.frequency() else {
            return false;
        };
        self.voiced += 1;

        match pitch_class(frequency, self.reference_frequency, self.tolerance) {
            Some(class) => {
                self.histogram.increment(class);
                self.counted += 1;
                true
            }
            None => false,
        }
    }

    /// Histogram so far
    pub fn histogram(&self) -> &ChromaHistogram {
        &self.histogram
    }

    /// Voiced frames seen
    pub fn voiced_frames(&self) -> usize {
        self.voiced
    }

    /// Frames added to the histogram
    pub fn counted_frames(&self) -> usize {
        self.counted
    }

    /// Finish the run and take the histogram
    pub fn into_histogram(self) -> ChromaHistogram {
        self.histogram
    }
}

impl Default for ChromaAccumulator {
    fn default() -> Self {
        Self::new(440.0, 0.1)
    }
}
