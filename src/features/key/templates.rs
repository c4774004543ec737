//! Krumhansl-Kessler key templates
//!
//! Tonal profiles for 24 keys (12 major + 12 minor), each rotated to its tonic.
//!
//! # Reference
//!
//! Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in Perceived
//! Tonal Organization in a Spatial Representation of Musical Keys. *Psychological Review*,
//! 89(4), 334-368.

use crate::analysis::result::Key;
use crate::features::chroma::PITCH_CLASSES;

/// C major probe-tone ratings
const KK_MAJOR: [f32; PITCH_CLASSES] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// C minor probe-tone ratings
const KK_MINOR: [f32; PITCH_CLASSES] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Key templates for all 24 keys
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    /// Major key templates (C, C#, D, ..., B)
    pub major: [[f32; PITCH_CLASSES]; 12],

    /// Minor key templates (Cm, C#m, Dm, ..., Bm)
    pub minor: [[f32; PITCH_CLASSES]; 12],
}

impl KeyTemplates {
    /// Create templates with Krumhansl-Kessler profiles
    pub fn new() -> Self {
        let mut major = [[0.0; PITCH_CLASSES]; 12];
        let mut minor = [[0.0; PITCH_CLASSES]; 12];
        for tonic in 0..12 {
            major[tonic] = rotate(&KK_MAJOR, tonic);
            minor[tonic] = rotate(&KK_MINOR, tonic);
        }
        Self { major, minor }
    }

    /// Template for `key`
    pub fn get(&self, key: Key) -> &[f32; PITCH_CLASSES] {
        match key {
            Key::Major(_) => &self.major[key.tonic()],
            Key::Minor(_) => &self.minor[key.tonic()],
        }
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}

/// Shift a C-rooted profile so its tonic lands on `tonic`
fn rotate(profile: &[f32; PITCH_CLASSES], tonic: usize) -> [f32; PITCH_CLASSES] {
    let mut out = [0.0; PITCH_CLASSES];
    for (pc, slot) in out.iter_mut().enumerate() {
        *slot = profile[(pc + PITCH_CLASSES - tonic) % PITCH_CLASSES];
    }
    out
}
