//! Analysis result types

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;
use crate::features::chroma::{ChromaHistogram, FeatureVector, NormalizedProfile, PITCH_CLASS_NAMES};

/// Number of keys the classifier scores (12 major + 12 minor)
pub const KEY_COUNT: usize = 24;

/// Number of keys reported in a ranked result
pub const TOP_N: usize = 3;

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

/// All keys in classifier output order: C..B major, then Cm..Bm
pub const ALL_KEYS: [Key; KEY_COUNT] = [
    Key::Major(0),
    Key::Major(1),
    Key::Major(2),
    Key::Major(3),
    Key::Major(4),
    Key::Major(5),
    Key::Major(6),
    Key::Major(7),
    Key::Major(8),
    Key::Major(9),
    Key::Major(10),
    Key::Major(11),
    Key::Minor(0),
    Key::Minor(1),
    Key::Minor(2),
    Key::Minor(3),
    Key::Minor(4),
    Key::Minor(5),
    Key::Minor(6),
    Key::Minor(7),
    Key::Minor(8),
    Key::Minor(9),
    Key::Minor(10),
    Key::Minor(11),
];

impl Key {
    /// Key at a classifier output index (0-11 major, 12-23 minor)
    pub fn from_index(index: usize) -> Option<Self> {
        ALL_KEYS.get(index).copied()
    }

    /// Classifier output index of this key
    pub fn index(&self) -> usize {
        match self {
            Key::Major(i) => *i as usize % 12,
            Key::Minor(i) => 12 + *i as usize % 12,
        }
    }

    /// Tonic pitch class (0 = C)
    pub fn tonic(&self) -> usize {
        match self {
            Key::Major(i) | Key::Minor(i) => *i as usize % 12,
        }
    }

    /// Get key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// # Example
    ///
    /// ```
    /// use pcp_key::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C");
    /// assert_eq!(Key::Major(6).name(), "F#");
    /// assert_eq!(Key::Minor(9).name(), "Am");
    /// assert_eq!(Key::Minor(1).name(), "C#m");
    /// ```
    pub fn name(&self) -> String {
        match self {
            Key::Major(_) => PITCH_CLASS_NAMES[self.tonic()].to_string(),
            Key::Minor(_) => format!("{}m", PITCH_CLASS_NAMES[self.tonic()]),
        }
    }

    /// Parse a key name ("C", "F#", "Am", "D#m")
    pub fn from_name(name: &str) -> Option<Self> {
        let (note, minor) = match name.strip_suffix('m') {
            Some(note) => (note, true),
            None => (name, false),
        };
        let idx = PITCH_CLASS_NAMES.iter().position(|&n| n == note)? as u32;
        Some(if minor { Key::Minor(idx) } else { Key::Major(idx) })
    }

    /// Get key in DJ numerical notation (e.g., "1A", "2B", "12A")
    ///
    /// Follows the circle of fifths: 1A = C, 2A = G, ...; 1B = Am, 2B = Em, ...
    ///
    /// # Example
    ///
    /// ```
    /// use pcp_key::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).numerical(), "1A");   // C
    /// assert_eq!(Key::Major(7).numerical(), "2A");   // G
    /// assert_eq!(Key::Minor(9).numerical(), "1B");   // Am
    /// assert_eq!(Key::Minor(4).numerical(), "2B");   // Em
    /// ```
    pub fn numerical(&self) -> String {
        let tonic = self.tonic();
        match self {
            Key::Major(_) => {
                let position = CIRCLE_OF_FIFTHS_MAJOR
                    .iter()
                    .position(|&x| x == tonic)
                    .unwrap_or(0);
                format!("{}A", position + 1)
            }
            Key::Minor(_) => {
                let position = CIRCLE_OF_FIFTHS_MINOR
                    .iter()
                    .position(|&x| x == tonic)
                    .unwrap_or(0);
                format!("{}B", position + 1)
            }
        }
    }

    /// Get key from DJ numerical notation; `None` if malformed
    ///
    /// ```
    /// use pcp_key::analysis::result::Key;
    ///
    /// assert_eq!(Key::from_numerical("2A"), Some(Key::Major(7)));
    /// assert_eq!(Key::from_numerical("1B"), Some(Key::Minor(9)));
    /// assert_eq!(Key::from_numerical("13A"), None);
    /// ```
    pub fn from_numerical(notation: &str) -> Option<Self> {
        let suffix = notation.chars().last()?;
        let num_str = &notation[..notation.len() - suffix.len_utf8()];
        let num: usize = num_str.parse().ok()?;
        if !(1..=12).contains(&num) {
            return None;
        }

        match suffix {
            'A' => Some(Key::Major(CIRCLE_OF_FIFTHS_MAJOR[num - 1] as u32)),
            'B' => Some(Key::Minor(CIRCLE_OF_FIFTHS_MINOR[num - 1] as u32)),
            _ => None,
        }
    }
}

// C, G, D, A, E, B, F#, C#, G#, D#, A#, F
const CIRCLE_OF_FIFTHS_MAJOR: [usize; 12] = [0, 7, 2, 9, 4, 11, 6, 1, 8, 3, 10, 5];
// Am, Em, Bm, F#m, C#m, G#m, D#m, A#m, Fm, Cm, Gm, Dm
const CIRCLE_OF_FIFTHS_MINOR: [usize; 12] = [9, 4, 11, 6, 1, 8, 3, 10, 5, 0, 7, 2];

/// One candidate key with its probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Candidate key
    pub key: Key,
    /// Probability within the ranked result (0.0-1.0)
    pub probability: f32,
}

impl Prediction {
    /// Key label ("C", "C#m", ...)
    pub fn label(&self) -> String {
        self.key.name()
    }
}

/// The three most probable keys, highest first, probabilities summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    predictions: [Prediction; TOP_N],
}

impl RankedResult {
    pub(crate) fn new(predictions: [Prediction; TOP_N]) -> Self {
        Self { predictions }
    }

    /// Predictions in descending probability
    pub fn predictions(&self) -> &[Prediction; TOP_N] {
        &self.predictions
    }

    /// Most probable key
    pub fn best(&self) -> &Prediction {
        &self.predictions[0]
    }
}

/// Complete key analysis of one recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyAnalysis {
    /// Top three keys
    pub ranked: RankedResult,

    /// Raw pitch-class counts
    pub histogram: ChromaHistogram,

    /// Normalized pitch-class profile
    pub profile: NormalizedProfile,

    /// Classifier input derived from the profile
    pub features: FeatureVector,

    /// Run metadata
    pub metadata: AnalysisMetadata,
}

impl KeyAnalysis {
    /// Most probable key
    pub fn key(&self) -> Key {
        self.ranked.best().key
    }
}
