//! Feature extraction modules
//!
//! This module contains the per-recording feature pipeline:
//! - Pitch estimation (YIN)
//! - Chroma accumulation and classifier feature expansion
//! - Key profiles

pub mod chroma;
pub mod key;
pub mod pitch;
