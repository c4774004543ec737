//! Audio I/O modules
//!
//! Audio decoding using Symphonia, sample storage and frame windowing.

pub mod decoder;
pub mod sample_buffer;
