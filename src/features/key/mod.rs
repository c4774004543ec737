//! Key profile modules
//!
//! Reference tonal profiles used by the built-in template classifier.

pub mod templates;

pub use templates::KeyTemplates;
