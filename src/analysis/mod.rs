//! Analysis and result aggregation modules
//!
//! Turns classifier output into the final answer:
//! - Softmax and top-3 ranking
//! - Result types
//! - Metadata

pub mod metadata;
pub mod ranking;
pub mod result;
