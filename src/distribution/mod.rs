// src/distribution/mod.rs
pub mod param;
pub mod sampling;

// Re-export commonly used types
pub use param::{DistParam, DEFAULT_SEGMENT};
pub use sampling::{BoundMethod, DistributionType, SampleSpec};
