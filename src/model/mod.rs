// src/model/mod.rs
pub mod case;
pub mod engine;
pub mod registry;

// Re-export commonly used types
pub use case::BizCase;
pub use engine::{BizModel, Operator, AGGREGATE_LEVER};
pub use registry::LeverRegistry;
