// src/report/mod.rs
pub mod assumptions;

// Re-export commonly used types
pub use assumptions::AssumptionTable;
