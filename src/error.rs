// src/error.rs

use thiserror::Error;

/// Everything that can go wrong while registering, composing, or
/// exporting distributions. Precondition failures carry the full
/// (lever, segment, name/label) context; none of them commit a
/// partial mutation, so re-running a failed step after fixing the
/// registry is safe.
#[derive(Debug, Error)]
pub enum Error {
    #[error("lever '{lever}' is not registered")]
    MissingLever { lever: String },

    #[error("segment '{segment}' is not registered under lever '{lever}'")]
    MissingSegment { lever: String, segment: String },

    #[error("distribution '{name}' is not registered under lever '{lever}', segment '{segment}'")]
    MissingDistribution {
        lever: String,
        segment: String,
        name: String,
    },

    #[error("no base distribution for label '{label}' under lever '{lever}', segment '{segment}'; apply operator 'base' first")]
    MissingBase {
        lever: String,
        segment: String,
        label: String,
    },

    #[error("unsupported operator '{operator}', expected one of: base, *, /, +, -, *k")]
    UnsupportedOperator { operator: String },

    #[error("sample arrays differ in length ({left} vs {right})")]
    ShapeMismatch { left: usize, right: usize },

    #[error("no case entry for label '{label}' under lever '{lever}', segment '{segment}'")]
    LookupFailure {
        lever: String,
        segment: String,
        label: String,
    },

    #[error("invalid sampling specification: {reason}")]
    InvalidSpec { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
