// src/lib.rs

//! Monte Carlo business case modeling.
//!
//! Builds quantified business case estimates by chaining independently
//! specified probability distributions (one per business lever and customer
//! segment) through a fixed set of arithmetic operators, e.g.
//! `revenue = engagement * conversion * price`.
//!
//! This is NOT a conditional distribution (or Gibbs) sampling tool. We
//! usually don't have enough information to set an appropriate prior, and
//! where we do, we don't know the paired-variable covariance for the most
//! critical inputs (engagement, treatment effect). Assuming independence is
//! more honest than a partially broken conditional probability chain, and it
//! mirrors how business cases are actually built. The aim is to make those
//! cases repeatable, inspectable, and wrong in a quantifiable way.
//!
//! Typical flow: register [`DistParam`]s into a [`BizModel`], derive labeled
//! quantities with [`BizModel::value_lever`], collapse across levers with
//! [`BizModel::sum_over_levers_segments`], and inspect everything with
//! [`BizModel::export_assumptions`].

pub mod distribution;
pub mod error;
pub mod model;
pub mod report;

// Re-export commonly used types
pub use distribution::{BoundMethod, DistParam, DistributionType, SampleSpec, DEFAULT_SEGMENT};
pub use error::{Error, Result};
pub use model::{BizCase, BizModel, LeverRegistry, Operator, AGGREGATE_LEVER};
pub use report::AssumptionTable;
