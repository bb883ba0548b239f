// src/model/engine.rs

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::distribution::DistParam;
use crate::error::{Error, Result};
use crate::model::{BizCase, LeverRegistry};
use crate::report::AssumptionTable;

/// Lever name carried by aggregated totals, which span every lever in the
/// case rather than belonging to any single one.
pub const AGGREGATE_LEVER: &str = "all levers";

/// The fixed operator set for [`BizModel::value_lever`]. Anything outside
/// it is rejected before any registry or case mutation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Operator {
    /// Seed a label from a registry distribution. Required before any
    /// chained operator for the same (lever, segment, label) triple.
    Base,
    /// Element-wise product of paired samples.
    Mult,
    /// Element-wise quotient.
    Divide,
    /// Element-wise sum.
    Add,
    /// Element-wise difference.
    Sub,
    /// Multiply every sample by a scalar constant wrapper.
    MultConst,
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "base" => Ok(Operator::Base),
            "*" => Ok(Operator::Mult),
            "/" => Ok(Operator::Divide),
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*k" => Ok(Operator::MultConst),
            other => Err(Error::UnsupportedOperator {
                operator: other.to_string(),
            }),
        }
    }
}

/// A mini business case model.
///
/// Owns the registry of assumptions and the accumulating case tree, and
/// drives the operator chaining that derives new sampled quantities from
/// registered ones. Mutators return `&mut Self` so repeated labeled steps
/// chain fluently; call order is the only determinant of the final case
/// contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BizModel {
    pub id: String,
    pub name: String,
    pub registry: LeverRegistry,
    pub case: BizCase,
}

impl BizModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            registry: LeverRegistry::new(),
            case: BizCase::new(),
        }
    }

    /// Register one distribution parameter under its declared path.
    pub fn register(&mut self, param: DistParam) -> &mut Self {
        self.registry.register(param);
        self
    }

    /// Register a batch of distribution parameters in sequence order.
    pub fn register_many(&mut self, params: impl IntoIterator<Item = DistParam>) -> &mut Self {
        self.registry.register_many(params);
        self
    }

    /// Apply one labeled composition step: derive (or reseed) the
    /// distribution stored at `(lever, segment, label)` from the registry
    /// distribution `name`.
    ///
    /// `operator` must be one of `base`, `*`, `/`, `+`, `-`, `*k`. `base`
    /// clones the registry distribution into the case under `label`; every
    /// other operator combines the current case entry with the registry
    /// distribution element-wise and overwrites the entry. Preconditions
    /// (lever/segment/name registered, base present for chained operators)
    /// are checked before any write, so a failed step commits nothing.
    pub fn value_lever(
        &mut self,
        name: &str,
        operator: &str,
        lever: &str,
        segment: &str,
        label: &str,
    ) -> Result<&mut Self> {
        let op = Operator::from_str(operator)?;

        if !self.registry.contains_lever(lever) {
            return Err(Error::MissingLever {
                lever: lever.to_string(),
            });
        }
        if !self.registry.contains_segment(lever, segment) {
            return Err(Error::MissingSegment {
                lever: lever.to_string(),
                segment: segment.to_string(),
            });
        }
        let source = self
            .registry
            .get(lever, segment, name)
            .ok_or_else(|| Error::MissingDistribution {
                lever: lever.to_string(),
                segment: segment.to_string(),
                name: name.to_string(),
            })?;

        debug!(name, operator, lever, segment, label, "valuing lever");

        let derived = match op {
            Operator::Base => source.clone(),
            _ => {
                let base = self
                    .case
                    .get(lever, segment, label)
                    .ok_or_else(|| Error::MissingBase {
                        lever: lever.to_string(),
                        segment: segment.to_string(),
                        label: label.to_string(),
                    })?
                    .clone();
                Self::chain_math(&base, source, op)?
            }
        };

        let derived = Self::finalize(derived, label);
        self.case.insert(lever, segment, label, derived);

        Ok(self)
    }

    /// Dispatch one chaining operator to the matching combinator.
    fn chain_math(base: &DistParam, new: &DistParam, op: Operator) -> Result<DistParam> {
        match op {
            Operator::Base => Ok(base.clone()),
            Operator::Mult => base.chain_mult(new),
            Operator::Divide => base.chain_divide(new),
            Operator::Add => base.chain_add(new),
            Operator::Sub => base.chain_sub(new),
            Operator::MultConst => base.mult_const(new),
        }
    }

    /// Rename to the label, refresh statistics, and strip the sampling
    /// spec: a case entry is a fixed realized outcome.
    fn finalize(mut param: DistParam, label: &str) -> DistParam {
        param.rename(label);
        param.update_diststats();
        param.clear_spec();
        param
    }

    /// Sum the derived distribution stored under each requested label and
    /// segment across every lever in the case.
    ///
    /// Each (label, segment) pair accumulates independently: the first
    /// lever seeds its total, every later lever folds in with `+`. Results
    /// come back in request order (labels outer, segments inner) under the
    /// [`AGGREGATE_LEVER`] sentinel. A missing (lever, segment, label)
    /// combination is a lookup failure, reported with full context.
    pub fn sum_over_levers_segments(
        &self,
        labels: &[&str],
        segments: &[&str],
    ) -> Result<Vec<DistParam>> {
        let mut totals: BTreeMap<(String, String), DistParam> = BTreeMap::new();

        for lever in self.case.lever_names() {
            for &label in labels {
                for &segment in segments {
                    let entry = self.case.get(lever, segment, label).ok_or_else(|| {
                        Error::LookupFailure {
                            lever: lever.to_string(),
                            segment: segment.to_string(),
                            label: label.to_string(),
                        }
                    })?;

                    match totals.entry((label.to_string(), segment.to_string())) {
                        Entry::Vacant(slot) => {
                            slot.insert(entry.clone());
                        }
                        Entry::Occupied(mut slot) => {
                            let summed = slot.get().chain_add(entry)?;
                            slot.insert(summed);
                        }
                    }
                }
            }
        }

        let mut results = Vec::with_capacity(labels.len() * segments.len());
        for &label in labels {
            for &segment in segments {
                let mut total = totals
                    .remove(&(label.to_string(), segment.to_string()))
                    .ok_or_else(|| Error::LookupFailure {
                        lever: AGGREGATE_LEVER.to_string(),
                        segment: segment.to_string(),
                        label: label.to_string(),
                    })?;
                total.rename(label);
                total.lever = AGGREGATE_LEVER.to_string();
                total.update_diststats();
                total.clear_spec();
                debug!(label, segment, mean = total.samples_mean, "aggregated label");
                results.push(total);
            }
        }

        Ok(results)
    }

    /// Flatten every tracked distribution (registry first, then case, each
    /// in structural iteration order) into one row per distribution.
    /// `exclude_columns` drops the named columns from the output.
    pub fn export_assumptions(&self, exclude_columns: &[&str]) -> AssumptionTable {
        AssumptionTable::from_params(
            self.registry.iter().chain(self.case.iter()),
            exclude_columns,
        )
    }
}
