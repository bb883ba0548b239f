// src/model/registry.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distribution::DistParam;

/// The three-level store of registered assumptions:
/// lever -> segment -> distribution name -> parameter.
///
/// Registration auto-creates any missing path levels; re-registering the
/// same (lever, segment, name) triple overwrites the leaf in place.
/// `lever_names` and `segment_names` record first-appearance insertion
/// order for reporting. They are append-only and NOT de-duplicated: a
/// segment name appearing under two levers is listed twice, and consumers
/// must tolerate that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeverRegistry {
    levers: BTreeMap<String, BTreeMap<String, BTreeMap<String, DistParam>>>,
    pub lever_names: Vec<String>,
    pub segment_names: Vec<String>,
}

impl LeverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one parameter under its declared
    /// (lever, segment, name) path.
    pub fn register(&mut self, param: DistParam) {
        debug!(
            lever = %param.lever,
            segment = %param.segment,
            name = %param.name,
            "registering distribution parameter"
        );

        if !self.levers.contains_key(&param.lever) {
            self.lever_names.push(param.lever.clone());
        }
        let segments = self.levers.entry(param.lever.clone()).or_default();

        if !segments.contains_key(&param.segment) {
            self.segment_names.push(param.segment.clone());
        }
        let names = segments.entry(param.segment.clone()).or_default();

        names.insert(param.name.clone(), param);
    }

    /// Register a batch in sequence order.
    pub fn register_many(&mut self, params: impl IntoIterator<Item = DistParam>) {
        for param in params {
            self.register(param);
        }
    }

    pub fn get(&self, lever: &str, segment: &str, name: &str) -> Option<&DistParam> {
        self.levers.get(lever)?.get(segment)?.get(name)
    }

    pub fn contains_lever(&self, lever: &str) -> bool {
        self.levers.contains_key(lever)
    }

    pub fn contains_segment(&self, lever: &str, segment: &str) -> bool {
        self.levers
            .get(lever)
            .map_or(false, |segments| segments.contains_key(segment))
    }

    pub fn len(&self) -> usize {
        self.levers
            .values()
            .flat_map(|segments| segments.values())
            .map(|names| names.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levers.is_empty()
    }

    /// Every registered parameter in structural iteration order
    /// (levers, then segments, then names).
    pub fn iter(&self) -> impl Iterator<Item = &DistParam> {
        self.levers
            .values()
            .flat_map(|segments| segments.values())
            .flat_map(|names| names.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DEFAULT_SEGMENT;

    fn param(name: &str, lever: &str, segment: &str) -> DistParam {
        DistParam::from_samples(name, lever, segment, vec![1.0, 2.0, 3.0])
    }

    #[test]
    fn registered_param_is_reachable_by_its_triple() {
        let mut registry = LeverRegistry::new();
        registry.register(param("engagement", "pricing", "seg1"));

        let stored = registry.get("pricing", "seg1", "engagement").unwrap();
        assert_eq!(stored.samples, vec![1.0, 2.0, 3.0]);
        assert_eq!(registry.lever_names, vec!["pricing"]);
        assert_eq!(registry.segment_names, vec!["seg1"]);
    }

    #[test]
    fn reregistering_overwrites_without_growing_trackers() {
        let mut registry = LeverRegistry::new();
        registry.register(param("engagement", "pricing", "seg1"));
        registry.register(DistParam::from_samples(
            "engagement",
            "pricing",
            "seg1",
            vec![9.0],
        ));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("pricing", "seg1", "engagement").unwrap().samples,
            vec![9.0]
        );
        assert_eq!(registry.lever_names.len(), 1);
        assert_eq!(registry.segment_names.len(), 1);
    }

    #[test]
    fn new_segment_under_existing_lever_is_tracked() {
        let mut registry = LeverRegistry::new();
        registry.register(param("a", "pricing", "seg1"));
        registry.register(param("b", "pricing", "seg2"));

        assert_eq!(registry.lever_names, vec!["pricing"]);
        assert_eq!(registry.segment_names, vec!["seg1", "seg2"]);
    }

    #[test]
    fn segment_names_keep_duplicates_across_levers() {
        let mut registry = LeverRegistry::new();
        registry.register(param("a", "pricing", "seg1"));
        registry.register(param("b", "upsell", "seg1"));

        // Same segment key under a second lever appears again
        assert_eq!(registry.segment_names, vec!["seg1", "seg1"]);
        assert_eq!(registry.lever_names, vec!["pricing", "upsell"]);
    }

    #[test]
    fn register_many_applies_in_sequence_order() {
        let mut registry = LeverRegistry::new();
        registry.register_many(vec![
            param("a", "pricing", DEFAULT_SEGMENT),
            param("a", "pricing", DEFAULT_SEGMENT).chain_add(&param(
                "x",
                "pricing",
                DEFAULT_SEGMENT,
            ))
            .unwrap(),
        ]);

        // Last write wins for the shared name
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry
                .get("pricing", DEFAULT_SEGMENT, "a")
                .unwrap()
                .samples,
            vec![2.0, 4.0, 6.0]
        );
    }

    #[test]
    fn iter_walks_every_registered_param() {
        let mut registry = LeverRegistry::new();
        registry.register(param("a", "pricing", "seg1"));
        registry.register(param("b", "pricing", "seg2"));
        registry.register(param("c", "upsell", "seg1"));

        assert_eq!(registry.iter().count(), 3);
    }
}
