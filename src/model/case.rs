// src/model/case.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::distribution::DistParam;

/// The accumulating result tree of a business case:
/// lever -> segment -> label -> the most recently derived distribution
/// stored under that label.
///
/// Entries are independently owned clones; a case entry never aliases a
/// registry entry. Inserting at a (lever, segment, label) triple overwrites
/// only that triple, leaving sibling segments and labels intact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BizCase {
    levers: BTreeMap<String, BTreeMap<String, BTreeMap<String, DistParam>>>,
}

impl BizCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a derived distribution, auto-creating any missing path levels.
    pub fn insert(&mut self, lever: &str, segment: &str, label: &str, param: DistParam) {
        self.levers
            .entry(lever.to_string())
            .or_default()
            .entry(segment.to_string())
            .or_default()
            .insert(label.to_string(), param);
    }

    pub fn get(&self, lever: &str, segment: &str, label: &str) -> Option<&DistParam> {
        self.levers.get(lever)?.get(segment)?.get(label)
    }

    pub fn is_empty(&self) -> bool {
        self.levers.is_empty()
    }

    /// Levers in the case's own iteration order.
    pub fn lever_names(&self) -> impl Iterator<Item = &str> {
        self.levers.keys().map(String::as_str)
    }

    /// Every stored distribution in structural iteration order
    /// (levers, then segments, then labels).
    pub fn iter(&self) -> impl Iterator<Item = &DistParam> {
        self.levers
            .values()
            .flat_map(|segments| segments.values())
            .flat_map(|labels| labels.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, samples: Vec<f64>) -> DistParam {
        DistParam::from_samples(name, "lever", "seg1", samples)
    }

    #[test]
    fn insert_then_get_round_trips() {
        let mut case = BizCase::new();
        case.insert("pricing", "seg1", "mcs", param("mcs", vec![1.0]));
        assert_eq!(case.get("pricing", "seg1", "mcs").unwrap().samples, vec![1.0]);
        assert!(case.get("pricing", "seg1", "other").is_none());
        assert!(case.get("pricing", "seg2", "mcs").is_none());
    }

    #[test]
    fn insert_overwrites_only_the_addressed_triple() {
        let mut case = BizCase::new();
        case.insert("pricing", "seg1", "mcs", param("mcs", vec![1.0]));
        case.insert("pricing", "seg1", "cost", param("cost", vec![2.0]));
        case.insert("pricing", "seg2", "mcs", param("mcs", vec![3.0]));

        // Overwrite one triple; siblings survive
        case.insert("pricing", "seg1", "mcs", param("mcs", vec![9.0]));

        assert_eq!(case.get("pricing", "seg1", "mcs").unwrap().samples, vec![9.0]);
        assert_eq!(case.get("pricing", "seg1", "cost").unwrap().samples, vec![2.0]);
        assert_eq!(case.get("pricing", "seg2", "mcs").unwrap().samples, vec![3.0]);
    }

    #[test]
    fn iter_walks_all_entries() {
        let mut case = BizCase::new();
        case.insert("a", "seg1", "mcs", param("mcs", vec![1.0]));
        case.insert("b", "seg1", "mcs", param("mcs", vec![2.0]));
        assert_eq!(case.iter().count(), 2);
        assert_eq!(case.lever_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
