use crate::{
    operand::Operand,
    symbolic::hash::{hash, structural_equal, ExpressionHash},
};
use log::debug;
use std::collections::HashMap;
use super::options::CollisionPolicy;

/// A tree the simplifier has seen, and what it simplified (or is simplifying) it into.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The tree that was simplified.
    pub source: Operand,

    /// The result recorded for the tree.
    pub result: Operand,
}

/// Memoizes simplification results, keyed by the [structural hash](hash) of the source tree.
///
/// Entries with the same hash share a bucket, kept in insertion order. A cache lives for one
/// top-level simplification, and is cloned before the simplifier explores a rewritten candidate,
/// so the candidate's entries are dropped along with the clone.
#[derive(Debug, Clone, Default)]
pub struct SimplifyCache {
    buckets: HashMap<ExpressionHash, Vec<CacheEntry>>,
}

impl SimplifyCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Returns true if the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Returns the entries recorded under the hash of the given tree.
    pub fn bucket(&self, operand: &Operand) -> &[CacheEntry] {
        self.buckets.get(&hash(operand)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Looks up the result recorded for the given tree.
    pub fn lookup(&self, operand: &Operand, policy: CollisionPolicy) -> Option<Operand> {
        let bucket = self.bucket(operand);
        if let Some(entry) = bucket.iter().find(|entry| structural_equal(&entry.source, operand)) {
            return Some(entry.result.clone());
        }

        match policy {
            CollisionPolicy::Strict => None,
            CollisionPolicy::BestEffort => {
                let entry = bucket.first()?;
                debug!("hash collision: reusing the result recorded for a different tree");
                Some(entry.result.clone())
            },
        }
    }

    /// Records the result for the given tree, replacing any result previously recorded for it.
    pub fn record(&mut self, source: Operand, result: Operand) {
        let bucket = self.buckets.entry(hash(&source)).or_default();
        match bucket.iter_mut().find(|entry| structural_equal(&entry.source, &source)) {
            Some(entry) => entry.result = result,
            None => bucket.push(CacheEntry { source, result }),
        }
    }

    /// Returns true if the tree was recorded, either as a source or as a result, under its own
    /// hash.
    pub fn contains(&self, operand: &Operand) -> bool {
        self.bucket(operand)
            .iter()
            .any(|entry| structural_equal(&entry.source, operand) || structural_equal(&entry.result, operand))
    }
}

#[cfg(test)]
mod tests {
    use crate::{registry::Registry, test_util::{int, var, Ops}};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn record_and_lookup() {
        let mut cache = SimplifyCache::new();
        cache.record(var("x"), int(1));
        cache.record(var("x"), int(2));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&var("x"), CollisionPolicy::Strict), Some(int(2)));
        assert_eq!(cache.lookup(&var("y"), CollisionPolicy::Strict), None);
    }

    #[test]
    fn collision_policies() {
        let registry = Registry::standard();
        let Ops { mul, .. } = Ops::of(&registry);
        let a = Operand::binary(mul, var("x"), int(121));
        let b = Operand::binary(mul, int(120), var("y"));

        let mut cache = SimplifyCache::new();
        cache.record(a.clone(), var("a"));

        assert_eq!(cache.lookup(&b, CollisionPolicy::Strict), None);
        assert_eq!(cache.lookup(&b, CollisionPolicy::BestEffort), Some(var("a")));
        assert!(!cache.contains(&b));
        assert!(cache.contains(&a));
    }

    #[test]
    fn contains_matches_results_under_their_own_hash() {
        let mut cache = SimplifyCache::new();
        cache.record(var("x"), var("x"));
        cache.record(var("y"), var("z"));

        assert!(cache.contains(&var("x")));
        assert!(cache.contains(&var("y")));
        // `z` was recorded as a result, but under the hash of `y`
        assert!(!cache.contains(&var("z")));
    }
}
