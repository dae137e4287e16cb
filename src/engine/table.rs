//! Cluster tables.
//!
//! A [`FontTable`] holds one [`ClusterMap`] per slot and size class:
//!
//! ```text
//! vowel                      (single table)
//! solo    full | 2/3 | 1/2
//! initial full | 2/3 | 1/2
//! final   full [| 2/3 | 1/2]  (whatever the base source provided)
//! ```
//!
//! ## Invariants
//!
//! - Maps only grow: a bound name is never rebound (`insert_if_absent`).
//! - Iteration follows insertion order, so anything derived from walking a
//!   table (reports, generated output) is reproducible run to run.

use crate::{Cluster, SizeClass, Slot};
use std::collections::{BTreeMap, HashMap};

/// Insertion-ordered name -> cluster map with insert-if-absent semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterMap {
    entries: Vec<(String, Cluster)>,
    index: HashMap<String, usize>,
}

impl ClusterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Cluster> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Bind `name` unless it is already bound. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, cluster: Cluster) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, cluster));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cluster)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl<N: Into<String>> FromIterator<(N, Cluster)> for ClusterMap {
    fn from_iter<I: IntoIterator<Item = (N, Cluster)>>(iter: I) -> Self {
        let mut map = ClusterMap::new();
        for (name, cluster) in iter {
            map.insert_if_absent(name, cluster);
        }
        map
    }
}

/// The size-class variants of one consonant cluster set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizedClusters {
    sizes: BTreeMap<SizeClass, ClusterMap>,
}

impl SizedClusters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, size: SizeClass, map: ClusterMap) -> Self {
        self.sizes.insert(size, map);
        self
    }

    pub fn get(&self, size: SizeClass) -> Option<&ClusterMap> {
        self.sizes.get(&size)
    }

    pub fn get_mut(&mut self, size: SizeClass) -> Option<&mut ClusterMap> {
        self.sizes.get_mut(&size)
    }

    /// Present size classes, largest first.
    pub fn sizes(&self) -> impl Iterator<Item = SizeClass> + '_ {
        self.sizes.keys().copied()
    }

    pub fn full(&self) -> Option<&ClusterMap> {
        self.get(SizeClass::Full)
    }
}

/// Every cluster known for a font, scoped per slot and size class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontTable {
    pub vowel: ClusterMap,
    pub solo: SizedClusters,
    pub initial: SizedClusters,
    pub final_: SizedClusters,
}

impl FontTable {
    /// The sub-table for `slot` at `size`. The vowel table only exists at
    /// [`SizeClass::Full`].
    pub fn map(&self, slot: Slot, size: SizeClass) -> Option<&ClusterMap> {
        match slot {
            Slot::Vowel => (size == SizeClass::Full).then_some(&self.vowel),
            Slot::Solo => self.solo.get(size),
            Slot::Initial => self.initial.get(size),
            Slot::Final => self.final_.get(size),
        }
    }

    pub fn map_mut(&mut self, slot: Slot, size: SizeClass) -> Option<&mut ClusterMap> {
        match slot {
            Slot::Vowel => (size == SizeClass::Full).then_some(&mut self.vowel),
            Slot::Solo => self.solo.get_mut(size),
            Slot::Initial => self.initial.get_mut(size),
            Slot::Final => self.final_.get_mut(size),
        }
    }

    pub fn cluster(&self, slot: Slot, size: SizeClass, name: &str) -> Option<&Cluster> {
        self.map(slot, size)?.get(name)
    }

    /// Sub-tables a statement written for `slot` is applied to, in order.
    /// Initial statements are mirrored into the solo tables.
    pub fn targets(&self, slot: Slot) -> Vec<(Slot, SizeClass)> {
        let sized = |slot: Slot, set: &SizedClusters| set.sizes().map(move |size| (slot, size)).collect::<Vec<_>>();
        match slot {
            Slot::Vowel => vec![(Slot::Vowel, SizeClass::Full)],
            Slot::Initial => {
                let mut out = sized(Slot::Initial, &self.initial);
                out.extend(sized(Slot::Solo, &self.solo));
                out
            }
            Slot::Solo => sized(Slot::Solo, &self.solo),
            Slot::Final => sized(Slot::Final, &self.final_),
        }
    }

    /// Total number of bound clusters across every sub-table.
    pub fn len(&self) -> usize {
        let sized = |set: &SizedClusters| set.sizes.values().map(ClusterMap::len).sum::<usize>();
        self.vowel.len() + sized(&self.solo) + sized(&self.initial) + sized(&self.final_)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Geometry;

    fn cluster(path: &str) -> Cluster {
        Cluster::single(Slot::Initial, Geometry::from(path))
    }

    #[test]
    fn insert_if_absent_never_rebinds() {
        let mut map = ClusterMap::new();
        assert!(map.insert_if_absent("T", cluster("a")));
        assert!(!map.insert_if_absent("T", cluster("b")));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("T").unwrap().strokes[0].geometry.as_str(), "a");
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let map: ClusterMap = ["W", "T", "P", "K"].into_iter().map(|n| (n, cluster(n))).collect();
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["W", "T", "P", "K"]);
    }

    #[test]
    fn initial_targets_include_solo_sizes() {
        let table = FontTable {
            initial: SizedClusters::new()
                .with(SizeClass::Half, ClusterMap::new())
                .with(SizeClass::Full, ClusterMap::new()),
            solo: SizedClusters::new().with(SizeClass::Full, ClusterMap::new()),
            ..FontTable::default()
        };

        assert_eq!(
            table.targets(Slot::Initial),
            vec![(Slot::Initial, SizeClass::Full), (Slot::Initial, SizeClass::Half), (Slot::Solo, SizeClass::Full)]
        );
        assert_eq!(table.targets(Slot::Final), vec![]);
        assert!(table.map(Slot::Vowel, SizeClass::Half).is_none());
    }
}
