//! Forward and reverse dependency tracking between cells.
//!
//! `forward[s]` holds the cells `s` reads from and `reverse[t]` holds the
//! cells reading from `t`. Both maps are only changed together, so
//! `t ∈ forward[s]` exactly when `s ∈ reverse[t]`.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::cell_ref::CellAddress;

/// Dependency maps keyed by graph key, with sorted value lists.
pub type DependencyMap = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    forward: HashMap<CellAddress, HashSet<CellAddress>>,
    reverse: HashMap<CellAddress, HashSet<CellAddress>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `address` has an entry (possibly empty) in both maps.
    pub fn ensure_node(&mut self, address: &CellAddress) {
        self.forward.entry(address.clone()).or_default();
        self.reverse.entry(address.clone()).or_default();
    }

    /// Record that `source` reads from `target`.
    pub fn add_dependency(&mut self, source: &CellAddress, target: &CellAddress) {
        self.ensure_node(source);
        self.ensure_node(target);
        if let Some(targets) = self.forward.get_mut(source) {
            targets.insert(target.clone());
        }
        if let Some(sources) = self.reverse.get_mut(target) {
            sources.insert(source.clone());
        }
    }

    /// Drop every forward edge of `address`, along with the matching reverse
    /// edges. Returns the targets it used to read from.
    pub fn clear_dependencies(&mut self, address: &CellAddress) -> HashSet<CellAddress> {
        self.ensure_node(address);
        let old_targets = self
            .forward
            .get_mut(address)
            .map(std::mem::take)
            .unwrap_or_default();
        for target in &old_targets {
            if let Some(sources) = self.reverse.get_mut(target) {
                sources.remove(address);
            }
        }
        old_targets
    }

    /// Cells `address` reads from.
    pub fn precedents(&self, address: &CellAddress) -> Option<&HashSet<CellAddress>> {
        self.forward.get(address)
    }

    /// Cells reading from `address`.
    pub fn dependents(&self, address: &CellAddress) -> Option<&HashSet<CellAddress>> {
        self.reverse.get(address)
    }

    /// Every address reverse-reachable from `start`, in breadth-first order.
    /// Each address appears once and `start` itself is excluded.
    pub fn transitive_dependents(&self, start: &CellAddress) -> Vec<CellAddress> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start.clone());
        queue.push_back(start.clone());

        while let Some(current) = queue.pop_front() {
            let Some(children) = self.reverse.get(&current) else {
                continue;
            };
            let mut children: Vec<_> = children.iter().collect();
            children.sort();
            for child in children {
                if visited.insert(child.clone()) {
                    order.push(child.clone());
                    queue.push_back(child.clone());
                }
            }
        }

        order
    }

    /// Capture the entries of the given addresses so they can be put back
    /// verbatim with [`DependencyGraph::restore`].
    pub fn snapshot<'a>(
        &self,
        addresses: impl IntoIterator<Item = &'a CellAddress>,
    ) -> GraphSnapshot {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for address in addresses {
            if !seen.insert(address.clone()) {
                continue;
            }
            nodes.push(NodeSnapshot {
                address: address.clone(),
                forward: self.forward.get(address).cloned(),
                reverse: self.reverse.get(address).cloned(),
            });
        }
        GraphSnapshot { nodes }
    }

    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        for node in snapshot.nodes {
            match node.forward {
                Some(set) => self.forward.insert(node.address.clone(), set),
                None => self.forward.remove(&node.address),
            };
            match node.reverse {
                Some(set) => self.reverse.insert(node.address, set),
                None => self.reverse.remove(&node.address),
            };
        }
    }

    pub fn forward_map(&self) -> DependencyMap {
        to_key_map(&self.forward)
    }

    pub fn reverse_map(&self) -> DependencyMap {
        to_key_map(&self.reverse)
    }

    /// True when both maps have the same nodes and are inverses of each other.
    pub fn is_symmetric(&self) -> bool {
        if self.forward.len() != self.reverse.len()
            || self.forward.keys().any(|k| !self.reverse.contains_key(k))
        {
            return false;
        }
        let forward_ok = self.forward.iter().all(|(s, targets)| {
            targets
                .iter()
                .all(|t| self.reverse.get(t).is_some_and(|r| r.contains(s)))
        });
        let reverse_ok = self.reverse.iter().all(|(t, sources)| {
            sources
                .iter()
                .all(|s| self.forward.get(s).is_some_and(|f| f.contains(t)))
        });
        forward_ok && reverse_ok
    }
}

/// Saved graph entries for a handful of addresses.
#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    nodes: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug)]
struct NodeSnapshot {
    address: CellAddress,
    forward: Option<HashSet<CellAddress>>,
    reverse: Option<HashSet<CellAddress>>,
}

fn to_key_map(map: &HashMap<CellAddress, HashSet<CellAddress>>) -> DependencyMap {
    map.iter()
        .map(|(k, set)| {
            let mut values: Vec<String> = set.iter().map(CellAddress::graph_key).collect();
            values.sort();
            (k.graph_key(), values)
        })
        .collect()
}
