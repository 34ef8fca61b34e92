//! Update Scheduler
//!
//! Plans a coalesced cascade: every node reachable from a set of seeds is
//! recalculated exactly once, after all of its affected dependencies.
//!
//! # Algorithm
//!
//! 1. Walk the field subscriber index from the seeds to collect every node
//!    the change can reach (the seeds included).
//! 2. Count, for each collected node, the subscriber edges that point at it
//!    from inside the collected set.
//! 3. Emit nodes with Kahn's algorithm. Among ready nodes the one registered
//!    first goes first, so the order is deterministic and matches the
//!    per-path cascade wherever the two agree.
//!
//! Nodes left over after Kahn's algorithm sit on a cycle.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, VecDeque};

use indexmap::IndexMap;

use super::node::Node;
use crate::error::{CalcError, Result};
use crate::reactive::{NodePosition, SubscriberIndex};

/// Plans recalculation order for coalesced cascades.
pub struct UpdateScheduler<'a> {
    nodes: &'a IndexMap<String, Node>,
    subscribers: &'a SubscriberIndex,
}

impl<'a> UpdateScheduler<'a> {
    pub fn new(nodes: &'a IndexMap<String, Node>, subscribers: &'a SubscriberIndex) -> Self {
        Self { nodes, subscribers }
    }

    fn dependents(&self, position: NodePosition) -> &'a [NodePosition] {
        match self.nodes.get_index(position) {
            Some((name, _)) => self.subscribers.field_subscribers(name),
            None => &[],
        }
    }

    /// Every node reachable from `seeds`, seeds included.
    fn reachable(&self, seeds: &[NodePosition]) -> BTreeSet<NodePosition> {
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<NodePosition> = seeds.iter().copied().collect();

        while let Some(position) = queue.pop_front() {
            if !visited.insert(position) {
                continue;
            }
            queue.extend(self.dependents(position).iter().copied());
        }

        visited
    }

    /// Returns the recalculation order for everything reachable from
    /// `seeds`, or the names of the nodes caught in a cycle.
    pub fn plan(&self, seeds: &[NodePosition]) -> Result<Vec<NodePosition>> {
        let affected = self.reachable(seeds);

        let mut in_degree: HashMap<NodePosition, usize> = affected.iter().map(|&p| (p, 0)).collect();
        for &position in &affected {
            for dependent in self.dependents(position) {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree += 1;
                }
            }
        }

        let mut ready: BinaryHeap<Reverse<NodePosition>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&position, _)| Reverse(position))
            .collect();
        let mut order = Vec::with_capacity(affected.len());

        while let Some(Reverse(position)) = ready.pop() {
            order.push(position);
            for dependent in self.dependents(position) {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        ready.push(Reverse(*dependent));
                    }
                }
            }
        }

        if order.len() < affected.len() {
            let cyclic = affected
                .iter()
                .filter(|p| !order.contains(*p))
                .filter_map(|&p| self.nodes.get_index(p).map(|(name, _)| name.clone()))
                .collect();
            return Err(CalcError::DependencyCycle(cyclic));
        }

        Ok(order)
    }
}
