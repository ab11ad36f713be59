/// This module implements a variant of
/// [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
/// with an explicit closed set and a deterministic tie-break: among frontier entries with the
/// same estimated total cost, the node that was discovered first is expanded first.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, trace};
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.index == other.index
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on the estimated cost, then on discovery index so that
        // the earliest discovered node wins ties.
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.index.cmp(&self.index),
            s => s,
        }
    }
}

/// Search bookkeeping for a discovered node. The node table is indexed in discovery order.
struct Visit<C> {
    parent: usize,
    cost: C,
    closed: bool,
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut path = Vec::new();
    let mut i = start;
    while let Some((node, value)) = parents.get_index(i) {
        path.push(node.clone());
        i = parent(value);
    }
    path.reverse();
    path
}

/// Best-first search from `start` until `success` holds for a popped node. Returns the path
/// (start and goal included) and its cost, or [None] once the frontier is exhausted.
///
/// `heuristic` must be consistent: a node is finalized the first time it is popped and is
/// never reopened.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: heuristic(start),
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, Visit<C>> = FxIndexMap::default();
    parents.insert(
        start.clone(),
        Visit {
            parent: usize::MAX,
            cost: Zero::zero(),
            closed: false,
        },
    );
    let mut expanded = 0usize;
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let node = {
            let Some((node, visit)) = parents.get_index(index) else {
                continue;
            };
            // We may have inserted a node several times into the binary heap if we found
            // a better way to access it. Only the entry carrying the best cost is expanded.
            if visit.closed || cost > visit.cost {
                continue;
            }
            if success(node) {
                let path = reverse_path(&parents, |v| v.parent, index);
                debug!(
                    "Search reached goal after expanding {} of {} discovered nodes",
                    expanded,
                    parents.len()
                );
                return Some((path, cost));
            }
            node.clone()
        };
        parents[index].closed = true;
        expanded += 1;

        for (successor, move_cost) in successors(&node) {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert(Visit {
                        parent: index,
                        cost: new_cost,
                        closed: false,
                    });
                }
                Occupied(mut e) => {
                    if !e.get().closed && e.get().cost > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert(Visit {
                            parent: index,
                            cost: new_cost,
                            closed: false,
                        });
                    } else {
                        continue;
                    }
                }
            }

            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
            });
        }
    }
    trace!(
        "Frontier exhausted after expanding {} nodes without reaching the goal",
        expanded
    );
    None
}
