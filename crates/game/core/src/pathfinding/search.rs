use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::grid::{Coord, GridShape};

use super::Graph;

/// Open-set entry. `seq` grows with every push so that among equal
/// priorities the node discovered first is expanded first.
#[derive(Debug)]
struct OpenNode {
    priority: f32,
    cost: f32,
    node: Coord,
    seq: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest priority first.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct OpenSet {
    heap: BinaryHeap<OpenNode>,
    seq: u64,
}

impl OpenSet {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    fn push(&mut self, node: Coord, cost: f32, priority: f32) {
        self.heap.push(OpenNode {
            priority,
            cost,
            node,
            seq: self.seq,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<OpenNode> {
        self.heap.pop()
    }
}

/// Result of an all-destinations search from one origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShortestPaths {
    origin: Coord,
    cost: BTreeMap<Coord, f32>,
    previous: BTreeMap<Coord, Coord>,
}

impl ShortestPaths {
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Total cost of the cheapest path to `destination`.
    pub fn cost_to(&self, destination: Coord) -> Option<f32> {
        self.cost.get(&destination).copied()
    }

    /// Reached nodes with their costs, ordered by coordinate. Includes the
    /// origin at cost zero.
    pub fn reachable(&self) -> impl Iterator<Item = (Coord, f32)> + '_ {
        self.cost.iter().map(|(coord, cost)| (*coord, *cost))
    }

    /// Steps from the origin to `destination`, origin excluded. Empty when
    /// the destination is the origin or was not reached.
    pub fn path_to(&self, destination: Coord) -> Vec<Coord> {
        reconstruct(&self.previous, self.origin, destination)
    }
}

fn reconstruct(previous: &BTreeMap<Coord, Coord>, origin: Coord, destination: Coord) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut current = destination;
    while current != origin {
        let Some(prev) = previous.get(&current) else {
            return Vec::new();
        };
        path.push(current);
        current = *prev;
    }
    path.reverse();
    path
}

/// Dijkstra from `origin` to every reachable node.
pub fn dijkstra(graph: &Graph, origin: Coord) -> ShortestPaths {
    let mut cost = BTreeMap::new();
    let mut previous = BTreeMap::new();
    if !graph.contains(origin) {
        return ShortestPaths {
            origin,
            cost,
            previous,
        };
    }

    let mut open = OpenSet::new();
    cost.insert(origin, 0.0);
    open.push(origin, 0.0, 0.0);

    while let Some(current) = open.pop() {
        if cost
            .get(&current.node)
            .is_some_and(|best| current.cost > *best)
        {
            continue;
        }
        for edge in graph.edges(current.node) {
            let candidate = current.cost + edge.cost;
            let improves = cost.get(&edge.to).is_none_or(|best| candidate < *best);
            if improves {
                cost.insert(edge.to, candidate);
                previous.insert(edge.to, current.node);
                open.push(edge.to, candidate, candidate);
            }
        }
    }

    ShortestPaths {
        origin,
        cost,
        previous,
    }
}

/// A* from `origin` to `destination` using the grid distance heuristic.
///
/// Returns the steps after the origin, or an empty vector when there is no
/// path or the destination is the origin.
pub fn a_star(graph: &Graph, shape: GridShape, origin: Coord, destination: Coord) -> Vec<Coord> {
    if !graph.contains(origin) || !graph.contains(destination) {
        return Vec::new();
    }
    let heuristic = |node: Coord| shape.distance(node, destination) as f32 * graph.min_cost();

    let mut cost = BTreeMap::from([(origin, 0.0f32)]);
    let mut previous = BTreeMap::new();
    let mut open = OpenSet::new();
    open.push(origin, 0.0, heuristic(origin));

    while let Some(current) = open.pop() {
        if current.node == destination {
            return reconstruct(&previous, origin, destination);
        }
        if cost
            .get(&current.node)
            .is_some_and(|best| current.cost > *best)
        {
            continue;
        }
        for edge in graph.edges(current.node) {
            let candidate = current.cost + edge.cost;
            let improves = cost.get(&edge.to).is_none_or(|best| candidate < *best);
            if improves {
                cost.insert(edge.to, candidate);
                previous.insert(edge.to, current.node);
                open.push(edge.to, candidate, candidate + heuristic(edge.to));
            }
        }
    }

    Vec::new()
}
