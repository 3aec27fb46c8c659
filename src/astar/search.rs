// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use crate::{reconstruct_path, AStarError, CostModel, Edge, Graph, Node};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    cost: f64,
    score: f64,
    seq: u64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores (and earlier insertions on ties) are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Outcome of a single [Search::step].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A node was removed from the open set and its neighbors were relaxed.
    Expanded(i64),

    /// The goal was reached; contains the path from start to goal (inclusive).
    Found(Vec<i64>),

    /// The open set is empty - there is no path to the goal.
    Exhausted,
}

/// State of a single [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) route search.
///
/// The open set always yields the node with the lowest f-score
/// (known cost + heuristic estimate to the goal). Ties are broken by insertion order:
/// the node which entered (or re-entered) the open set first is expanded first.
///
/// A neighbor is only relaxed if the new cost is strictly lower than the best known one,
/// so known costs never increase, and the predecessor map never contains a cycle.
///
/// `heuristic` estimates the remaining cost from any node to the goal. It may be the very
/// same [CostModel] the graph was built with, but only an admissible one (like
/// [Distance](crate::Distance) on a graph built with costs not less than the distance)
/// guarantees optimal routes.
pub struct Search<'a, H: CostModel + ?Sized> {
    g: &'a Graph,
    heuristic: &'a H,
    goal: Node,
    open: BinaryHeap<QueueItem>,
    came_from: HashMap<i64, i64>,
    known_costs: HashMap<i64, f64>,
    seq: u64,
    steps: usize,
}

impl<'a, H: CostModel + ?Sized> Search<'a, H> {
    /// Prepares a search from `from_id` to `to_id`. Both nodes must exist in the graph.
    pub fn new(
        g: &'a Graph,
        from_id: i64,
        to_id: i64,
        heuristic: &'a H,
    ) -> Result<Self, AStarError> {
        let goal = g
            .get_node(to_id)
            .ok_or(AStarError::InvalidReference(to_id))?;
        let start = g
            .get_node(from_id)
            .ok_or(AStarError::InvalidReference(from_id))?;

        let mut s = Self {
            g,
            heuristic,
            goal,
            open: BinaryHeap::default(),
            came_from: HashMap::default(),
            known_costs: HashMap::default(),
            seq: 0,
            steps: 0,
        };

        let score = heuristic.cost(&start, &goal);
        s.push(from_id, 0.0, score);
        s.known_costs.insert(from_id, 0.0);
        Ok(s)
    }

    fn push(&mut self, at: i64, cost: f64, score: f64) {
        self.open.push(QueueItem {
            at,
            cost,
            score,
            seq: self.seq,
        });
        self.seq += 1;
    }

    /// Returns the best known cost from the start to the given node,
    /// or [f64::INFINITY] if the node has not been reached yet.
    pub fn g_score(&self, id: i64) -> f64 {
        self.known_costs.get(&id).cloned().unwrap_or(f64::INFINITY)
    }

    /// Returns the number of nodes expanded so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Checks whether a node is waiting in the open set to be expanded.
    pub fn is_open(&self, id: i64) -> bool {
        self.open
            .iter()
            .any(|item| item.at == id && !self.is_stale(item))
    }

    /// Contrary to the wikipedia definition, the queue might keep multiple items for the same node.
    /// Only the one matching the best known cost represents the node in the open set.
    fn is_stale(&self, item: &QueueItem) -> bool {
        item.cost > self.g_score(item.at)
    }

    /// Removes the best node from the open set and expands it.
    pub fn step(&mut self) -> Step {
        let item = loop {
            match self.open.pop() {
                None => return Step::Exhausted,
                Some(item) if self.is_stale(&item) => continue,
                Some(item) => break item,
            }
        };

        if item.at == self.goal.id {
            return Step::Found(reconstruct_path(&self.came_from, item.at));
        }

        self.steps += 1;
        log::trace!("expanding {} (cost {}, score {})", item.at, item.cost, item.score);

        let g = self.g;
        for &Edge {
            to: neighbor_id,
            cost: edge_cost,
        } in g.get_edges(item.at)
        {
            // Check if the referred node exists
            let neighbor = match g.get_node(neighbor_id) {
                Some(n) => n,
                None => continue,
            };

            // Only relax if this is a strictly cheaper way to the neighbor
            let neighbor_cost = item.cost + edge_cost;
            if neighbor_cost < self.g_score(neighbor_id) {
                self.came_from.insert(neighbor_id, item.at);
                self.known_costs.insert(neighbor_id, neighbor_cost);
                let score = neighbor_cost + self.heuristic.cost(&neighbor, &self.goal);
                self.push(neighbor_id, neighbor_cost, score);
            }
        }

        Step::Expanded(item.at)
    }

    /// Runs the search to completion.
    ///
    /// Returns an empty vector if there is no route to the goal, or
    /// [AStarError::StepLimitExceeded] if more than `step_limit` nodes would be expanded.
    pub fn run(mut self, step_limit: usize) -> Result<Vec<i64>, AStarError> {
        loop {
            match self.step() {
                Step::Expanded(_) => {
                    if self.steps > step_limit {
                        return Err(AStarError::StepLimitExceeded);
                    }
                }
                Step::Found(path) => {
                    log::trace!("route found after {} steps", self.steps);
                    return Ok(path);
                }
                Step::Exhausted => {
                    log::trace!("no route after {} steps", self.steps);
                    return Ok(vec![]);
                }
            }
        }
    }
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the lowest-cost route between two nodes in the provided graph.
///
/// Returns an empty vector if there is no route between the two nodes, and
/// a single-node route if `from_id == to_id`. See [Search] for the tie-breaking rules
/// and for the requirements on `heuristic`.
///
/// `step_limit` limits how many nodes may be expanded during the search
/// before returning [AStarError::StepLimitExceeded]. Concluding that no route exists requires
/// expanding all nodes accessible from the start, which can be time-consuming on large
/// datasets. The recommended value is [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn find_route<H: CostModel + ?Sized>(
    g: &Graph,
    from_id: i64,
    to_id: i64,
    heuristic: &H,
    step_limit: usize,
) -> Result<Vec<i64>, AStarError> {
    Search::new(g, from_id, to_id, heuristic)?.run(step_limit)
}
