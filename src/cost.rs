// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Node};

/// Penalty level used by [ConstantPenalty::default] when no per-segment
/// quality signal (like ambient noise) is available.
pub const DEFAULT_PENALTY_LEVEL: f64 = 0.1;

/// Multiplier applied to the penalty level by [PenalizedDistance::default].
pub const DEFAULT_PENALTY_WEIGHT: f64 = 0.9;

/// Computes a non-negative cost of moving between two [Nodes](Node).
///
/// The same model is used both to weigh [Graph](crate::Graph) edges when building
/// them, and as the A* heuristic when searching. Only [Distance] is an admissible
/// heuristic; any model adding a per-segment penalty may overestimate the remaining
/// cost, and thus produce sub-optimal routes.
///
/// Any `Fn(&Node, &Node) -> f64` closure is a CostModel.
pub trait CostModel {
    fn cost(&self, from: &Node, to: &Node) -> f64;
}

impl<F: Fn(&Node, &Node) -> f64> CostModel for F {
    fn cost(&self, from: &Node, to: &Node) -> f64 {
        self(from, to)
    }
}

/// Great-circle distance between two nodes, in kilometers.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Distance;

impl CostModel for Distance {
    fn cost(&self, from: &Node, to: &Node) -> f64 {
        earth_distance(from.lat, from.lon, to.lat, to.lon)
    }
}

/// Source of the penalty level for a segment between two [Nodes](Node),
/// e.g. the average noise level along the segment.
pub trait PenaltySource {
    fn penalty_level(&self, from: &Node, to: &Node) -> f64;
}

/// [PenaltySource] returning the same level for every segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantPenalty(pub f64);

impl Default for ConstantPenalty {
    fn default() -> Self {
        Self(DEFAULT_PENALTY_LEVEL)
    }
}

impl PenaltySource for ConstantPenalty {
    fn penalty_level(&self, _from: &Node, _to: &Node) -> f64 {
        self.0
    }
}

/// Great-circle distance plus a weighted penalty:
/// `distance + weight * penalty_level`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenalizedDistance<P: PenaltySource = ConstantPenalty> {
    pub weight: f64,
    pub source: P,
}

impl<P: PenaltySource> PenalizedDistance<P> {
    pub fn new(weight: f64, source: P) -> Self {
        Self { weight, source }
    }
}

impl Default for PenalizedDistance<ConstantPenalty> {
    fn default() -> Self {
        Self::new(DEFAULT_PENALTY_WEIGHT, ConstantPenalty::default())
    }
}

impl<P: PenaltySource> CostModel for PenalizedDistance<P> {
    fn cost(&self, from: &Node, to: &Node) -> f64 {
        let penalty = self.weight * self.source.penalty_level(from, to);
        Distance.cost(from, to) + penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Node = Node {
        id: 1,
        lat: 22.689221,
        lon: 75.874243,
    };

    const B: Node = Node {
        id: 2,
        lat: 22.729245,
        lon: 75.813475,
    };

    #[test]
    fn distance() {
        assert_eq!(Distance.cost(&A, &A), 0.0);
        let d = Distance.cost(&A, &B);
        assert!(d > 7.0 && d < 8.0, "{d}");
        assert_eq!(d, earth_distance(A.lat, A.lon, B.lat, B.lon));
    }

    #[test]
    fn penalized_distance() {
        let model = PenalizedDistance::default();
        let expected = Distance.cost(&A, &B) + DEFAULT_PENALTY_WEIGHT * DEFAULT_PENALTY_LEVEL;
        assert!((model.cost(&A, &B) - expected).abs() < 1e-12);
        assert!((model.cost(&A, &A) - 0.09).abs() < 1e-12);
    }

    #[test]
    fn custom_penalty_source() {
        struct ByLatitude;

        impl PenaltySource for ByLatitude {
            fn penalty_level(&self, from: &Node, to: &Node) -> f64 {
                (from.lat + to.lat) * 0.5
            }
        }

        let model = PenalizedDistance::new(2.0, ByLatitude);
        let expected = Distance.cost(&A, &B) + 2.0 * (A.lat + B.lat) * 0.5;
        assert!((model.cost(&A, &B) - expected).abs() < 1e-9);
    }

    #[test]
    fn closure() {
        let unit = |_: &Node, _: &Node| 1.0_f64;
        assert_eq!(unit.cost(&A, &B), 1.0);
    }
}
