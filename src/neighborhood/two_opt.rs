//! 2-Opt neighborhood (intra-tour).

use crate::problem::Stop;
use crate::solution::Solution;

use super::{Candidate, MoveKind};

impl Solution {
    /// All 2-Opt moves of one drone whose delta is below the bound.
    ///
    /// The move reverses `tour[i + 1..=j]`, replacing the edges `(i, i + 1)`
    /// and `(j, j + 1)` by `(i, j)` and `(i + 1, j + 1)`.
    pub fn two_opt_solutions(
        &self,
        drone: usize,
        maximum_length_delta: f64,
        insert_charging_orders: bool,
    ) -> Vec<Candidate> {
        let tour = self.delivery_tour(drone);
        let mut candidates = Vec::new();

        // Need at least 4 stops for a non-trivial reversal
        if tour.len() < 4 {
            return candidates;
        }

        for i in 0..tour.len() - 3 {
            for j in i + 2..tour.len() - 1 {
                let delta = self.two_opt_delta(&tour, i, j);
                if delta >= maximum_length_delta {
                    continue;
                }

                let mut reversed = tour.clone();
                reversed[i + 1..=j].reverse();

                if let Some(candidate) = self.build_candidate(
                    MoveKind::TwoOpt,
                    vec![(drone, reversed)],
                    delta,
                    maximum_length_delta,
                    insert_charging_orders,
                ) {
                    candidates.push(candidate);
                }
            }
        }

        candidates
    }

    /// Distance change of reversing `tour[i + 1..=j]`.
    pub fn two_opt_delta(&self, tour: &[Stop], i: usize, j: usize) -> f64 {
        let problem = self.problem();

        problem.distance(tour[i], tour[j]) + problem.distance(tour[i + 1], tour[j + 1])
            - problem.distance(tour[i], tour[i + 1])
            - problem.distance(tour[j], tour[j + 1])
    }
}
