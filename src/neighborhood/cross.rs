//! Cross neighborhood (inter-tour tail exchange).

use crate::problem::Stop;
use crate::solution::Solution;

use super::{Candidate, MoveKind};

impl Solution {
    /// All tail exchanges between one drone and every other drone.
    pub fn cross_solutions(
        &self,
        drone: usize,
        maximum_length_delta: f64,
        insert_charging_orders: bool,
    ) -> Vec<Candidate> {
        (0..self.problem().drone_count())
            .filter(|&partner| partner != drone)
            .flat_map(|partner| {
                self.cross_solutions_between(drone, partner, maximum_length_delta, insert_charging_orders)
            })
            .collect()
    }

    /// Tail exchanges between two specific drones.
    ///
    /// Splitting `first` after `i` and `second` after `j` yields
    /// `first[..=i] + second[j + 1..]` and `second[..=j] + first[i + 1..]`.
    pub fn cross_solutions_between(
        &self,
        first_drone: usize,
        second_drone: usize,
        maximum_length_delta: f64,
        insert_charging_orders: bool,
    ) -> Vec<Candidate> {
        let first = self.delivery_tour(first_drone);
        let second = self.delivery_tour(second_drone);
        let mut candidates = Vec::new();

        for i in 1..first.len().saturating_sub(1) {
            for j in 1..second.len().saturating_sub(1) {
                // Both tails are the closing depot: nothing to exchange
                if i + 2 == first.len() && j + 2 == second.len() {
                    continue;
                }

                let delta = self.cross_delta(&first, i, &second, j);
                if delta >= maximum_length_delta {
                    continue;
                }

                let crossed_first: Vec<Stop> = first[..=i].iter().chain(&second[j + 1..]).copied().collect();
                let crossed_second: Vec<Stop> = second[..=j].iter().chain(&first[i + 1..]).copied().collect();

                if let Some(candidate) = self.build_candidate(
                    MoveKind::Cross,
                    vec![(first_drone, crossed_first), (second_drone, crossed_second)],
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

    /// Distance change of exchanging the tails after `first[i]` and `second[j]`.
    pub fn cross_delta(&self, first: &[Stop], i: usize, second: &[Stop], j: usize) -> f64 {
        let problem = self.problem();

        problem.distance(first[i], second[j + 1]) + problem.distance(second[j], first[i + 1])
            - problem.distance(first[i], first[i + 1])
            - problem.distance(second[j], second[j + 1])
    }
}
