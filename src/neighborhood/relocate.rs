//! Relocate neighborhood (inter-tour).

use crate::problem::Stop;
use crate::solution::Solution;

use super::{Candidate, MoveKind};

impl Solution {
    /// All moves of one order into every position of every other drone's tour.
    pub fn relocate_solutions(
        &self,
        order: usize,
        maximum_length_delta: f64,
        insert_charging_orders: bool,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        let Some((source_drone, position)) = self.locate_order(order) else {
            return candidates;
        };
        let source = self.delivery_tour(source_drone);

        // The order must sit strictly between the two depot visits
        if position == 0 || position + 1 >= source.len() {
            return candidates;
        }

        let removal = self.removal_delta(&source, position);
        let stop = source[position];
        let mut reduced = source.clone();
        reduced.remove(position);

        for partner in 0..self.problem().drone_count() {
            if partner == source_drone {
                continue;
            }

            let target = self.delivery_tour(partner);

            for slot in 0..target.len().saturating_sub(1) {
                let delta = removal + self.insertion_delta(&target, slot, stop);
                if delta >= maximum_length_delta {
                    continue;
                }

                let mut extended = target.clone();
                extended.insert(slot + 1, stop);

                if let Some(candidate) = self.build_candidate(
                    MoveKind::Relocate,
                    vec![(source_drone, reduced.clone()), (partner, extended)],
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

    /// Distance change of removing `tour[position]` and joining its neighbors.
    pub fn removal_delta(&self, tour: &[Stop], position: usize) -> f64 {
        let problem = self.problem();
        let (prev, stop, next) = (tour[position - 1], tour[position], tour[position + 1]);

        problem.distance(prev, next) - problem.distance(prev, stop) - problem.distance(stop, next)
    }

    /// Distance change of inserting `stop` between `tour[slot]` and `tour[slot + 1]`.
    pub fn insertion_delta(&self, tour: &[Stop], slot: usize, stop: Stop) -> f64 {
        let problem = self.problem();
        let (prev, next) = (tour[slot], tour[slot + 1]);

        problem.distance(prev, stop) + problem.distance(stop, next) - problem.distance(prev, next)
    }
}
