//! Exchange neighborhood (inter-tour swap of two orders).

use crate::problem::Stop;
use crate::solution::Solution;

use super::{Candidate, MoveKind};

impl Solution {
    /// All swaps of one order with an order of another drone.
    ///
    /// Both orders keep their positions in the respective tours.
    pub fn exchange_solutions(
        &self,
        order: usize,
        maximum_length_delta: f64,
        insert_charging_orders: bool,
    ) -> Vec<Candidate> {
        self.exchange_solutions_where(order, maximum_length_delta, insert_charging_orders, |_| true)
    }

    pub(crate) fn exchange_solutions_where<F>(
        &self,
        order: usize,
        maximum_length_delta: f64,
        insert_charging_orders: bool,
        accept_partner: F,
    ) -> Vec<Candidate>
    where
        F: Fn(usize) -> bool,
    {
        let mut candidates = Vec::new();

        let Some((drone, position)) = self.locate_order(order) else {
            return candidates;
        };
        let tour = self.delivery_tour(drone);

        if position == 0 || position + 1 >= tour.len() {
            return candidates;
        }

        for partner_drone in 0..self.problem().drone_count() {
            if partner_drone == drone {
                continue;
            }

            let partner_tour = self.delivery_tour(partner_drone);

            for partner_position in 1..partner_tour.len().saturating_sub(1) {
                let Stop::Delivery(partner) = partner_tour[partner_position] else {
                    continue;
                };
                if !accept_partner(partner) {
                    continue;
                }

                let delta = self.exchange_delta(&tour, position, &partner_tour, partner_position);
                if delta >= maximum_length_delta {
                    continue;
                }

                let mut swapped = tour.clone();
                let mut partner_swapped = partner_tour.clone();
                swapped[position] = partner_tour[partner_position];
                partner_swapped[partner_position] = tour[position];

                if let Some(candidate) = self.build_candidate(
                    MoveKind::Exchange,
                    vec![(drone, swapped), (partner_drone, partner_swapped)],
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

    /// Distance change of swapping `first[i]` and `second[j]`.
    pub fn exchange_delta(&self, first: &[Stop], i: usize, second: &[Stop], j: usize) -> f64 {
        let problem = self.problem();
        let (a_prev, x, a_next) = (first[i - 1], first[i], first[i + 1]);
        let (b_prev, y, b_next) = (second[j - 1], second[j], second[j + 1]);

        let removed = problem.distance(a_prev, x)
            + problem.distance(x, a_next)
            + problem.distance(b_prev, y)
            + problem.distance(y, b_next);
        let added = problem.distance(a_prev, y)
            + problem.distance(y, a_next)
            + problem.distance(b_prev, x)
            + problem.distance(x, b_next);

        added - removed
    }
}
