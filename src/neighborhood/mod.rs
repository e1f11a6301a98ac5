//! Neighborhood operators over a [`Solution`].
//!
//! Every operator reads delivery-only tours, prunes moves by a closed-form
//! distance delta and builds each surviving move on a clone of the solution.

pub mod cross;
pub mod exchange;
pub mod relocate;
pub mod two_opt;

use crate::problem::Stop;
use crate::solution::Solution;
use itertools::Itertools;
use log::trace;
use std::fmt;

/// The operator that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    TwoOpt,
    Relocate,
    Exchange,
    Cross,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveKind::TwoOpt => "two-opt",
            MoveKind::Relocate => "relocate",
            MoveKind::Exchange => "exchange",
            MoveKind::Cross => "cross",
        };
        f.write_str(name)
    }
}

/// A neighbor of a solution.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub solution: Solution,
    /// Change of the distance score relative to the source solution [m]
    pub delta: f64,
    pub kind: MoveKind,
}

impl Solution {
    /// Union of all four operators over every drone and order.
    ///
    /// Symmetric moves (exchange and cross between the same pair) are only
    /// generated once.
    pub fn neighborhood(&self, maximum_length_delta: f64, insert_charging_orders: bool) -> Vec<Candidate> {
        let drones = self.problem().drone_count();
        let orders = self.problem().order_count();
        let mut candidates = Vec::new();

        for drone in 0..drones {
            candidates.extend(self.two_opt_solutions(drone, maximum_length_delta, insert_charging_orders));
        }

        for order in 0..orders {
            candidates.extend(self.relocate_solutions(order, maximum_length_delta, insert_charging_orders));
            candidates.extend(self.exchange_solutions_where(
                order,
                maximum_length_delta,
                insert_charging_orders,
                |partner| partner > order,
            ));
        }

        for (first, second) in (0..drones).tuple_combinations() {
            candidates.extend(self.cross_solutions_between(
                first,
                second,
                maximum_length_delta,
                insert_charging_orders,
            ));
        }

        candidates
    }

    /// Turn the modified delivery tours of a move into a candidate.
    ///
    /// Without charging insertion the raw delta is kept and the tours stay
    /// delivery-only. With it, every modified tour is re-planned and the
    /// delta is recomputed on full tours; an infeasible plan drops the move.
    pub(crate) fn build_candidate(
        &self,
        kind: MoveKind,
        changes: Vec<(usize, Vec<Stop>)>,
        raw_delta: f64,
        maximum_length_delta: f64,
        insert_charging_orders: bool,
    ) -> Option<Candidate> {
        if !insert_charging_orders {
            let mut solution = self.clone();
            for (drone, tour) in changes {
                solution.set_tour(drone, tour);
            }
            return Some(Candidate {
                solution,
                delta: raw_delta,
                kind,
            });
        }

        let mut planned = Vec::with_capacity(changes.len());
        let mut delta = 0.0;

        for (drone, tour) in changes {
            let Some(full_tour) = self.plan_charging(drone, &tour) else {
                trace!("{} move dropped: drone {} cannot recharge in range", kind, drone);
                return None;
            };
            delta += self.tour_distance(&full_tour) - self.drone_distance(drone, true);
            planned.push((drone, full_tour));
        }

        if delta >= maximum_length_delta {
            trace!("{} move dropped: delta {:.2} after recharging", kind, delta);
            return None;
        }

        let mut solution = self.clone();
        for (drone, tour) in planned {
            solution.set_tour(drone, tour);
        }

        Some(Candidate {
            solution,
            delta,
            kind,
        })
    }
}
