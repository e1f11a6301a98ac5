//! Solution representation: one tour per drone over a shared problem.

use crate::problem::{Problem, Stop};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Slack used when comparing accumulated distances against a range budget.
const RANGE_EPSILON: f64 = 1e-9;

/// Fingerprint of a solution: the ordered delivery ids of every drone.
///
/// Charging stops are left out since they are derived from the delivery
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabuKey(Vec<Vec<u64>>);

impl TabuKey {
    pub fn sequences(&self) -> &[Vec<u64>] {
        &self.0
    }
}

/// A complete or partial routing of every drone.
///
/// Cloning deep-copies every tour; the problem itself is shared.
#[derive(Clone)]
pub struct Solution {
    problem: Arc<Problem>,
    tours: Vec<Vec<Stop>>,
}

impl Solution {
    /// Create a solution in which every drone stays at the depot.
    pub fn new(problem: Arc<Problem>) -> Self {
        let tours = vec![vec![Stop::Depot, Stop::Depot]; problem.drone_count()];
        Solution { problem, tours }
    }

    /// Create a solution from explicit tours.
    ///
    /// Tours are normalized to start and end at the depot, and missing tours
    /// are filled with depot-only ones.
    pub fn from_tours(problem: Arc<Problem>, mut tours: Vec<Vec<Stop>>) -> Self {
        tours.resize(problem.drone_count(), Vec::new());

        for tour in &mut tours {
            if tour.first() != Some(&Stop::Depot) {
                tour.insert(0, Stop::Depot);
            }
            if tour.len() == 1 || tour.last() != Some(&Stop::Depot) {
                tour.push(Stop::Depot);
            }
        }

        Solution { problem, tours }
    }

    pub fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    pub fn tours(&self) -> &[Vec<Stop>] {
        &self.tours
    }

    /// Full tour of a drone, charging stops included.
    pub fn tour(&self, drone: usize) -> &[Stop] {
        &self.tours[drone]
    }

    /// Tour of a drone with the charging stops filtered out.
    pub fn delivery_tour(&self, drone: usize) -> Vec<Stop> {
        self.tours[drone]
            .iter()
            .copied()
            .filter(|stop| !stop.is_charging())
            .collect()
    }

    pub(crate) fn set_tour(&mut self, drone: usize, tour: Vec<Stop>) {
        self.tours[drone] = tour;
    }

    /// Drone and position within its delivery tour of an order.
    pub fn locate_order(&self, order: usize) -> Option<(usize, usize)> {
        self.tours.iter().enumerate().find_map(|(drone, tour)| {
            tour.iter()
                .filter(|stop| !stop.is_charging())
                .position(|&stop| stop == Stop::Delivery(order))
                .map(|position| (drone, position))
        })
    }

    /// Length of an arbitrary stop sequence.
    pub fn tour_distance(&self, tour: &[Stop]) -> f64 {
        tour.windows(2)
            .map(|leg| self.problem.distance(leg[0], leg[1]))
            .sum()
    }

    pub fn drone_distance(&self, drone: usize, include_charging: bool) -> f64 {
        if include_charging {
            self.tour_distance(&self.tours[drone])
        } else {
            self.tour_distance(&self.delivery_tour(drone))
        }
    }

    /// Flight plus dwell time of a drone [s].
    pub fn drone_time(&self, drone: usize) -> f64 {
        let flight = self.problem.drones[drone].flight_seconds(self.drone_distance(drone, true));
        let dwell: u32 = self.tours[drone]
            .iter()
            .map(|&stop| self.problem.dwell_time(stop))
            .sum();

        flight + dwell as f64
    }

    /// Total distance flown by the fleet, charging legs included [m].
    pub fn distance_score(&self) -> f64 {
        (0..self.tours.len())
            .map(|drone| self.drone_distance(drone, true))
            .sum()
    }

    /// Total fleet time penalized by the spread between the busiest and the
    /// idlest drone relative to the average [s].
    pub fn time_score(&self) -> f64 {
        let times: Vec<f64> = (0..self.tours.len()).map(|drone| self.drone_time(drone)).collect();
        let total: f64 = times.iter().sum();

        if total <= 0.0 {
            return 0.0;
        }

        let (shortest, longest) = match times.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => return 0.0,
            MinMaxResult::OneElement(time) => (time, time),
            MinMaxResult::MinMax(shortest, longest) => (shortest, longest),
        };
        let average = total / times.len() as f64;

        total * (1.0 + (longest - shortest) / average)
    }

    pub fn tabu_key(&self) -> TabuKey {
        TabuKey(
            self.tours
                .iter()
                .map(|tour| {
                    tour.iter()
                        .filter(|stop| stop.is_delivery())
                        .map(|&stop| self.problem.order_id(stop))
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of delivery stops across all tours.
    pub fn delivery_count(&self) -> usize {
        self.tours
            .iter()
            .flatten()
            .filter(|stop| stop.is_delivery())
            .count()
    }

    /// Every order is served exactly once and every tour starts at the depot.
    pub fn is_complete(&self) -> bool {
        let mut served = vec![0usize; self.problem.order_count()];

        for tour in &self.tours {
            if tour.first() != Some(&Stop::Depot) {
                return false;
            }
            for stop in tour {
                if let Stop::Delivery(order) = *stop {
                    served[order] += 1;
                }
            }
        }

        served.iter().all(|&count| count == 1)
    }

    /// Every segment between charges fits the drone's budget.
    pub fn is_range_feasible(&self) -> bool {
        (0..self.tours.len()).all(|drone| {
            let model = &self.problem.drones[drone];
            let mut budget = model.remaining_flight_distance();
            let mut flown = 0.0;

            for leg in self.tours[drone].windows(2) {
                flown += self.problem.distance(leg[0], leg[1]);
                if flown > budget + RANGE_EPSILON {
                    return false;
                }
                if leg[1].is_charging() {
                    budget = model.full_flight_distance();
                    flown = 0.0;
                }
            }
            true
        })
    }

    /// Rebuild the charging stops of a drone's tour in place.
    ///
    /// Returns `false` and leaves the tour untouched if the drone cannot fly
    /// its deliveries even with recharging.
    pub fn insert_charging_orders(&mut self, drone: usize) -> bool {
        match self.plan_charging(drone, &self.delivery_tour(drone)) {
            Some(tour) => {
                self.tours[drone] = tour;
                true
            }
            None => false,
        }
    }

    /// Insert charging stops into a delivery-only tour in one greedy pass.
    ///
    /// Before each leg the drone checks that a station will still be reachable
    /// from the next stop; if not, it detours to the station closest to its
    /// current stop and continues on a full battery.
    pub fn plan_charging(&self, drone: usize, tour: &[Stop]) -> Option<Vec<Stop>> {
        let problem = &self.problem;
        let model = &problem.drones[drone];
        let budget = model.remaining_flight_distance();

        if tour.len() < 2 || self.tour_distance(tour) <= budget {
            return Some(tour.to_vec());
        }

        let last = tour.len() - 1;
        let reachable_after = |position: usize, remaining: f64| {
            if position == last {
                remaining >= -RANGE_EPSILON
            } else {
                problem.is_charging_station_in_range(tour[position], remaining)
            }
        };

        let mut planned = Vec::with_capacity(tour.len() + 2);
        planned.push(tour[0]);
        let mut remaining = budget;

        for position in 0..last {
            let mut leg = problem.distance(tour[position], tour[position + 1]);

            if !reachable_after(position + 1, remaining - leg) {
                let (station, detour) = problem.closest_charging_station(tour[position])?;
                if detour > remaining + RANGE_EPSILON {
                    return None;
                }

                planned.push(Stop::Charging(station));
                remaining = model.full_flight_distance();
                leg = problem.distance(Stop::Charging(station), tour[position + 1]);

                if !reachable_after(position + 1, remaining - leg) {
                    return None;
                }
            }

            remaining -= leg;
            planned.push(tour[position + 1]);
        }

        Some(planned)
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Time score: {:.2}", self.time_score())?;
        writeln!(f, "  Distance score: {:.2}", self.distance_score())?;
        writeln!(f, "  Deliveries: {}", self.delivery_count())?;

        for (drone, tour) in self.tours.iter().enumerate() {
            writeln!(
                f,
                "  Drone {}: {:?} (Distance: {:.2}, Time: {:.2})",
                drone,
                tour,
                self.drone_distance(drone, true),
                self.drone_time(drone)
            )?;
        }

        Ok(())
    }
}
