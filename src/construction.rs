//! Backtracking construction of a first feasible solution.

use crate::problem::{Problem, Stop};
use crate::solution::Solution;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Outcome of the construction, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExitCode {
    Success,
    OrderNotInRange,
    NoChargingStationInRange,
    NoSolution,
}

impl ExitCode {
    /// Numeric code, suitable as a process exit status.
    pub fn code(&self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::OrderNotInRange => 1,
            ExitCode::NoChargingStationInRange => 2,
            ExitCode::NoSolution => 3,
        }
    }

    /// Exit code of a construction result.
    pub fn of<T>(result: &Result<T, ExitCode>) -> ExitCode {
        match result {
            Ok(_) => ExitCode::Success,
            Err(code) => *code,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitCode::Success => "SUCCESS",
            ExitCode::OrderNotInRange => "ORDER_NOT_IN_RANGE",
            ExitCode::NoChargingStationInRange => "NO_CHARGING_STATION_IN_RANGE",
            ExitCode::NoSolution => "NO_SOLUTION",
        };
        f.write_str(name)
    }
}

impl std::error::Error for ExitCode {}

/// A drone tour under construction.
#[derive(Debug, Clone)]
struct PartialTour {
    stops: Vec<Stop>,
    /// Distance flown since the last charge
    mileage: f64,
    /// Distance available between two charges
    budget: f64,
}

impl PartialTour {
    fn tail(&self) -> Stop {
        *self.stops.last().unwrap_or(&Stop::Depot)
    }
}

/// Assigns orders to drones one at a time, backtracking on dead ends.
///
/// Every tentative assignment works on its own copy of the partial tours, so
/// abandoning a branch needs no compensating undo.
pub struct InitialSolution {
    problem: Arc<Problem>,
    max_backtracks: usize,
    backtracks: usize,
}

impl InitialSolution {
    pub fn new(problem: Arc<Problem>, max_backtracks: usize) -> Self {
        InitialSolution {
            problem,
            max_backtracks,
            backtracks: 0,
        }
    }

    /// Number of abandoned branches during the last build.
    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Build a complete solution, or report why none was found.
    pub fn build(&mut self) -> Result<Solution, ExitCode> {
        self.backtracks = 0;

        let tours = self
            .problem
            .drones
            .iter()
            .map(|drone| PartialTour {
                stops: vec![Stop::Depot],
                mileage: 0.0,
                budget: drone.remaining_flight_distance(),
            })
            .collect();

        match self.place(0, tours) {
            Ok(tours) => {
                let solution = Solution::from_tours(Arc::clone(&self.problem), tours);
                info!(
                    "Initial solution built after {} backtracks (distance {:.2}, time score {:.2})",
                    self.backtracks,
                    solution.distance_score(),
                    solution.time_score()
                );
                Ok(solution)
            }
            Err(code) => {
                warn!("No initial solution: {} after {} backtracks", code, self.backtracks);
                Err(code)
            }
        }
    }

    fn place(&mut self, index: usize, tours: Vec<PartialTour>) -> Result<Vec<Vec<Stop>>, ExitCode> {
        if index == self.problem.order_count() {
            return self.close(tours);
        }

        let problem = Arc::clone(&self.problem);
        let stop = Stop::Delivery(index);
        let mut failure: Option<ExitCode> = None;

        // Closest tour tails first
        let mut drones: Vec<usize> = (0..tours.len()).collect();
        drones.sort_by(|&a, &b| {
            problem
                .distance(tours[a].tail(), stop)
                .total_cmp(&problem.distance(tours[b].tail(), stop))
        });

        for drone in drones {
            let tour = &tours[drone];
            let mileage = tour.mileage + problem.distance(tour.tail(), stop);

            if mileage > tour.budget {
                failure = failure.max(Some(ExitCode::OrderNotInRange));
                continue;
            }

            if !problem.is_charging_station_in_range(stop, tour.budget - mileage) {
                failure = failure.max(Some(ExitCode::NoChargingStationInRange));
                continue;
            }

            let mut outcome = self.place(index + 1, extend(&tours, drone, stop, mileage));

            // The child consumed its tours; rebuild them only for the fallback
            if outcome == Err(ExitCode::NoChargingStationInRange) {
                if let Some(recharged) = self.recharge_fleet(extend(&tours, drone, stop, mileage)) {
                    debug!("Recharging fleet before order {}", index + 1);
                    outcome = self.place(index + 1, recharged);
                }
            }

            match outcome {
                Ok(closed) => return Ok(closed),
                Err(code) => {
                    self.backtracks += 1;
                    if self.backtracks > self.max_backtracks {
                        debug!("Backtracking budget of {} exhausted", self.max_backtracks);
                        return Err(ExitCode::NoSolution);
                    }
                    failure = failure.max(Some(code));
                }
            }
        }

        Err(failure.unwrap_or(ExitCode::NoSolution))
    }

    /// Send every drone that has flown since its last charge to its closest
    /// reachable station. `None` if no drone could be recharged.
    fn recharge_fleet(&self, mut tours: Vec<PartialTour>) -> Option<Vec<PartialTour>> {
        let mut any = false;

        for (drone, tour) in tours.iter_mut().enumerate() {
            if tour.tail().is_charging() || tour.mileage <= 0.0 {
                continue;
            }

            let Some((station, distance)) = self.problem.closest_charging_station(tour.tail()) else {
                continue;
            };
            if tour.mileage + distance > tour.budget {
                continue;
            }

            tour.stops.push(Stop::Charging(station));
            tour.mileage = 0.0;
            tour.budget = self.problem.drones[drone].full_flight_distance();
            any = true;
        }

        any.then_some(tours)
    }

    /// Close every tour with a return leg, charging first if needed.
    fn close(&self, tours: Vec<PartialTour>) -> Result<Vec<Vec<Stop>>, ExitCode> {
        let problem = &self.problem;
        let mut closed = Vec::with_capacity(tours.len());

        for (drone, mut tour) in tours.into_iter().enumerate() {
            let tail = tour.tail();

            if tour.mileage + problem.distance(tail, Stop::Depot) > tour.budget {
                let (station, detour) = problem
                    .closest_charging_station(tail)
                    .ok_or(ExitCode::NoChargingStationInRange)?;
                let home = problem.distance(Stop::Charging(station), Stop::Depot);

                if tour.mileage + detour > tour.budget
                    || home > problem.drones[drone].full_flight_distance()
                {
                    return Err(ExitCode::NoChargingStationInRange);
                }
                tour.stops.push(Stop::Charging(station));
            }

            tour.stops.push(Stop::Depot);
            closed.push(tour.stops);
        }

        Ok(closed)
    }
}

/// Copy of `tours` with `stop` appended to the given drone's tour.
fn extend(tours: &[PartialTour], drone: usize, stop: Stop, mileage: f64) -> Vec<PartialTour> {
    let mut extended = tours.to_vec();
    extended[drone].stops.push(stop);
    extended[drone].mileage = mileage;
    extended
}
