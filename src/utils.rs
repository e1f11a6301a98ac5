//! Reporting helpers and search statistics.

use std::time::Duration;

use serde::Serialize;

use crate::problem::Stop;
use crate::search::SearchOutcome;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// One stop of a reported tour.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportStop {
    Depot { location: u64 },
    Delivery { order: u64, location: u64 },
    Charging { location: u64 },
}

/// Tour of one drone in a report.
#[derive(Debug, Clone, Serialize)]
pub struct DroneReport {
    pub drone: usize,
    pub distance: f64,
    pub time: f64,
    pub stops: Vec<ReportStop>,
}

/// Serializable summary of a solution.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionReport {
    pub distance_score: f64,
    pub time_score: f64,
    pub deliveries: usize,
    pub drones: Vec<DroneReport>,
}

impl SolutionReport {
    pub fn new(solution: &Solution) -> Self {
        let problem = solution.problem();

        let drones = solution
            .tours()
            .iter()
            .enumerate()
            .map(|(drone, tour)| DroneReport {
                drone,
                distance: solution.drone_distance(drone, true),
                time: solution.drone_time(drone),
                stops: tour
                    .iter()
                    .map(|&stop| {
                        let location = problem.location(stop).id;
                        match stop {
                            Stop::Depot => ReportStop::Depot { location },
                            Stop::Delivery(_) => ReportStop::Delivery {
                                order: problem.order_id(stop),
                                location,
                            },
                            Stop::Charging(_) => ReportStop::Charging { location },
                        }
                    })
                    .collect(),
            })
            .collect();

        SolutionReport {
            distance_score: solution.distance_score(),
            time_score: solution.time_score(),
            deliveries: solution.delivery_count(),
            drones,
        }
    }
}

/// Human-readable listing of every tour.
pub fn format_solution(solution: &Solution, name: &str) -> String {
    let problem = solution.problem();
    let mut text = String::new();

    text.push_str(&format!("Drone routing solution for instance: {}\n", name));
    text.push_str(&format!("Distance Score: {:.2}\n", solution.distance_score()));
    text.push_str(&format!("Time Score: {:.2}\n", solution.time_score()));
    text.push_str(&format!("Number of Drones: {}\n\n", solution.tours().len()));

    for (drone, tour) in solution.tours().iter().enumerate() {
        let stops: Vec<String> = tour
            .iter()
            .map(|&stop| match stop {
                Stop::Depot => "Depot".to_string(),
                Stop::Delivery(_) => format!("#{}", problem.order_id(stop)),
                Stop::Charging(station) => format!("Charge({})", problem.charging_stations[station].id),
            })
            .collect();

        text.push_str(&format!("Drone #{}: {}\n", drone + 1, stops.join(" -> ")));
        text.push_str(&format!("  Distance: {:.2}\n", solution.drone_distance(drone, true)));
        text.push_str(&format!("  Time: {:.2}\n\n", solution.drone_time(drone)));
    }

    text
}

/// Statistics of a complete run.
pub struct SearchStatistics {
    /// Improving moves taken by hill climbing
    pub local_search_iterations: u32,
    /// Iterations of the metaheuristic, 0 when only hill climbing ran
    pub iterations: u32,
    pub runtime: Duration,
    pub initial_time_score: f64,
    pub best_time_score: f64,
    pub best_distance_score: f64,
    pub construction_backtracks: usize,
}

impl SearchStatistics {
    pub fn new(
        initial: &Solution,
        local_search: &SearchOutcome,
        metaheuristic: Option<&SearchOutcome>,
        construction_backtracks: usize,
    ) -> Self {
        let best = metaheuristic.unwrap_or(local_search);

        SearchStatistics {
            local_search_iterations: local_search.iterations,
            iterations: metaheuristic.map_or(0, |outcome| outcome.iterations),
            runtime: local_search.run_time + metaheuristic.map_or(Duration::ZERO, |outcome| outcome.run_time),
            initial_time_score: initial.time_score(),
            best_time_score: best.best_score,
            best_distance_score: best.best.distance_score(),
            construction_backtracks,
        }
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Local Search Iterations: {}
- Iterations: {}
- Runtime: {}
- Construction Backtracks: {}
- Initial Time Score: {:.2}
- Best Time Score: {:.2}
- Best Distance Score: {:.2}",
            self.local_search_iterations,
            self.iterations,
            format_duration(self.runtime),
            self.construction_backtracks,
            self.initial_time_score,
            self.best_time_score,
            self.best_distance_score
        )
    }
}
