//! Tests for the backtracking construction of an initial solution.

use drone_routing::construction::{ExitCode, InitialSolution};
use drone_routing::problem::{Drone, Euclidean, Location, Order, Problem, Stop};
use std::sync::Arc;

/// A drone whose flight range on a full battery is `range` meters.
fn drone_with_range(range: f64) -> Drone {
    Drone::with_parameters(1000, range / 50.0, 1000, None, 360.0, 10.0, 0.0).unwrap()
}

fn at(id: u64, x: f64) -> Location {
    Location::new(id, 0.0, x)
}

/// Depot at the origin; stations and orders on the x axis.
fn create_line_problem(drones: usize, range: f64, stations: &[f64], orders: &[f64]) -> Arc<Problem> {
    let charging_stations = stations
        .iter()
        .enumerate()
        .map(|(i, &x)| at(100 + i as u64, x))
        .collect();
    let orders = orders
        .iter()
        .enumerate()
        .map(|(i, &x)| Order::new(at(200 + i as u64, x), 0, 60))
        .collect();
    let drones = (0..drones).map(|_| drone_with_range(range)).collect();

    Arc::new(Problem::new(drones, at(1, 0.0), charging_stations, orders, &Euclidean).unwrap())
}

#[test]
fn test_exit_code_taxonomy() {
    assert_eq!(ExitCode::Success.code(), 0);
    assert_eq!(ExitCode::OrderNotInRange.code(), 1);
    assert_eq!(ExitCode::NoChargingStationInRange.code(), 2);
    assert_eq!(ExitCode::NoSolution.code(), 3);

    assert!(ExitCode::Success < ExitCode::OrderNotInRange);
    assert!(ExitCode::OrderNotInRange < ExitCode::NoChargingStationInRange);
    assert!(ExitCode::NoChargingStationInRange < ExitCode::NoSolution);

    assert_eq!(ExitCode::NoChargingStationInRange.to_string(), "NO_CHARGING_STATION_IN_RANGE");
    assert_eq!(ExitCode::of(&Ok::<(), ExitCode>(())), ExitCode::Success);
    assert_eq!(ExitCode::of(&Err::<(), _>(ExitCode::OrderNotInRange)), ExitCode::OrderNotInRange);
}

#[test]
fn test_construction_success() {
    let problem = create_line_problem(2, 10_000.0, &[500.0], &[1000.0, -1000.0, 2000.0]);
    let mut construction = InitialSolution::new(Arc::clone(&problem), 100);

    let solution = construction.build().unwrap();

    // Each order goes to the drone whose tour currently ends closest to it
    assert_eq!(
        solution.tour(0),
        &[Stop::Depot, Stop::Delivery(0), Stop::Delivery(2), Stop::Depot]
    );
    assert_eq!(solution.tour(1), &[Stop::Depot, Stop::Delivery(1), Stop::Depot]);
    assert!(solution.is_complete());
    assert!(solution.is_range_feasible());
    assert_eq!(construction.backtracks(), 0);
}

#[test]
fn test_construction_without_orders() {
    let problem = create_line_problem(3, 5000.0, &[], &[]);
    let solution = InitialSolution::new(problem, 100).build().unwrap();

    assert_eq!(solution.tours().len(), 3);
    for tour in solution.tours() {
        assert_eq!(tour, &[Stop::Depot, Stop::Depot]);
    }
}

#[test]
fn test_order_not_in_range() {
    let problem = create_line_problem(1, 5000.0, &[2000.0], &[6000.0]);
    let result = InitialSolution::new(problem, 100).build();

    assert_eq!(result.err(), Some(ExitCode::OrderNotInRange));
}

#[test]
fn test_no_charging_station_in_range() {
    let problem = create_line_problem(1, 5000.0, &[-3000.0], &[3000.0]);
    let result = InitialSolution::new(problem, 100).build();

    assert_eq!(result.err(), Some(ExitCode::NoChargingStationInRange));
}

#[test]
fn test_no_charging_stations_at_all() {
    let problem = create_line_problem(2, 5000.0, &[], &[1000.0]);
    let result = InitialSolution::new(problem, 100).build();

    assert_eq!(result.err(), Some(ExitCode::NoChargingStationInRange));
}

#[test]
fn test_most_severe_failure_across_drones() {
    // The long-range drone reaches the order but no station beyond it; the
    // short-range drone does not reach the order at all
    for ranges in [[5000.0, 3500.0], [3500.0, 5000.0]] {
        let drones = ranges.iter().map(|&range| drone_with_range(range)).collect();
        let orders = vec![Order::new(at(200, 4000.0), 0, 60)];
        let problem = Problem::new(drones, at(1, 0.0), vec![at(100, -3000.0)], orders, &Euclidean).unwrap();

        let result = InitialSolution::new(Arc::new(problem), 100).build();

        assert_eq!(result.err(), Some(ExitCode::NoChargingStationInRange), "ranges {:?}", ranges);
    }
}

#[test]
fn test_recharging_fallback() {
    // The second order leaves no station in range unless the drone charges first
    let problem = create_line_problem(1, 5000.0, &[2500.0], &[2000.0, 4500.0]);
    let mut construction = InitialSolution::new(Arc::clone(&problem), 100);

    let solution = construction.build().unwrap();

    assert_eq!(
        solution.tour(0),
        &[
            Stop::Depot,
            Stop::Delivery(0),
            Stop::Charging(0),
            Stop::Delivery(1),
            Stop::Charging(0),
            Stop::Depot
        ]
    );
    assert!(solution.is_complete());
    assert!(solution.is_range_feasible());
}

#[test]
fn test_unreachable_order_never_succeeds() {
    let problem = create_line_problem(2, 5000.0, &[-1000.0], &[1000.0, 4000.0, 6000.0]);
    let mut construction = InitialSolution::new(Arc::clone(&problem), 100_000);

    let result = construction.build();

    assert_ne!(ExitCode::of(&result), ExitCode::Success);
    assert!(matches!(
        result.err(),
        Some(ExitCode::NoChargingStationInRange | ExitCode::NoSolution)
    ));
}

#[test]
fn test_backtracking_budget() {
    let problem = create_line_problem(2, 5000.0, &[-1000.0], &[1000.0, 4000.0, 6000.0]);

    let mut exhausted = InitialSolution::new(Arc::clone(&problem), 0);
    assert_eq!(exhausted.build().err(), Some(ExitCode::NoSolution));
    assert_eq!(exhausted.backtracks(), 1);

    let mut unbounded = InitialSolution::new(problem, 100_000);
    assert!(unbounded.build().is_err());
    assert!(unbounded.backtracks() >= 1);
}

#[test]
fn test_construction_is_deterministic() {
    let problem = create_line_problem(2, 8000.0, &[1500.0, -1500.0], &[1000.0, -2000.0, 2500.0, -500.0, 3000.0]);

    let first = InitialSolution::new(Arc::clone(&problem), 1000).build().unwrap();
    let second = InitialSolution::new(problem, 1000).build().unwrap();

    assert_eq!(first.tours(), second.tours());
    assert!(first.is_complete());
    assert!(first.is_range_feasible());
}
