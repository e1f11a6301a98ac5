//! Tests for solution scoring, fingerprints and charging stop insertion.

use drone_routing::problem::{Drone, Euclidean, Location, Order, Problem, Stop};
use drone_routing::solution::Solution;
use std::sync::Arc;

/// A drone whose flight range on a full battery is `range` meters.
fn drone_with_range(range: f64) -> Drone {
    Drone::with_parameters(1000, range / 50.0, 1000, None, 360.0, 10.0, 0.0).unwrap()
}

/// A location on the x axis.
fn at(id: u64, x: f64) -> Location {
    Location::new(id, 0.0, x)
}

/// Orders on a line without dwell time, stations on the same line.
fn create_line_problem(drones: usize, range: f64, stations: &[f64], orders: &[f64]) -> Arc<Problem> {
    let charging_stations = stations
        .iter()
        .enumerate()
        .map(|(i, &x)| at(100 + i as u64, x))
        .collect();
    let orders = orders
        .iter()
        .enumerate()
        .map(|(i, &x)| Order::new(at(200 + i as u64, x), 0, 0))
        .collect();
    let drones = (0..drones).map(|_| drone_with_range(range)).collect();

    Arc::new(Problem::new(drones, at(1, 0.0), charging_stations, orders, &Euclidean).unwrap())
}

#[test]
fn test_new_solution_is_empty() {
    let problem = create_line_problem(2, 10_000.0, &[], &[1000.0]);
    let solution = Solution::new(Arc::clone(&problem));

    assert_eq!(solution.tours().len(), 2);
    for tour in solution.tours() {
        assert_eq!(tour, &[Stop::Depot, Stop::Depot]);
    }
    assert_eq!(solution.distance_score(), 0.0);
    assert_eq!(solution.time_score(), 0.0);
    assert_eq!(solution.delivery_count(), 0);
    assert!(!solution.is_complete());
}

#[test]
fn test_from_tours_normalizes_depot_visits() {
    let problem = create_line_problem(2, 10_000.0, &[], &[1000.0]);
    let solution = Solution::from_tours(problem, vec![vec![Stop::Delivery(0)]]);

    assert_eq!(solution.tour(0), &[Stop::Depot, Stop::Delivery(0), Stop::Depot]);
    assert_eq!(solution.tour(1), &[Stop::Depot, Stop::Depot]);
    assert!(solution.is_complete());
    assert_eq!(solution.locate_order(0), Some((0, 1)));
}

#[test]
fn test_distance_and_time_scores() {
    let problem = create_line_problem(2, 10_000.0, &[], &[1000.0]);
    let solution = Solution::from_tours(
        problem,
        vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Depot]],
    );

    assert!((solution.distance_score() - 2000.0).abs() < 1e-9);
    assert!((solution.drone_time(0) - 200.0).abs() < 1e-9);
    assert_eq!(solution.drone_time(1), 0.0);

    // 200 s total, spread 200 s over an average of 100 s
    assert!((solution.time_score() - 600.0).abs() < 1e-9);
}

#[test]
fn test_time_score_balanced_fleet() {
    let problem = create_line_problem(2, 10_000.0, &[], &[1000.0, -1000.0]);
    let solution = Solution::from_tours(
        problem,
        vec![
            vec![Stop::Depot, Stop::Delivery(0), Stop::Depot],
            vec![Stop::Depot, Stop::Delivery(1), Stop::Depot],
        ],
    );

    // No spread: the score is the plain total
    assert!((solution.time_score() - 400.0).abs() < 1e-9);
}

#[test]
fn test_time_score_includes_dwell_times() {
    let drones = vec![drone_with_range(10_000.0)];
    let orders = vec![Order::new(at(2, 1000.0), 0, 45)];
    let problem = Arc::new(Problem::new(drones, at(1, 0.0), vec![at(3, 500.0)], orders, &Euclidean).unwrap());
    let solution = Solution::from_tours(
        problem,
        vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Charging(0), Stop::Depot]],
    );

    // 200 s flight, 45 s delivery, 900 s charging
    assert!((solution.drone_time(0) - 1145.0).abs() < 1e-9);
    assert!((solution.time_score() - 1145.0).abs() < 1e-9);
}

#[test]
fn test_tabu_key_ignores_charging_stops() {
    let problem = create_line_problem(2, 10_000.0, &[500.0], &[1000.0, 2000.0, 3000.0]);
    let with_charging = Solution::from_tours(
        Arc::clone(&problem),
        vec![
            vec![Stop::Depot, Stop::Delivery(1), Stop::Charging(0), Stop::Delivery(0), Stop::Depot],
            vec![Stop::Depot, Stop::Delivery(2), Stop::Depot],
        ],
    );
    let without_charging = Solution::from_tours(
        Arc::clone(&problem),
        vec![
            vec![Stop::Depot, Stop::Delivery(1), Stop::Delivery(0), Stop::Depot],
            vec![Stop::Depot, Stop::Delivery(2), Stop::Depot],
        ],
    );
    let reordered = Solution::from_tours(
        Arc::clone(&problem),
        vec![
            vec![Stop::Depot, Stop::Delivery(0), Stop::Delivery(1), Stop::Depot],
            vec![Stop::Depot, Stop::Delivery(2), Stop::Depot],
        ],
    );

    assert_eq!(with_charging.tabu_key(), without_charging.tabu_key());
    assert_ne!(with_charging.tabu_key(), reordered.tabu_key());

    let ids = &problem.orders;
    assert_eq!(
        with_charging.tabu_key().sequences(),
        &[vec![ids[1].id(), ids[0].id()], vec![ids[2].id()]]
    );
}

#[test]
fn test_clone_is_independent() {
    let problem = create_line_problem(1, 5000.0, &[2000.0], &[3000.0]);
    let original = Solution::from_tours(problem, vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Depot]]);

    let mut copy = original.clone();
    assert!(copy.insert_charging_orders(0));

    assert_eq!(original.tour(0).len(), 3);
    assert_eq!(copy.tour(0).len(), 4);
    assert!(Arc::ptr_eq(original.problem(), copy.problem()));
}

#[test]
fn test_insert_charging_orders() {
    let problem = create_line_problem(1, 5000.0, &[2000.0], &[3000.0]);
    let mut solution = Solution::from_tours(problem, vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Depot]]);

    // 6000 m round trip on a 5000 m battery
    assert!(!solution.is_range_feasible());
    assert!(solution.insert_charging_orders(0));

    assert_eq!(
        solution.tour(0),
        &[Stop::Depot, Stop::Delivery(0), Stop::Charging(0), Stop::Depot]
    );
    assert!(solution.is_range_feasible());
    assert_eq!(solution.delivery_tour(0), vec![Stop::Depot, Stop::Delivery(0), Stop::Depot]);
    assert!((solution.drone_distance(0, false) - 6000.0).abs() < 1e-9);
    assert!((solution.drone_distance(0, true) - 6000.0).abs() < 1e-9);

    // Re-planning an already charged tour yields the same stops
    let planned = solution.tour(0).to_vec();
    assert!(solution.insert_charging_orders(0));
    assert_eq!(solution.tour(0), planned.as_slice());
}

#[test]
fn test_insert_charging_orders_not_needed() {
    let problem = create_line_problem(1, 5000.0, &[2000.0], &[1000.0]);
    let mut solution = Solution::from_tours(problem, vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Depot]]);

    assert!(solution.insert_charging_orders(0));
    assert_eq!(solution.tour(0), &[Stop::Depot, Stop::Delivery(0), Stop::Depot]);
}

#[test]
fn test_insert_charging_orders_infeasible() {
    let problem = create_line_problem(1, 5000.0, &[2000.0], &[6000.0]);
    let mut solution = Solution::from_tours(problem, vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Depot]]);

    assert!(!solution.insert_charging_orders(0));
    assert_eq!(solution.tour(0), &[Stop::Depot, Stop::Delivery(0), Stop::Depot]);
}

#[test]
fn test_insert_charging_orders_without_stations() {
    let problem = create_line_problem(1, 5000.0, &[], &[3000.0]);
    let mut solution = Solution::from_tours(problem, vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Depot]]);

    assert!(!solution.insert_charging_orders(0));
}

#[test]
fn test_insert_charging_orders_multiple_charges() {
    let problem = create_line_problem(1, 5000.0, &[2500.0], &[2000.0, 4500.0]);
    let mut solution = Solution::from_tours(
        problem,
        vec![vec![Stop::Depot, Stop::Delivery(0), Stop::Delivery(1), Stop::Depot]],
    );

    assert!(solution.insert_charging_orders(0));
    assert!(solution.is_range_feasible());
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
    assert_eq!(solution.delivery_count(), 2);
}
