//! Fleet and demand model: locations, drones, orders and the shared problem instance.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Seconds a drone spends stationary at a charging stop.
pub const CHARGING_DWELL_SECONDS: u32 = 900;

/// Order id reserved for the depot.
pub const DEPOT_ORDER_ID: u64 = 0;

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(DEPOT_ORDER_ID + 1);

/// A point of interest: the depot, a charging station or an order destination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Create a new location.
    pub fn new(id: u64, latitude: f64, longitude: f64) -> Self {
        Location {
            id,
            latitude,
            longitude,
        }
    }
}

/// Distance between two locations, in meters.
///
/// Implementations must be symmetric and non-negative. The oracle is only
/// queried while a [`Problem`] is built.
pub trait DistanceOracle {
    fn distance(&self, from: &Location, to: &Location) -> f64;
}

/// Planar distance, treating longitude as `x` and latitude as `y` in meters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceOracle for Euclidean {
    fn distance(&self, from: &Location, to: &Location) -> f64 {
        let dx = from.longitude - to.longitude;
        let dy = from.latitude - to.latitude;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Great-circle distance on a spherical earth, rounded to centimetres.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceOracle for Haversine {
    fn distance(&self, from: &Location, to: &Location) -> f64 {
        let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (to.longitude - from.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let meters = 2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin();

        (meters * 100.0).round() / 100.0
    }
}

/// A range-limited delivery drone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drone {
    /// Weight of the empty drone [g]
    tare_weight: u32,
    /// Battery capacity [Wh]
    battery_size: f64,
    /// Maximum payload [g]
    loading_capacity: u32,
    /// Charge at the start of the tour [Wh]
    current_charge: f64,
    /// Power draw per kilogram of total mass [W/kg]
    power_per_kg: f64,
    /// Cruise speed [m/s]
    max_speed: f64,
    /// Energy never used for flight [Wh]
    battery_reserve: f64,
}

impl Drone {
    pub const DEFAULT_POWER_PER_KG: f64 = 150.0;
    pub const DEFAULT_MAX_SPEED: f64 = 10.0;
    pub const DEFAULT_RESERVE_FRACTION: f64 = 0.1;

    /// Create a fully charged drone with default power draw, speed and reserve.
    pub fn new(tare_weight: u32, battery_size: f64, loading_capacity: u32) -> Result<Self, ModelError> {
        Drone::with_parameters(
            tare_weight,
            battery_size,
            loading_capacity,
            None,
            Self::DEFAULT_POWER_PER_KG,
            Self::DEFAULT_MAX_SPEED,
            Self::DEFAULT_RESERVE_FRACTION,
        )
    }

    /// Create a drone with every parameter spelled out.
    ///
    /// An initial charge outside `[0, battery_size]` is ignored and the drone
    /// starts fully charged.
    pub fn with_parameters(
        tare_weight: u32,
        battery_size: f64,
        loading_capacity: u32,
        initial_charge: Option<f64>,
        power_per_kg: f64,
        max_speed: f64,
        reserve_fraction: f64,
    ) -> Result<Self, ModelError> {
        if tare_weight == 0 {
            return Err(ModelError::NonPositiveTareWeight);
        }
        if !(battery_size > 0.0) {
            return Err(ModelError::NonPositiveBatterySize);
        }
        if loading_capacity == 0 {
            return Err(ModelError::NonPositiveLoadingCapacity);
        }
        if !(power_per_kg > 0.0) {
            return Err(ModelError::NonPositivePowerPerKg);
        }
        if !(max_speed > 0.0) {
            return Err(ModelError::NonPositiveMaxSpeed);
        }
        if !(0.0..1.0).contains(&reserve_fraction) {
            return Err(ModelError::InvalidBatteryReserve(reserve_fraction));
        }

        let current_charge = initial_charge
            .filter(|charge| (0.0..=battery_size).contains(charge))
            .unwrap_or(battery_size);

        Ok(Drone {
            tare_weight,
            battery_size,
            loading_capacity,
            current_charge,
            power_per_kg,
            max_speed,
            battery_reserve: battery_size * reserve_fraction,
        })
    }

    pub fn tare_weight(&self) -> u32 {
        self.tare_weight
    }

    pub fn battery_size(&self) -> f64 {
        self.battery_size
    }

    pub fn loading_capacity(&self) -> u32 {
        self.loading_capacity
    }

    pub fn current_charge(&self) -> f64 {
        self.current_charge
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn battery_reserve(&self) -> f64 {
        self.battery_reserve
    }

    /// Remaining flight time on the current charge [h].
    pub fn remaining_flight_time(&self) -> f64 {
        self.flight_time(self.current_charge)
    }

    /// Remaining flight distance on the current charge [m].
    pub fn remaining_flight_distance(&self) -> f64 {
        self.max_speed * self.remaining_flight_time() * 3600.0
    }

    /// Flight distance on a full battery [m], the budget after every charging stop.
    pub fn full_flight_distance(&self) -> f64 {
        self.max_speed * self.flight_time(self.battery_size) * 3600.0
    }

    /// Seconds needed to fly the given distance at cruise speed.
    pub fn flight_seconds(&self, distance: f64) -> f64 {
        distance / self.max_speed
    }

    fn flight_time(&self, charge: f64) -> f64 {
        // Range is computed for a fully loaded drone.
        let mass_kg = (self.tare_weight as f64 + self.loading_capacity as f64) / 1000.0;
        ((charge - self.battery_reserve) / (mass_kg * self.power_per_kg)).max(0.0)
    }
}

/// A delivery request. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: u64,
    destination: Location,
    /// Parcel weight [g]
    weight: u32,
    /// Time spent at the destination [s]
    dwell_time: u32,
}

impl Order {
    /// Create an order with the next free id.
    pub fn new(destination: Location, weight: u32, dwell_time: u32) -> Self {
        Order {
            id: NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed),
            destination,
            weight,
            dwell_time,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn destination(&self) -> &Location {
        &self.destination
    }

    /// Parcel weight [g]. Range is always computed for a fully loaded drone,
    /// so the weight only has to fit some drone's loading capacity.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn dwell_time(&self) -> u32 {
        self.dwell_time
    }
}

/// One entry of a drone tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stop {
    Depot,
    /// Index into [`Problem::orders`]
    Delivery(usize),
    /// Index into [`Problem::charging_stations`]
    Charging(usize),
}

impl Stop {
    pub fn is_charging(&self) -> bool {
        matches!(self, Stop::Charging(_))
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, Stop::Delivery(_))
    }
}

/// Dense symmetric distance matrix with per-node neighbor lists.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
    /// For every node, all other nodes by ascending distance
    neighbors: Vec<Vec<usize>>,
}

impl DistanceMatrix {
    /// Query the oracle once per unordered pair and mirror the result.
    pub fn build<O: DistanceOracle + ?Sized>(
        locations: &[Location],
        oracle: &O,
    ) -> Result<Self, ModelError> {
        let size = locations.len();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            for j in i + 1..size {
                let value = oracle.distance(&locations[i], &locations[j]);
                if !value.is_finite() || value < 0.0 {
                    return Err(ModelError::InvalidDistance {
                        from: locations[i].id,
                        to: locations[j].id,
                        value,
                    });
                }
                values[i * size + j] = value;
                values[j * size + i] = value;
            }
        }

        let neighbors = (0..size)
            .map(|node| {
                let row = &values[node * size..(node + 1) * size];
                let mut others: Vec<usize> = (0..size).filter(|&other| other != node).collect();
                others.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
                others
            })
            .collect();

        Ok(DistanceMatrix {
            size,
            values,
            neighbors,
        })
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.size + to]
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Other nodes ordered by ascending distance from `node`.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }
}

/// The read-only routing instance shared by every solution.
///
/// Matrix nodes are laid out as `0` for the depot, `1..=S` for the charging
/// stations and `S + 1..=S + N` for the order destinations.
#[derive(Debug, Clone)]
pub struct Problem {
    pub drones: Vec<Drone>,
    pub depot: Location,
    pub charging_stations: Vec<Location>,
    pub orders: Vec<Order>,
    pub distance_matrix: DistanceMatrix,
    /// Closest charging station (index, distance) of every node
    closest_station: Vec<Option<(usize, f64)>>,
}

impl Problem {
    /// Build a problem and precompute every pairwise distance.
    pub fn new<O: DistanceOracle + ?Sized>(
        drones: Vec<Drone>,
        depot: Location,
        charging_stations: Vec<Location>,
        orders: Vec<Order>,
        oracle: &O,
    ) -> Result<Self, ModelError> {
        if drones.is_empty() {
            return Err(ModelError::NoDrones);
        }

        let max_capacity = drones.iter().map(Drone::loading_capacity).max().unwrap_or(0);
        if let Some(order) = orders.iter().find(|order| order.weight() > max_capacity) {
            return Err(ModelError::OrderTooHeavy {
                order: order.id(),
                weight: order.weight(),
                max_capacity,
            });
        }

        let locations: Vec<Location> = std::iter::once(depot)
            .chain(charging_stations.iter().copied())
            .chain(orders.iter().map(|order| *order.destination()))
            .collect();

        let distance_matrix = DistanceMatrix::build(&locations, oracle)?;
        let closest_station =
            Self::resolve_closest_stations(&distance_matrix, charging_stations.len());

        Ok(Problem {
            drones,
            depot,
            charging_stations,
            orders,
            distance_matrix,
            closest_station,
        })
    }

    fn resolve_closest_stations(
        matrix: &DistanceMatrix,
        station_count: usize,
    ) -> Vec<Option<(usize, f64)>> {
        let is_station = |node: usize| (1..=station_count).contains(&node);

        (0..matrix.len())
            .map(|node| {
                if is_station(node) {
                    return Some((node - 1, 0.0));
                }
                matrix
                    .neighbors(node)
                    .iter()
                    .find(|&&other| is_station(other))
                    .map(|&other| (other - 1, matrix.get(node, other)))
            })
            .collect()
    }

    pub fn drone_count(&self) -> usize {
        self.drones.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn station_count(&self) -> usize {
        self.charging_stations.len()
    }

    /// Matrix node of a tour stop.
    pub fn node(&self, stop: Stop) -> usize {
        match stop {
            Stop::Depot => 0,
            Stop::Charging(station) => 1 + station,
            Stop::Delivery(order) => 1 + self.charging_stations.len() + order,
        }
    }

    pub fn location(&self, stop: Stop) -> &Location {
        match stop {
            Stop::Depot => &self.depot,
            Stop::Charging(station) => &self.charging_stations[station],
            Stop::Delivery(order) => self.orders[order].destination(),
        }
    }

    /// Distance between two stops.
    pub fn distance(&self, from: Stop, to: Stop) -> f64 {
        self.distance_matrix.get(self.node(from), self.node(to))
    }

    /// Time spent stationary at a stop [s].
    pub fn dwell_time(&self, stop: Stop) -> u32 {
        match stop {
            Stop::Depot => 0,
            Stop::Charging(_) => CHARGING_DWELL_SECONDS,
            Stop::Delivery(order) => self.orders[order].dwell_time(),
        }
    }

    /// Order id of a stop; charging stops share the depot id.
    pub fn order_id(&self, stop: Stop) -> u64 {
        match stop {
            Stop::Delivery(order) => self.orders[order].id(),
            Stop::Depot | Stop::Charging(_) => DEPOT_ORDER_ID,
        }
    }

    /// Closest charging station to a stop and its distance.
    pub fn closest_charging_station(&self, stop: Stop) -> Option<(usize, f64)> {
        self.closest_station[self.node(stop)]
    }

    /// Whether any charging station lies within `range` of the stop.
    pub fn is_charging_station_in_range(&self, stop: Stop, range: f64) -> bool {
        self.closest_charging_station(stop)
            .map_or(false, |(_, distance)| distance <= range)
    }

    /// All charging stations within `range` of the stop, closest first.
    pub fn charging_stations_in_range(&self, stop: Stop, range: f64) -> Vec<usize> {
        let node = self.node(stop);
        let station_count = self.charging_stations.len();

        let mut stations: Vec<usize> = self
            .distance_matrix
            .neighbors(node)
            .iter()
            .take_while(|&&other| self.distance_matrix.get(node, other) <= range)
            .filter(|&&other| (1..=station_count).contains(&other))
            .map(|&other| other - 1)
            .collect();

        match stop {
            Stop::Charging(station) if range >= 0.0 => stations.insert(0, station),
            _ => {}
        }
        stations
    }
}
