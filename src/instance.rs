//! JSON instance format.

use crate::error::{InstanceError, ModelError};
use crate::problem::{Drone, Euclidean, Haversine, Location, Order, Problem};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_power_per_kg() -> f64 {
    Drone::DEFAULT_POWER_PER_KG
}

fn default_max_speed() -> f64 {
    Drone::DEFAULT_MAX_SPEED
}

fn default_reserve_fraction() -> f64 {
    Drone::DEFAULT_RESERVE_FRACTION
}

/// Drone parameters as written in an instance file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneDefinition {
    pub tare_weight: u32,
    pub battery_size: f64,
    pub loading_capacity: u32,
    #[serde(default)]
    pub initial_charge: Option<f64>,
    #[serde(default = "default_power_per_kg")]
    pub power_per_kg: f64,
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
    #[serde(default = "default_reserve_fraction")]
    pub battery_reserve: f64,
}

impl DroneDefinition {
    pub fn build(&self) -> Result<Drone, ModelError> {
        Drone::with_parameters(
            self.tare_weight,
            self.battery_size,
            self.loading_capacity,
            self.initial_charge,
            self.power_per_kg,
            self.max_speed,
            self.battery_reserve,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDefinition {
    pub destination: Location,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub dwell_time: u32,
}

/// How distances between locations are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Coordinates are latitude/longitude in degrees
    #[default]
    Haversine,
    /// Coordinates are planar meters
    Euclidean,
}

/// A routing instance: fleet, depot, charging stations and orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metric: Metric,
    pub drones: Vec<DroneDefinition>,
    pub depot: Location,
    #[serde(default)]
    pub charging_stations: Vec<Location>,
    #[serde(default)]
    pub orders: Vec<OrderDefinition>,
}

impl Instance {
    pub fn from_json(json: &str) -> Result<Self, InstanceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an instance from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InstanceError> {
        let json = fs::read_to_string(path)?;
        Instance::from_json(&json)
    }

    /// Validate the definitions and precompute the distance matrix.
    pub fn into_problem(self) -> Result<Problem, InstanceError> {
        let drones = self
            .drones
            .iter()
            .map(DroneDefinition::build)
            .collect::<Result<Vec<_>, _>>()?;
        let orders = self
            .orders
            .into_iter()
            .map(|order| Order::new(order.destination, order.weight, order.dwell_time))
            .collect();

        let problem = match self.metric {
            Metric::Haversine => {
                Problem::new(drones, self.depot, self.charging_stations, orders, &Haversine)?
            }
            Metric::Euclidean => {
                Problem::new(drones, self.depot, self.charging_stations, orders, &Euclidean)?
            }
        };

        Ok(problem)
    }
}
