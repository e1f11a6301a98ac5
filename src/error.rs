//! Error types for model validation and instance loading.

use std::fmt;
use std::io;

/// Rejected input while building the fleet and demand model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Drone tare weight must be strictly positive.
    NonPositiveTareWeight,
    /// Drone battery size must be strictly positive.
    NonPositiveBatterySize,
    /// Drone loading capacity must be strictly positive.
    NonPositiveLoadingCapacity,
    /// Drone power draw per kilogram must be strictly positive.
    NonPositivePowerPerKg,
    /// Drone maximum speed must be strictly positive.
    NonPositiveMaxSpeed,
    /// Battery reserve fraction outside `[0, 1)`.
    InvalidBatteryReserve(f64),
    /// A problem needs at least one drone.
    NoDrones,
    /// No drone can carry the order.
    OrderTooHeavy { order: u64, weight: u32, max_capacity: u32 },
    /// The distance oracle returned a negative or non-finite value.
    InvalidDistance { from: u64, to: u64, value: f64 },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::NonPositiveTareWeight => write!(f, "invalid non-positive drone weight"),
            ModelError::NonPositiveBatterySize => write!(f, "invalid non-positive battery size"),
            ModelError::NonPositiveLoadingCapacity => {
                write!(f, "invalid non-positive loading capacity")
            }
            ModelError::NonPositivePowerPerKg => {
                write!(f, "invalid non-positive power per kilogram")
            }
            ModelError::NonPositiveMaxSpeed => write!(f, "invalid non-positive maximum speed"),
            ModelError::InvalidBatteryReserve(fraction) => {
                write!(f, "battery reserve fraction {} is outside [0, 1)", fraction)
            }
            ModelError::NoDrones => write!(f, "at least one drone is required"),
            ModelError::OrderTooHeavy {
                order,
                weight,
                max_capacity,
            } => write!(
                f,
                "order {} weighs {} g but no drone carries more than {} g",
                order, weight, max_capacity
            ),
            ModelError::InvalidDistance { from, to, value } => write!(
                f,
                "distance oracle returned {} between locations {} and {}",
                value, from, to
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// Failure while reading an instance file.
#[derive(Debug)]
pub enum InstanceError {
    Io(io::Error),
    Parse(serde_json::Error),
    Model(ModelError),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::Io(err) => write!(f, "cannot read instance: {}", err),
            InstanceError::Parse(err) => write!(f, "malformed instance: {}", err),
            InstanceError::Model(err) => write!(f, "invalid instance: {}", err),
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstanceError::Io(err) => Some(err),
            InstanceError::Parse(err) => Some(err),
            InstanceError::Model(err) => Some(err),
        }
    }
}

impl From<io::Error> for InstanceError {
    fn from(err: io::Error) -> Self {
        InstanceError::Io(err)
    }
}

impl From<serde_json::Error> for InstanceError {
    fn from(err: serde_json::Error) -> Self {
        InstanceError::Parse(err)
    }
}

impl From<ModelError> for InstanceError {
    fn from(err: ModelError) -> Self {
        InstanceError::Model(err)
    }
}
