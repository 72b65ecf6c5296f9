use crate::global_variables::{EMERGENCY_SPEED, ORDINARY_SPEED};
use crate::simulation_engine::approach::ApproachId;
use serde::{Deserialize, Serialize};

/// Different types of vehicles in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    Car,
    EmergencyVan,
}

/// Heading of a vehicle. Each heading is fed by exactly one approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelDirection {
    Southbound,
    Northbound,
    Eastbound,
    Westbound,
}

impl TravelDirection {
    /// Heading of vehicles entering from the given approach.
    pub fn from_approach(approach: ApproachId) -> Self {
        match approach {
            ApproachId::North => TravelDirection::Southbound,
            ApproachId::South => TravelDirection::Northbound,
            ApproachId::West => TravelDirection::Eastbound,
            ApproachId::East => TravelDirection::Westbound,
        }
    }

    /// The approach whose signal controls this heading.
    pub fn approach(self) -> ApproachId {
        match self {
            TravelDirection::Southbound => ApproachId::North,
            TravelDirection::Northbound => ApproachId::South,
            TravelDirection::Eastbound => ApproachId::West,
            TravelDirection::Westbound => ApproachId::East,
        }
    }

    /// +1 when travel increases the axis coordinate, -1 otherwise.
    pub fn sign(self) -> f64 {
        match self {
            TravelDirection::Southbound | TravelDirection::Eastbound => 1.0,
            TravelDirection::Northbound | TravelDirection::Westbound => -1.0,
        }
    }

    /// True for headings that move along the y axis.
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            TravelDirection::Southbound | TravelDirection::Northbound
        )
    }
}

/// Display colour. Carries no meaning for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleColor {
    Blue,
    Orange,
    Grey,
    Red,
}

/// Palette for ordinary vehicles.
pub const ORDINARY_PALETTE: [VehicleColor; 3] =
    [VehicleColor::Blue, VehicleColor::Orange, VehicleColor::Grey];

/// Represents a vehicle travelling through the intersection.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: u64,
    pub vehicle_type: VehicleType,
    pub direction: TravelDirection,
    /// Offset along the travel axis.
    pub position: f64,
    /// Units advanced per permitted tick.
    pub speed: f64,
    pub color: VehicleColor,
    pub is_emergency: bool,
}

impl Vehicle {
    /// Creates a new vehicle with the speed and priority implied by its type.
    pub fn new(
        id: u64,
        vehicle_type: VehicleType,
        direction: TravelDirection,
        position: f64,
        color: VehicleColor,
    ) -> Self {
        let (speed, is_emergency) = match vehicle_type {
            VehicleType::Car => (ORDINARY_SPEED, false),
            VehicleType::EmergencyVan => (EMERGENCY_SPEED, true), // Emergency vehicle flag
        };

        Self {
            id,
            vehicle_type,
            direction,
            position,
            speed,
            color,
            is_emergency,
        }
    }

    pub fn approach(&self) -> ApproachId {
        self.direction.approach()
    }

    /// Moves the vehicle one step along its heading.
    pub fn advance(&mut self) {
        self.position += self.speed * self.direction.sign();
    }
}
