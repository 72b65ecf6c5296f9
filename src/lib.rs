pub mod communication;
pub mod config;
pub mod control_system;
pub mod detection;
pub mod error;
pub mod global_variables;
pub mod monitoring;
pub mod shared_data;
pub mod simulation_engine;

pub use config::SimulationConfig;
pub use control_system::traffic_light_controller::{ControllerState, TrafficLightController};
pub use error::ControllerError;
pub use simulation_engine::approach::ApproachId;
pub use simulation_engine::simulation::Simulation;
