// simulation_engine/mod.rs
pub mod approach;
pub mod movement;
pub mod registry;
pub mod simulation;
pub mod vehicles;
