// detection/mod.rs
pub mod detector;
pub mod sensor;
