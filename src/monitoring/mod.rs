// monitoring/mod.rs
pub mod event_log;
pub mod renderer;
pub mod siren;
