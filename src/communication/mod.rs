// communication/mod.rs
pub mod messages;
pub mod preemption_channel;
