use crate::simulation_engine::approach::ApproachId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// An emergency signal referenced an approach index outside 0..=3.
    #[error("invalid emergency event: approach index {index} is out of range")]
    InvalidEvent { index: u8 },

    /// An emergency signal arrived for another approach while already preempted.
    #[error("emergency for {requested} ignored: preemption already active for {active}")]
    DuplicatePreemption {
        active: ApproachId,
        requested: ApproachId,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
