use crate::error::ControllerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four entry lanes into the intersection.
///
/// The discriminants double as the rotation index used by the controller:
/// North (0) → South (1) → West (2) → East (3) → North ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproachId {
    North = 0,
    South = 1,
    West = 2,
    East = 3,
}

impl ApproachId {
    /// Fixed compass rotation order.
    pub const ROTATION: [ApproachId; 4] = [
        ApproachId::North,
        ApproachId::South,
        ApproachId::West,
        ApproachId::East,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The approach granted after this one in normal rotation.
    pub fn successor(self) -> ApproachId {
        Self::ROTATION[(self.index() + 1) % Self::ROTATION.len()]
    }
}

impl TryFrom<u8> for ApproachId {
    type Error = ControllerError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ROTATION
            .get(index as usize)
            .copied()
            .ok_or(ControllerError::InvalidEvent { index })
    }
}

impl fmt::Display for ApproachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApproachId::North => "North",
            ApproachId::South => "South",
            ApproachId::West => "West",
            ApproachId::East => "East",
        };
        f.write_str(name)
    }
}

/// Possible states of a signal head.
///
/// Yellow is reserved for a transitional phase; the current rotation policy
/// switches directly between Red and Green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightState {
    Green,
    Yellow,
    #[default]
    Red,
}

/// A controlled approach and its signal head.
#[derive(Debug, Clone)]
pub struct Approach {
    pub id: ApproachId,
    light_state: LightState,
}

impl Approach {
    /// Creates an approach showing Red.
    pub fn new(id: ApproachId) -> Self {
        Self {
            id,
            light_state: LightState::Red,
        }
    }

    pub fn set_red(&mut self) {
        self.light_state = LightState::Red;
    }

    pub fn set_green(&mut self) {
        self.light_state = LightState::Green;
    }

    pub fn set_yellow(&mut self) {
        self.light_state = LightState::Yellow;
    }

    pub fn is_green(&self) -> bool {
        self.light_state == LightState::Green
    }

    pub fn light_state(&self) -> LightState {
        self.light_state
    }
}

/// Creates the four approaches in rotation order, all Red.
pub fn create_approaches() -> [Approach; 4] {
    ApproachId::ROTATION.map(Approach::new)
}
