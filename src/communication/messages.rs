use serde::{Deserialize, Serialize};

/// What an emergency detector reports. `approach` is the raw rotation index as
/// produced by the detector and is validated by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreemptionSignal {
    Emergency { approach: u8 },
    #[default]
    Cleared,
}

impl PreemptionSignal {
    pub fn emergency(approach: impl Into<u8>) -> Self {
        PreemptionSignal::Emergency {
            approach: approach.into(),
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, PreemptionSignal::Emergency { .. })
    }
}
