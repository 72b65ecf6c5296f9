use crate::error::{ControllerError, Result};
use crate::global_variables::{
    ARENA_HEIGHT, ARENA_MARGIN, ARENA_WIDTH, DETECTION_HOLD_FRAMES, DETECTION_PROBABILITY,
    DETECTOR_FRAME_RATE_HZ, DWELL_SECS, EVENT_LOG_PATH, MAX_INTERVAL_SECS, SPAWN_DELAY_SECS,
    TICK_RATE_HZ,
};
use crate::simulation_engine::approach::ApproachId;
use crate::simulation_engine::vehicles::TravelDirection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Positions along the travel axis for the lane fed by one approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneGeometry {
    /// Where spawned vehicles appear.
    pub entry: f64,
    /// Vehicles before this point travel freely regardless of the signal.
    pub stop_line: f64,
    /// Vehicles past this point have left the arena.
    pub exit: f64,
    /// Fixed cross-axis coordinate of the lane (x for north/south, y for west/east).
    pub lane: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaGeometry {
    pub north: LaneGeometry,
    pub south: LaneGeometry,
    pub west: LaneGeometry,
    pub east: LaneGeometry,
}

impl ArenaGeometry {
    pub fn lane(&self, approach: ApproachId) -> &LaneGeometry {
        match approach {
            ApproachId::North => &self.north,
            ApproachId::South => &self.south,
            ApproachId::West => &self.west,
            ApproachId::East => &self.east,
        }
    }

    /// Checks that every lane runs entry -> stop line -> exit along its heading
    /// and stays close to the arena.
    pub fn validate(&self) -> Result<()> {
        for approach in ApproachId::ROTATION {
            let lane = self.lane(approach);
            let direction = TravelDirection::from_approach(approach);
            let (extent, cross) = if direction.is_vertical() {
                (ARENA_HEIGHT, ARENA_WIDTH)
            } else {
                (ARENA_WIDTH, ARENA_HEIGHT)
            };
            let within = |v: f64, max: f64| {
                v.is_finite() && (-ARENA_MARGIN..=max + ARENA_MARGIN).contains(&v)
            };
            let along_ok = [lane.entry, lane.stop_line, lane.exit]
                .into_iter()
                .all(|v| within(v, extent));
            if !along_ok || !within(lane.lane, cross) {
                return Err(ControllerError::Config(format!(
                    "{} lane coordinates must lie within {} of the arena, got {:?}",
                    approach, ARENA_MARGIN, lane
                )));
            }
            let sign = direction.sign();
            if (lane.stop_line - lane.entry) * sign <= 0.0
                || (lane.exit - lane.stop_line) * sign <= 0.0
            {
                return Err(ControllerError::Config(format!(
                    "{} lane must run entry -> stop_line -> exit heading {:?}, got {:?}",
                    approach, direction, lane
                )));
            }
        }
        Ok(())
    }
}

impl Default for ArenaGeometry {
    fn default() -> Self {
        Self {
            north: LaneGeometry {
                entry: -60.0,
                stop_line: 120.0,
                exit: ARENA_HEIGHT,
                lane: 510.0,
            },
            south: LaneGeometry {
                entry: ARENA_HEIGHT + 10.0,
                stop_line: 670.0,
                exit: -50.0,
                lane: 490.0,
            },
            west: LaneGeometry {
                entry: -60.0,
                stop_line: 290.0,
                exit: ARENA_WIDTH,
                lane: 390.0,
            },
            east: LaneGeometry {
                entry: ARENA_WIDTH + 10.0,
                stop_line: 710.0,
                exit: -50.0,
                lane: 410.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub enabled: bool,
    pub frame_rate_hz: u32,
    /// Chance per frame that an idle sensor reports an emergency vehicle.
    pub detection_probability: f64,
    /// Frames a detection stays reported before the sensor clears it.
    pub hold_frames: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frame_rate_hz: DETECTOR_FRAME_RATE_HZ,
            detection_probability: DETECTION_PROBABILITY,
            hold_frames: DETECTION_HOLD_FRAMES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub dwell_secs: f64,
    pub tick_rate_hz: u32,
    pub spawn_delay_secs: f64,
    pub log_path: String,
    pub seed: Option<u64>,
    pub arena: ArenaGeometry,
    pub detector: DetectorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dwell_secs: DWELL_SECS,
            tick_rate_hz: TICK_RATE_HZ,
            spawn_delay_secs: SPAWN_DELAY_SECS,
            log_path: EVENT_LOG_PATH.to_string(),
            seed: None,
            arena: ArenaGeometry::default(),
            detector: DetectorConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_interval("dwell_secs", self.dwell_secs)?;
        if self.tick_rate_hz == 0 {
            return Err(ControllerError::Config("tick_rate_hz must be non-zero".into()));
        }
        check_interval("spawn_delay_secs", self.spawn_delay_secs)?;
        if self.detector.enabled && self.detector.frame_rate_hz == 0 {
            return Err(ControllerError::Config(
                "detector.frame_rate_hz must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detector.detection_probability) {
            return Err(ControllerError::Config(format!(
                "detector.detection_probability must be within 0..=1, got {}",
                self.detector.detection_probability
            )));
        }
        self.arena.validate()
    }

    /// Dwell time. Out-of-range values fall back to the default; `validate`
    /// reports them.
    pub fn dwell(&self) -> Duration {
        interval_or(self.dwell_secs, DWELL_SECS)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz as f64)
    }

    pub fn spawn_delay(&self) -> Duration {
        interval_or(self.spawn_delay_secs, SPAWN_DELAY_SECS)
    }
}

fn interval(secs: f64) -> Option<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(d) if !d.is_zero() && secs <= MAX_INTERVAL_SECS => Some(d),
        _ => None,
    }
}

fn check_interval(name: &str, secs: f64) -> Result<()> {
    match interval(secs) {
        Some(_) => Ok(()),
        None => Err(ControllerError::Config(format!(
            "{} must be within (0, {}], got {}",
            name, MAX_INTERVAL_SECS, secs
        ))),
    }
}

fn interval_or(secs: f64, fallback: f64) -> Duration {
    interval(secs).unwrap_or_else(|| Duration::from_secs_f64(fallback))
}
