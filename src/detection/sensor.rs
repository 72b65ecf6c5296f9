use crate::config::DetectorConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A camera, loop detector or classifier feeding the emergency detector.
///
/// Each call reads one frame and returns the approach index of an emergency
/// vehicle in view, or `None` when there is none.
pub trait EmergencySensor: Send + 'static {
    fn poll(&mut self) -> Option<u8>;
}

/// Stand-in sensor that occasionally "sees" an emergency vehicle on a random
/// approach and keeps reporting it for a fixed number of frames.
#[derive(Debug)]
pub struct SimulatedSensor {
    rng: StdRng,
    detection_probability: f64,
    hold_frames: u32,
    active: Option<(u8, u32)>,
}

impl SimulatedSensor {
    pub fn new(rng: StdRng, detection_probability: f64, hold_frames: u32) -> Self {
        Self {
            rng,
            detection_probability: detection_probability.clamp(0.0, 1.0),
            hold_frames: hold_frames.max(1),
            active: None,
        }
    }

    pub fn from_config(config: &DetectorConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(rng, config.detection_probability, config.hold_frames)
    }
}

impl EmergencySensor for SimulatedSensor {
    fn poll(&mut self) -> Option<u8> {
        if let Some((approach, remaining)) = self.active {
            if remaining == 0 {
                self.active = None;
                return None;
            }
            self.active = Some((approach, remaining - 1));
            return Some(approach);
        }

        if self.rng.random_bool(self.detection_probability) {
            let approach = self.rng.random_range(0..4u8);
            self.active = Some((approach, self.hold_frames - 1));
            return Some(approach);
        }
        None
    }
}

/// Sensor replaying a fixed sequence of frames, then reporting nothing.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    frames: VecDeque<Option<u8>>,
}

impl ScriptedSensor {
    pub fn new(frames: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl EmergencySensor for ScriptedSensor {
    fn poll(&mut self) -> Option<u8> {
        self.frames.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certain_detection_is_held_then_cleared() {
        let mut sensor = SimulatedSensor::new(StdRng::seed_from_u64(1), 1.0, 3);
        let first = sensor.poll().unwrap();
        assert!(first < 4);
        assert_eq!(sensor.poll(), Some(first));
        assert_eq!(sensor.poll(), Some(first));
        assert_eq!(sensor.poll(), None);
    }

    #[test]
    fn zero_probability_never_detects() {
        let mut sensor = SimulatedSensor::new(StdRng::seed_from_u64(1), 0.0, 10);
        assert!((0..1000).all(|_| sensor.poll().is_none()));
    }

    #[test]
    fn scripted_sensor_replays_frames() {
        let mut sensor = ScriptedSensor::new([None, Some(2), Some(2)]);
        assert_eq!(sensor.poll(), None);
        assert_eq!(sensor.poll(), Some(2));
        assert_eq!(sensor.remaining(), 1);
        assert_eq!(sensor.poll(), Some(2));
        assert_eq!(sensor.poll(), None);
    }
}
