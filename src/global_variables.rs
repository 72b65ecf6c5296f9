// Signal timing
pub const DWELL_SECS: f64 = 5.0;
pub const TICK_RATE_HZ: u32 = 60;
/// Upper bound for any configured interval (dwell, spawn delay).
pub const MAX_INTERVAL_SECS: f64 = 86_400.0;

// Spawner
pub const SPAWN_DELAY_SECS: f64 = 2.0;

// Vehicle speeds (arena units per tick)
pub const ORDINARY_SPEED: f64 = 2.0;
pub const EMERGENCY_SPEED: f64 = 4.0;

// Arena size
pub const ARENA_WIDTH: f64 = 1000.0;
pub const ARENA_HEIGHT: f64 = 800.0;
/// Lane coordinates may sit this far outside the arena (spawn and exit points).
pub const ARENA_MARGIN: f64 = 100.0;

// Event log file
pub const EVENT_LOG_PATH: &str = "traffic_log.txt";
pub const EVENT_LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Detector
pub const DETECTOR_FRAME_RATE_HZ: u32 = 30;
pub const DETECTION_PROBABILITY: f64 = 0.002;
pub const DETECTION_HOLD_FRAMES: u32 = 90;
