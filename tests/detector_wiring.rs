// Detector task and tick loop running together on a paused tokio clock.

use intersection_preemption::communication::preemption_channel::preemption_channel;
use intersection_preemption::detection::detector::spawn_detector;
use intersection_preemption::detection::sensor::{EmergencySensor, ScriptedSensor};
use intersection_preemption::monitoring::event_log::EventLog;
use intersection_preemption::{ApproachId, ControllerState, Simulation, SimulationConfig};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};

fn config() -> SimulationConfig {
    SimulationConfig {
        seed: Some(5),
        ..SimulationConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn detector_signal_preempts_running_simulation() {
    let config = config();
    let (publisher, receiver) = preemption_channel();
    let sensor = ScriptedSensor::new(std::iter::repeat(Some(ApproachId::East as u8)).take(10));
    let detector = spawn_detector(sensor, publisher, Duration::from_millis(33));

    let mut sim =
        Simulation::new(&config, receiver, EventLog::discard(), Instant::now().into_std())
            .without_spawner();
    sim.run_until(config.tick_period(), sleep(Duration::from_millis(100)))
        .await;

    assert!(sim.tick_count() >= 5);
    assert_eq!(sim.state(), ControllerState::Preempted(ApproachId::East));
    assert!(sim.siren_playing());

    detector.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn invalid_detector_output_never_stops_the_loop() {
    let config = config();
    let (publisher, receiver) = preemption_channel();
    let sensor = ScriptedSensor::new([Some(200), Some(200), None]);
    let detector = spawn_detector(sensor, publisher, Duration::from_millis(20));

    let mut sim =
        Simulation::new(&config, receiver, EventLog::discard(), Instant::now().into_std())
            .without_spawner();
    sim.run_until(config.tick_period(), sleep(Duration::from_secs(6)))
        .await;

    assert_eq!(sim.state(), ControllerState::Cycling);
    assert_eq!(sim.granted(), ApproachId::South);
    assert!(!sim.has_emergency_present());

    let frames = detector.shutdown().await.unwrap();
    assert!(frames >= 3);
}

/// Sensor whose every read takes a long time, like a slow camera.
struct SlowSensor {
    delay: std::time::Duration,
    reads: Arc<AtomicU32>,
}

impl EmergencySensor for SlowSensor {
    fn poll(&mut self) -> Option<u8> {
        std::thread::sleep(self.delay);
        self.reads.fetch_add(1, Ordering::SeqCst);
        None
    }
}

#[tokio::test]
async fn blocking_sensor_does_not_slow_the_tick_loop() {
    let config = config();
    let (publisher, receiver) = preemption_channel();
    let reads = Arc::new(AtomicU32::new(0));
    let sensor = SlowSensor {
        delay: std::time::Duration::from_millis(300),
        reads: reads.clone(),
    };
    let detector = spawn_detector(sensor, publisher, Duration::from_millis(33));

    let mut sim =
        Simulation::new(&config, receiver, EventLog::discard(), Instant::now().into_std())
            .without_spawner();
    sim.run_until(config.tick_period(), sleep(Duration::from_secs(1)))
        .await;

    // 60 Hz for one second on a single-threaded runtime.
    assert!(sim.tick_count() >= 40, "only {} ticks", sim.tick_count());
    assert!(reads.load(Ordering::SeqCst) >= 1);

    detector.shutdown().await.unwrap();
}
