// simulation_main.rs
use intersection_preemption::communication::preemption_channel::preemption_channel;
use intersection_preemption::detection::detector::spawn_detector;
use intersection_preemption::detection::sensor::SimulatedSensor;
use intersection_preemption::monitoring::event_log::EventLog;
use intersection_preemption::monitoring::renderer::LogRenderer;
use intersection_preemption::{Simulation, SimulationConfig};
use std::error::Error;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading configuration from {}", path);
            SimulationConfig::load(&path)?
        }
        None => SimulationConfig::default(),
    };
    config.validate()?;

    let event_log = EventLog::open(&config.log_path)?;
    let (publisher, receiver) = preemption_channel();

    let detector = if config.detector.enabled {
        let sensor = SimulatedSensor::from_config(&config.detector, config.seed);
        let frame_period = Duration::from_secs_f64(1.0 / config.detector.frame_rate_hz as f64);
        Some(spawn_detector(sensor, publisher, frame_period))
    } else {
        log::info!("Emergency detector disabled");
        None
    };

    let mut simulation = Simulation::new(&config, receiver, event_log, Instant::now().into_std())
        .with_renderer(Box::new(LogRenderer::new(config.tick_rate_hz as u64)));

    println!(
        "Starting intersection simulation at {} Hz (dwell {}s). Press Ctrl-C to stop.",
        config.tick_rate_hz, config.dwell_secs
    );
    simulation
        .run_until(config.tick_period(), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    if let Some(detector) = detector {
        let frames = detector.shutdown().await?;
        println!("Detector processed {} frames", frames);
    }
    Ok(())
}
