// simulation.rs
use crate::communication::messages::PreemptionSignal;
use crate::communication::preemption_channel::PreemptionReceiver;
use crate::config::SimulationConfig;
use crate::control_system::traffic_light_controller::{ControllerState, TrafficLightController};
use crate::monitoring::event_log::{ControllerEvent, EventLog};
use crate::monitoring::renderer::Renderer;
use crate::monitoring::siren::{CueDriver, LogCue, SirenMonitor};
use crate::shared_data::IntersectionSnapshot;
use crate::simulation_engine::approach::ApproachId;
use crate::simulation_engine::registry::VehicleRegistry;
use crate::simulation_engine::vehicles::TravelDirection;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};

const DIRECTIONS: [TravelDirection; 4] = [
    TravelDirection::Southbound,
    TravelDirection::Northbound,
    TravelDirection::Eastbound,
    TravelDirection::Westbound,
];

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Set when normal rotation moved the grant this tick.
    pub rotated_to: Option<ApproachId>,
    pub preempted_to: Option<ApproachId>,
    pub resumed_from: Option<ApproachId>,
    pub spawned: Vec<u64>,
    pub removed: Vec<u64>,
}

/// Owns the controller and the vehicles, and drives both one tick at a time.
pub struct Simulation {
    controller: TrafficLightController,
    registry: VehicleRegistry,
    receiver: PreemptionReceiver,
    pending_emergency: Option<ApproachId>,
    event_log: EventLog,
    siren: SirenMonitor<Box<dyn CueDriver + Send>>,
    renderer: Option<Box<dyn Renderer + Send>>,
    rng: StdRng,
    spawn_delay: Option<Duration>,
    last_spawn: Option<Instant>,
    tick_count: u64,
}

impl Simulation {
    /// `now` starts the first dwell window. It must come from the clock that
    /// later drives [`Simulation::tick`]; with [`Simulation::run_until`] that is
    /// `tokio::time::Instant::now().into_std()`.
    pub fn new(
        config: &SimulationConfig,
        receiver: PreemptionReceiver,
        event_log: EventLog,
        now: Instant,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            controller: TrafficLightController::new(now, config.dwell()),
            registry: VehicleRegistry::new(config.arena),
            receiver,
            pending_emergency: None,
            event_log,
            siren: SirenMonitor::new(Box::new(LogCue) as Box<dyn CueDriver + Send>),
            renderer: None,
            rng,
            spawn_delay: Some(config.spawn_delay()),
            last_spawn: None,
            tick_count: 0,
        }
    }

    pub fn with_cue_driver(mut self, driver: Box<dyn CueDriver + Send>) -> Self {
        self.siren = SirenMonitor::new(driver);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer + Send>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Turns off the periodic spawner. Vehicles can still be added with
    /// [`Simulation::spawn_vehicle`].
    pub fn without_spawner(mut self) -> Self {
        self.spawn_delay = None;
        self
    }

    /// Runs one simulation step at time `now`.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        let fresh_signal = self.drain_preemption_channel();
        self.run_spawner(now, &mut report);

        report.removed = self.registry.tick(&self.controller);

        if self.controller.is_preempted() && !self.registry.has_emergency_present() {
            if let Some(cleared) = self.controller.resume(now) {
                self.record(ControllerEvent::EmergencyCleared {
                    approach: cleared.target,
                });
                report.resumed_from = Some(cleared.target);
            }
        }

        if let Some(target) = self.pending_emergency {
            if !self.registry.has_emergency_present() {
                self.enter_preemption(target, now, &mut report);
            } else if fresh_signal {
                if let Err(e) = self.controller.preempt(target, now) {
                    log::debug!("{}", e);
                }
            }
        }

        if !self.controller.is_preempted() {
            report.rotated_to = self.controller.update(now);
        }

        self.siren.update(self.registry.has_emergency_present());
        self.check_invariants();

        self.tick_count += 1;
        if let Some(renderer) = self.renderer.as_mut() {
            let snapshot =
                IntersectionSnapshot::capture(self.tick_count, &self.controller, &self.registry);
            renderer.render(&snapshot);
        }
        report
    }

    /// Runs the fixed-cadence tick loop until `shutdown` completes.
    pub async fn run_until<F>(&mut self, tick_period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Simulation stopped after {} ticks", self.tick_count);
                    break;
                }
                instant = ticker.tick() => {
                    self.tick(instant.into_std());
                }
            }
        }
    }

    /// Takes the latest detector signal, if any. Returns whether a valid new
    /// signal arrived.
    fn drain_preemption_channel(&mut self) -> bool {
        let Some(signal) = self.receiver.try_recv() else {
            return false;
        };
        match signal {
            PreemptionSignal::Cleared => {
                self.pending_emergency = None;
                true
            }
            PreemptionSignal::Emergency { approach } => match ApproachId::try_from(approach) {
                Ok(target) => {
                    self.pending_emergency = Some(target);
                    true
                }
                Err(_) => {
                    self.record(ControllerEvent::InvalidEvent { index: approach });
                    false
                }
            },
        }
    }

    fn run_spawner(&mut self, now: Instant, report: &mut TickReport) {
        let Some(delay) = self.spawn_delay else {
            return;
        };
        let due = match self.last_spawn {
            Some(last) => now.saturating_duration_since(last) > delay,
            None => true,
        };
        if due {
            if let Some(&direction) = DIRECTIONS.choose(&mut self.rng) {
                report
                    .spawned
                    .push(self.registry.spawn(direction, &mut self.rng));
            }
            self.last_spawn = Some(now);
        }
    }

    fn enter_preemption(&mut self, target: ApproachId, now: Instant, report: &mut TickReport) {
        match self.controller.preempt(target, now) {
            Ok(true) => {
                let id = self
                    .registry
                    .spawn_emergency(TravelDirection::from_approach(target));
                report.spawned.push(id);
                report.preempted_to = Some(target);
                self.record(ControllerEvent::EmergencyEntered { approach: target });
            }
            Ok(false) => {}
            Err(e) => log::debug!("{}", e),
        }
    }

    fn record(&mut self, event: ControllerEvent) {
        if let Err(e) = self.event_log.record(&event) {
            log::error!("Failed to write event log: {}", e);
        }
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.controller.green_count(),
            1,
            "exactly one approach must be green"
        );
        debug_assert_eq!(
            self.registry.has_emergency_present(),
            self.controller.is_preempted(),
            "registry inconsistency: emergency present = {}, controller state = {:?}",
            self.registry.has_emergency_present(),
            self.controller.state()
        );
    }

    /// Adds an ordinary vehicle heading `direction`.
    pub fn spawn_vehicle(&mut self, direction: TravelDirection) -> u64 {
        self.registry.spawn(direction, &mut self.rng)
    }

    pub fn controller(&self) -> &TrafficLightController {
        &self.controller
    }

    pub fn registry(&self) -> &VehicleRegistry {
        &self.registry
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn granted(&self) -> ApproachId {
        self.controller.granted()
    }

    pub fn has_emergency_present(&self) -> bool {
        self.registry.has_emergency_present()
    }

    pub fn siren_playing(&self) -> bool {
        self.siren.is_playing()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn snapshot(&self) -> IntersectionSnapshot {
        IntersectionSnapshot::capture(self.tick_count, &self.controller, &self.registry)
    }
}
