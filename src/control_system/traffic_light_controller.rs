use std::time::{Duration, Instant};

use crate::error::{ControllerError, Result};
use crate::simulation_engine::approach::{create_approaches, Approach, ApproachId, LightState};

/// An active emergency override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preemption {
    pub target: ApproachId,
    pub since: Instant,
}

/// Controller state as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Cycling,
    Preempted(ApproachId),
}

/// Round-robin signal controller for a four-approach intersection.
///
/// Exactly one approach is green at any time. Normal rotation advances after
/// `dwell`; an emergency preemption pins the grant to one approach and suspends
/// the rotation deadline until [`TrafficLightController::resume`] is called.
#[derive(Debug, Clone)]
pub struct TrafficLightController {
    approaches: [Approach; 4],
    granted_index: usize,
    cycle_deadline: Instant,
    dwell: Duration,
    emergency_override: Option<Preemption>,
}

impl TrafficLightController {
    /// Starts cycling with North granted.
    pub fn new(now: Instant, dwell: Duration) -> Self {
        let mut controller = Self {
            approaches: create_approaches(),
            granted_index: 0,
            cycle_deadline: now + dwell,
            dwell,
            emergency_override: None,
        };
        controller.grant(0);
        controller
    }

    // All red, then green on `index`. Nothing reads the lights in between.
    fn grant(&mut self, index: usize) {
        for approach in self.approaches.iter_mut() {
            approach.set_red();
        }
        self.granted_index = index;
        self.approaches[index].set_green();
    }

    /// Advances the rotation if the dwell deadline has passed.
    /// Returns the newly granted approach, or `None` when nothing changed.
    pub fn update(&mut self, now: Instant) -> Option<ApproachId> {
        if self.emergency_override.is_some() {
            // Do not cycle during emergency override.
            return None;
        }
        if now < self.cycle_deadline {
            return None;
        }
        self.advance(now);
        Some(self.granted())
    }

    /// Unconditionally moves the grant to the next approach in rotation.
    pub fn advance(&mut self, now: Instant) {
        let next = (self.granted_index + 1) % self.approaches.len();
        self.grant(next);
        self.cycle_deadline = now + self.dwell;
        log::debug!("Rotation: {} granted", self.granted());
    }

    /// Forces an immediate grant to `target`.
    ///
    /// Returns `Ok(true)` on entering preemption, `Ok(false)` when already
    /// preempted for the same approach, and
    /// [`ControllerError::DuplicatePreemption`] when another approach already
    /// holds the override. The rotation deadline is left untouched.
    pub fn preempt(&mut self, target: ApproachId, now: Instant) -> Result<bool> {
        match self.emergency_override {
            Some(active) if active.target == target => Ok(false),
            Some(active) => Err(ControllerError::DuplicatePreemption {
                active: active.target,
                requested: target,
            }),
            None => {
                self.grant(target.index());
                self.emergency_override = Some(Preemption { target, since: now });
                Ok(true)
            }
        }
    }

    /// Leaves preemption. The preempting approach stays green and a fresh
    /// dwell window starts at `now`. Returns the cleared override, if any.
    pub fn resume(&mut self, now: Instant) -> Option<Preemption> {
        let cleared = self.emergency_override.take()?;
        self.cycle_deadline = now + self.dwell;
        Some(cleared)
    }

    pub fn state(&self) -> ControllerState {
        match self.emergency_override {
            Some(p) => ControllerState::Preempted(p.target),
            None => ControllerState::Cycling,
        }
    }

    pub fn is_preempted(&self) -> bool {
        self.emergency_override.is_some()
    }

    pub fn preemption(&self) -> Option<Preemption> {
        self.emergency_override
    }

    pub fn granted(&self) -> ApproachId {
        self.approaches[self.granted_index].id
    }

    pub fn is_green(&self, approach: ApproachId) -> bool {
        self.approaches[approach.index()].is_green()
    }

    pub fn light_state(&self, approach: ApproachId) -> LightState {
        self.approaches[approach.index()].light_state()
    }

    pub fn approaches(&self) -> &[Approach] {
        &self.approaches
    }

    pub fn cycle_deadline(&self) -> Instant {
        self.cycle_deadline
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Number of approaches currently showing green. Always 1 between calls.
    pub fn green_count(&self) -> usize {
        self.approaches.iter().filter(|a| a.is_green()).count()
    }
}
