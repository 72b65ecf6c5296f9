// src/shared_data.rs

use crate::control_system::traffic_light_controller::TrafficLightController;
use crate::simulation_engine::approach::{ApproachId, LightState};
use crate::simulation_engine::registry::VehicleRegistry;
use crate::simulation_engine::vehicles::{TravelDirection, VehicleColor};
use serde::{Deserialize, Serialize};

/// Signal head state for one approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightView {
    pub approach: ApproachId,
    pub state: LightState,
}

/// A vehicle as a renderer sees it, in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub direction: TravelDirection,
    pub color: VehicleColor,
    pub is_emergency: bool,
}

/// Read-only picture of the intersection at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionSnapshot {
    pub tick: u64,
    pub granted: ApproachId,
    pub preempted: bool,
    pub lights: Vec<LightView>,
    pub vehicles: Vec<VehicleView>,
}

impl IntersectionSnapshot {
    pub fn capture(
        tick: u64,
        controller: &TrafficLightController,
        registry: &VehicleRegistry,
    ) -> Self {
        let lights = controller
            .approaches()
            .iter()
            .map(|a| LightView {
                approach: a.id,
                state: a.light_state(),
            })
            .collect();

        let arena = registry.arena();
        let vehicles = registry
            .vehicles()
            .iter()
            .map(|v| {
                let lane = arena.lane(v.approach()).lane;
                let (x, y) = if v.direction.is_vertical() {
                    (lane, v.position)
                } else {
                    (v.position, lane)
                };
                VehicleView {
                    id: v.id,
                    x,
                    y,
                    direction: v.direction,
                    color: v.color,
                    is_emergency: v.is_emergency,
                }
            })
            .collect();

        Self {
            tick,
            granted: controller.granted(),
            preempted: controller.is_preempted(),
            lights,
            vehicles,
        }
    }

    pub fn green_count(&self) -> usize {
        self.lights
            .iter()
            .filter(|l| l.state == LightState::Green)
            .count()
    }
}
