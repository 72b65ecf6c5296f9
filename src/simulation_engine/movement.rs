use crate::config::ArenaGeometry;
use crate::control_system::traffic_light_controller::TrafficLightController;
use crate::simulation_engine::vehicles::Vehicle;

/// True while the vehicle has not yet reached the stop line of its lane.
pub fn is_before_stop_line(vehicle: &Vehicle, arena: &ArenaGeometry) -> bool {
    let lane = arena.lane(vehicle.approach());
    (lane.stop_line - vehicle.position) * vehicle.direction.sign() > 0.0
}

/// True once the vehicle has crossed the far boundary of the arena.
pub fn is_out_of_bounds(vehicle: &Vehicle, arena: &ArenaGeometry) -> bool {
    let lane = arena.lane(vehicle.approach());
    (vehicle.position - lane.exit) * vehicle.direction.sign() > 0.0
}

/// Decides whether a vehicle may move this tick.
///
/// - Emergency vehicles always have clearance.
/// - Vehicles still short of their stop line travel freely.
/// - Everyone else needs their approach to be green.
pub fn can_advance(
    vehicle: &Vehicle,
    controller: &TrafficLightController,
    arena: &ArenaGeometry,
) -> bool {
    if vehicle.is_emergency {
        return true;
    }
    if is_before_stop_line(vehicle, arena) {
        return true;
    }
    controller.is_green(vehicle.approach())
}
