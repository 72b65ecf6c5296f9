use crate::config::ArenaGeometry;
use crate::control_system::traffic_light_controller::TrafficLightController;
use crate::simulation_engine::movement::{can_advance, is_out_of_bounds};
use crate::simulation_engine::vehicles::{
    TravelDirection, Vehicle, VehicleColor, VehicleType, ORDINARY_PALETTE,
};
use rand::seq::IndexedRandom;
use rand::Rng;

/// The live set of vehicles inside the arena.
#[derive(Debug, Clone)]
pub struct VehicleRegistry {
    vehicles: Vec<Vehicle>,
    arena: ArenaGeometry,
    next_vehicle_id: u64,
}

impl VehicleRegistry {
    pub fn new(arena: ArenaGeometry) -> Self {
        Self {
            vehicles: Vec::new(),
            arena,
            next_vehicle_id: 1,
        }
    }

    pub fn arena(&self) -> &ArenaGeometry {
        &self.arena
    }

    /// Spawns an ordinary vehicle at the entry edge for `direction` with a
    /// colour drawn from the palette. Returns the new vehicle id.
    pub fn spawn<R: Rng + ?Sized>(&mut self, direction: TravelDirection, rng: &mut R) -> u64 {
        let color = ORDINARY_PALETTE
            .choose(rng)
            .copied()
            .unwrap_or(VehicleColor::Grey);
        self.insert(VehicleType::Car, direction, color)
    }

    /// Spawns an emergency vehicle at the entry edge for `direction`.
    pub fn spawn_emergency(&mut self, direction: TravelDirection) -> u64 {
        self.insert(VehicleType::EmergencyVan, direction, VehicleColor::Red)
    }

    fn insert(&mut self, vehicle_type: VehicleType, direction: TravelDirection, color: VehicleColor) -> u64 {
        let id = self.next_vehicle_id;
        self.next_vehicle_id += 1;
        let entry = self.arena.lane(direction.approach()).entry;
        self.vehicles
            .push(Vehicle::new(id, vehicle_type, direction, entry, color));
        log::debug!(
            "Spawned vehicle {:?} {} heading {:?}",
            vehicle_type,
            id,
            direction
        );
        id
    }

    /// Moves every permitted vehicle one step, then drops the ones that left
    /// the arena. Returns the ids of removed vehicles.
    pub fn tick(&mut self, controller: &TrafficLightController) -> Vec<u64> {
        let mut finished_vehicle_ids = Vec::new();

        for vehicle in self.vehicles.iter_mut() {
            if can_advance(vehicle, controller, &self.arena) {
                vehicle.advance();
            }
            if is_out_of_bounds(vehicle, &self.arena) {
                finished_vehicle_ids.push(vehicle.id);
            }
        }

        if !finished_vehicle_ids.is_empty() {
            self.vehicles
                .retain(|v| !finished_vehicle_ids.contains(&v.id));
            log::debug!("Vehicles {:?} left the arena", finished_vehicle_ids);
        }
        finished_vehicle_ids
    }

    pub fn has_emergency_present(&self) -> bool {
        self.vehicles.iter().any(|v| v.is_emergency)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn get(&self, id: u64) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_engine::approach::ApproachId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, Instant};

    fn setup() -> (VehicleRegistry, TrafficLightController, StdRng) {
        (
            VehicleRegistry::new(ArenaGeometry::default()),
            TrafficLightController::new(Instant::now(), Duration::from_secs(5)),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn spawn_places_vehicle_at_entry_edge() {
        let (mut registry, _, mut rng) = setup();
        let id = registry.spawn(TravelDirection::Westbound, &mut rng);
        let vehicle = registry.get(id).unwrap();
        assert_eq!(vehicle.position, 1010.0);
        assert!(ORDINARY_PALETTE.contains(&vehicle.color));
        assert!(!registry.has_emergency_present());
    }

    #[test]
    fn ids_are_unique() {
        let (mut registry, _, mut rng) = setup();
        let a = registry.spawn(TravelDirection::Eastbound, &mut rng);
        let b = registry.spawn_emergency(TravelDirection::Eastbound);
        assert_ne!(a, b);
        assert!(registry.has_emergency_present());
    }

    #[test]
    fn red_approach_holds_vehicles_at_stop_line() {
        let (mut registry, controller, mut rng) = setup();
        assert!(!controller.is_green(ApproachId::West));
        let id = registry.spawn(TravelDirection::Eastbound, &mut rng);
        for _ in 0..1000 {
            registry.tick(&controller);
        }
        let vehicle = registry.get(id).unwrap();
        assert!(vehicle.position >= 290.0);
        assert!(vehicle.position < 290.0 + 2.0 * vehicle.speed);
    }

    #[test]
    fn vehicle_is_removed_exactly_once_after_leaving() {
        let (mut registry, controller, mut rng) = setup();
        let id = registry.spawn(TravelDirection::Southbound, &mut rng);
        let mut removals = 0;
        for _ in 0..1000 {
            removals += registry.tick(&controller).iter().filter(|&&r| r == id).count();
        }
        assert_eq!(removals, 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn emergency_vehicle_crosses_red_and_leaves() {
        let (mut registry, controller, _) = setup();
        registry.spawn_emergency(TravelDirection::Westbound);
        let mut ticks = 0;
        while registry.has_emergency_present() {
            registry.tick(&controller);
            ticks += 1;
            assert!(ticks < 1000, "emergency vehicle never left");
        }
        // 1010 -> below -50 at 4 units per tick
        assert_eq!(ticks, 266);
    }
}
