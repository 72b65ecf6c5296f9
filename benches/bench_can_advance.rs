// benches/bench_can_advance.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use intersection_preemption::config::ArenaGeometry;
use intersection_preemption::simulation_engine::movement::can_advance;
use intersection_preemption::simulation_engine::vehicles::{
    TravelDirection, Vehicle, VehicleColor, VehicleType,
};
use intersection_preemption::TrafficLightController;
use std::time::{Duration, Instant};

// Vehicles spread along all four lanes, a mix of free-travel, waiting and emergency.
fn create_vehicles(count: usize) -> Vec<Vehicle> {
    let directions = [
        TravelDirection::Southbound,
        TravelDirection::Northbound,
        TravelDirection::Eastbound,
        TravelDirection::Westbound,
    ];
    (0..count)
        .map(|i| {
            let vehicle_type = if i % 10 == 0 {
                VehicleType::EmergencyVan
            } else {
                VehicleType::Car
            };
            Vehicle::new(
                i as u64,
                vehicle_type,
                directions[i % directions.len()],
                (i * 7 % 800) as f64,
                VehicleColor::Grey,
            )
        })
        .collect()
}

fn bench_can_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("can_advance");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    let arena = ArenaGeometry::default();
    let controller = TrafficLightController::new(Instant::now(), Duration::from_secs(5));

    for &size in [50, 100, 200].iter() {
        let vehicles = create_vehicles(size);
        group.bench_function(format!("size_{}", size), |b| {
            b.iter(|| {
                for vehicle in &vehicles {
                    black_box(can_advance(vehicle, &controller, &arena));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_can_advance);
criterion_main!(benches);
