use crate::shared_data::IntersectionSnapshot;
use crate::simulation_engine::approach::ApproachId;

/// Consumer of the per-tick intersection picture. Receives a shared
/// reference and cannot change controller state.
pub trait Renderer {
    fn render(&mut self, snapshot: &IntersectionSnapshot);
}

/// Renderer that logs grant changes and a periodic JSON snapshot.
#[derive(Debug)]
pub struct LogRenderer {
    every_n_ticks: u64,
    last_granted: Option<ApproachId>,
}

impl LogRenderer {
    pub fn new(every_n_ticks: u64) -> Self {
        Self {
            every_n_ticks: every_n_ticks.max(1),
            last_granted: None,
        }
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &IntersectionSnapshot) {
        if self.last_granted != Some(snapshot.granted) {
            log::info!(
                "Tick {}: {} approach green{}",
                snapshot.tick,
                snapshot.granted,
                if snapshot.preempted { " (emergency override)" } else { "" }
            );
            self.last_granted = Some(snapshot.granted);
        }
        if snapshot.tick % self.every_n_ticks == 0 {
            match serde_json::to_string(snapshot) {
                Ok(json) => log::debug!("{}", json),
                Err(e) => log::error!("Failed to serialize snapshot: {}", e),
            }
        }
    }
}
