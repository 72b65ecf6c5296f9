use crate::communication::messages::PreemptionSignal;
use crate::communication::preemption_channel::PreemptionPublisher;
use crate::detection::sensor::EmergencySensor;
use tokio::sync::oneshot;
use tokio::task::{self, JoinError, JoinHandle};
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Handle to a running detector task.
pub struct DetectorHandle {
    shutdown: oneshot::Sender<()>,
    join: JoinHandle<u64>,
}

impl DetectorHandle {
    /// Signals the detector to stop and waits for it. Returns the number of
    /// frames it processed.
    pub async fn shutdown(self) -> Result<u64, JoinError> {
        // The task may already be gone; joining still reports how it ended.
        let _ = self.shutdown.send(());
        self.join.await
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Spawns the detector loop: one sensor frame every `frame_period`, each
/// reading published into the preemption slot.
///
/// Sensor reads may block, so every `poll` runs on the blocking pool and the
/// async workers stay free for the tick loop.
pub fn spawn_detector<S: EmergencySensor>(
    sensor: S,
    publisher: PreemptionPublisher,
    frame_period: Duration,
) -> DetectorHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(run_detector(sensor, publisher, frame_period, shutdown_rx));
    DetectorHandle {
        shutdown: shutdown_tx,
        join,
    }
}

async fn run_detector<S: EmergencySensor>(
    mut sensor: S,
    publisher: PreemptionPublisher,
    frame_period: Duration,
    mut shutdown: oneshot::Receiver<()>,
) -> u64 {
    let mut ticker = interval(frame_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames = 0u64;
    log::info!("Emergency detector started");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let read = task::spawn_blocking(move || {
            let reading = sensor.poll();
            (sensor, reading)
        });
        // An in-flight read is abandoned on shutdown and finishes on its own.
        let reading = tokio::select! {
            _ = &mut shutdown => break,
            joined = read => match joined {
                Ok((returned, reading)) => {
                    sensor = returned;
                    reading
                }
                Err(e) => {
                    log::error!("Emergency sensor failed: {}", e);
                    break;
                }
            },
        };

        let signal = match reading {
            Some(approach) => PreemptionSignal::Emergency { approach },
            None => PreemptionSignal::Cleared,
        };
        if publisher.publish(signal) {
            log::debug!("Detector frame {}: {:?}", frames, signal);
        }
        frames += 1;
    }

    log::info!("Emergency detector stopped after {} frames", frames);
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::preemption_channel::preemption_channel;
    use crate::detection::sensor::ScriptedSensor;

    #[tokio::test(start_paused = true)]
    async fn publishes_sensor_readings() {
        let (publisher, mut receiver) = preemption_channel();
        let sensor = ScriptedSensor::new([Some(3), Some(3), None]);
        let detector = spawn_detector(sensor, publisher, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(receiver.try_recv(), Some(PreemptionSignal::emergency(3u8)));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(receiver.try_recv(), Some(PreemptionSignal::Cleared));

        let frames = detector.shutdown().await.unwrap();
        assert!(frames >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_joins_promptly() {
        let (publisher, _receiver) = preemption_channel();
        let detector = spawn_detector(ScriptedSensor::default(), publisher, Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!detector.is_finished());
        assert_eq!(detector.shutdown().await.unwrap(), 1);
    }

    struct PanickingSensor;

    impl EmergencySensor for PanickingSensor {
        fn poll(&mut self) -> Option<u8> {
            panic!("camera unplugged");
        }
    }

    #[tokio::test]
    async fn failing_sensor_stops_detector_cleanly() {
        let (publisher, mut receiver) = preemption_channel();
        let detector = spawn_detector(PanickingSensor, publisher, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(detector.is_finished());
        assert_eq!(detector.shutdown().await.unwrap(), 0);
        assert_eq!(receiver.try_recv(), None);
    }
}
