/// Something that can play and stop a looping siren cue.
pub trait CueDriver {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Cue driver that only reports through the diagnostic log.
#[derive(Debug, Default)]
pub struct LogCue;

impl CueDriver for LogCue {
    fn start(&mut self) {
        log::info!("Siren on");
    }

    fn stop(&mut self) {
        log::info!("Siren off");
    }
}

/// Edge-triggered siren control: starts the cue when an emergency vehicle
/// appears and stops it when the last one leaves.
#[derive(Debug)]
pub struct SirenMonitor<D> {
    driver: D,
    playing: bool,
}

impl<D: CueDriver> SirenMonitor<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            playing: false,
        }
    }

    /// Feeds the current emergency presence. Calls into the driver only on a change.
    pub fn update(&mut self, emergency_present: bool) {
        match (self.playing, emergency_present) {
            (false, true) => {
                self.driver.start();
                self.playing = true;
            }
            (true, false) => {
                self.driver.stop();
                self.playing = false;
            }
            _ => {}
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: CueDriver + ?Sized> CueDriver for Box<D> {
    fn start(&mut self) {
        (**self).start();
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CountingCue {
        starts: usize,
        stops: usize,
    }

    impl CueDriver for CountingCue {
        fn start(&mut self) {
            self.starts += 1;
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn only_edges_reach_the_driver() {
        let mut siren = SirenMonitor::new(CountingCue::default());
        for present in [false, true, true, true, false, false, true, false] {
            siren.update(present);
        }
        assert_eq!(siren.driver().starts, 2);
        assert_eq!(siren.driver().stops, 2);
        assert!(!siren.is_playing());
    }

    #[test]
    fn playing_cue_is_not_restarted() {
        let mut siren = SirenMonitor::new(CountingCue::default());
        siren.update(true);
        siren.update(true);
        assert!(siren.is_playing());
        assert_eq!(siren.driver().starts, 1);
        assert_eq!(siren.driver().stops, 0);
    }
}
