/// Backends rarely report granular progress, so the client animates its own
/// percentage toward an asymptote and counts an ETA down toward a floor.
/// Authoritative server progress, when it shows up, only tightens the ETA:
/// moving the displayed percentage to match the server would make the bar
/// jump around, and the simulation must never be the thing that claims
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSim {
    progress: u8,
    eta: u64,
}

/// Starting percentage right after task creation
pub const BASELINE: u8 = 5;
/// The simulation saturates here; only a real completed poll reaches 100
pub const CAP: u8 = 95;
pub const ETA_START: u64 = 60;
pub const ETA_FLOOR: u64 = 5;

impl ProgressSim {
    pub fn new() -> Self {
        Self {
            progress: BASELINE,
            eta: ETA_START,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn eta(&self) -> u64 {
        self.eta
    }

    /// One second of simulated advancement
    pub fn tick(&mut self) {
        if self.progress < CAP {
            self.progress += 1;
        }
        if self.eta > ETA_FLOOR {
            self.eta -= 1;
        }
    }

    /// Fold in a server-reported percentage. The displayed percentage is
    /// left alone; the ETA is re-estimated from the remaining fraction and
    /// only ever ratchets down.
    pub fn merge_server_progress(&mut self, server: u8) {
        let server = server.min(100) as u64;
        let estimate = ((100 - server) * ETA_START / 100).max(ETA_FLOOR);
        self.eta = self.eta.min(estimate);
    }
}

impl Default for ProgressSim {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_monotonic_and_capped() {
        let mut sim = ProgressSim::new();
        let mut last = sim.progress();
        for _ in 0..200 {
            sim.tick();
            assert!(sim.progress() >= last);
            assert!(sim.progress() < 100);
            last = sim.progress();
        }
        assert_eq!(sim.progress(), CAP);
    }

    #[test]
    fn test_eta_monotonic_with_floor() {
        let mut sim = ProgressSim::new();
        let mut last = sim.eta();
        for _ in 0..200 {
            sim.tick();
            assert!(sim.eta() <= last);
            assert!(sim.eta() >= ETA_FLOOR);
            last = sim.eta();
        }
        assert_eq!(sim.eta(), ETA_FLOOR);
    }

    #[test]
    fn test_server_progress_tightens_eta_only() {
        let mut sim = ProgressSim::new();
        let before = sim.progress();
        sim.merge_server_progress(80);
        assert_eq!(sim.progress(), before);
        assert_eq!(sim.eta(), 12);

        // A lower server figure later must not raise the ETA back up
        sim.merge_server_progress(10);
        assert_eq!(sim.eta(), 12);

        sim.merge_server_progress(100);
        assert_eq!(sim.eta(), ETA_FLOOR);
    }
}
