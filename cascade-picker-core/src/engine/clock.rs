//! Generation stamps for reload chains

/// Orders reload steps so that a late completion from an older chain cannot
/// overwrite what a newer chain already decided.
///
/// Every step of a chain claims its origin column with a fresh generation.
/// A completion for column `target` is current only while no origin before
/// `target` has been claimed by a newer generation.
#[derive(Debug, Default)]
pub(crate) struct ReloadClock {
    generation: u64,
    /// Slot 0 is the whole-cascade origin, slot `c + 1` is column `c`.
    claims: Vec<u64>,
    destroyed: bool,
}

impl ReloadClock {
    /// Start loading the column after `origin`, returning the step's generation.
    pub fn claim(&mut self, origin: Option<usize>) -> u64 {
        self.generation += 1;
        let slot = origin.map_or(0, |column| column + 1);
        if self.claims.len() <= slot {
            self.claims.resize(slot + 1, 0);
        }
        self.claims[slot] = self.generation;
        self.generation
    }

    /// Whether a step of `generation` may still write `target`.
    pub fn is_current(&self, generation: u64, target: usize) -> bool {
        !self.destroyed
            && self
                .claims
                .iter()
                .take(target + 1)
                .all(|&claimed| claimed <= generation)
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_upstream_claim_makes_step_stale() {
        let mut clock = ReloadClock::default();
        let old = clock.claim(Some(0));
        let new = clock.claim(Some(0));
        assert!(!clock.is_current(old, 1));
        assert!(clock.is_current(new, 1));
    }

    #[test]
    fn downstream_claim_does_not_affect_upstream_step() {
        let mut clock = ReloadClock::default();
        let upstream = clock.claim(Some(0));
        let downstream = clock.claim(Some(1));
        assert!(clock.is_current(upstream, 1));
        assert!(!clock.is_current(upstream, 2));
        assert!(clock.is_current(downstream, 2));
    }

    #[test]
    fn whole_cascade_claim_supersedes_everything() {
        let mut clock = ReloadClock::default();
        let step = clock.claim(Some(3));
        clock.claim(None);
        assert!(!clock.is_current(step, 4));
    }

    #[test]
    fn destroyed_clock_accepts_nothing() {
        let mut clock = ReloadClock::default();
        let step = clock.claim(None);
        clock.destroy();
        assert!(clock.is_destroyed());
        assert!(!clock.is_current(step, 0));
    }
}
