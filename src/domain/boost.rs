/// Boost power-up: a timed two-phase lifecycle.
///
/// Phases:
///   1. **Appearing**: visible and collectible for `appear_duration` ms
///      (randomized per spawn). Expires back to inert if not collected.
///   2. **Active**: collected; doubles food gains and flashes the snake for
///      a fixed `duration` ms.
///
/// `Inert -> Appearing -> Active -> Inert`, or `Appearing -> Inert` on timeout.
/// Timestamps are passed in by the caller; nothing here reads a clock.

use rand::Rng;

use crate::config::TimingConfig;
use super::grid::{Grid, Pos};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoostPhase {
    Inert,
    Appearing,
    Active,
}

/// A phase change reported by `update`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoostChange {
    /// Appear window closed without being collected.
    Expired,
    /// Active window ran out.
    Ended,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Boost {
    pub position: Pos,

    pub appear: bool,
    pub appear_time: u64,
    pub appear_duration: u64,

    pub active: bool,
    pub time: u64,
    pub duration: u64,
}

impl Boost {
    pub fn new() -> Self {
        Boost::default()
    }

    pub fn phase(&self) -> BoostPhase {
        if self.active {
            BoostPhase::Active
        } else if self.appear {
            BoostPhase::Appearing
        } else {
            BoostPhase::Inert
        }
    }

    pub fn is_inert(&self) -> bool {
        !self.appear && !self.active
    }

    /// Inert -> Appearing at a random cell. Position is drawn before the
    /// appear duration.
    pub fn spawn<R: Rng + ?Sized>(&mut self, now: u64, grid: &Grid, timing: &TimingConfig, rng: &mut R) {
        self.position = grid.random_cell(rng);
        self.appear = true;
        self.appear_time = now;
        self.appear_duration = rng.gen_range(timing.boost_appear_min_ms..=timing.boost_appear_max_ms);
    }

    /// Expire whichever phase has run past its window. A window is exceeded
    /// only when strictly more than its duration has elapsed.
    pub fn update(&mut self, now: u64) -> Option<BoostChange> {
        let mut change = None;

        if self.appear && now.saturating_sub(self.appear_time) > self.appear_duration {
            self.appear = false;
            change = Some(BoostChange::Expired);
        }

        if self.active && now.saturating_sub(self.time) > self.duration {
            self.active = false;
            change = Some(BoostChange::Ended);
        }

        change
    }

    /// Appearing -> Active.
    pub fn enable(&mut self, now: u64, timing: &TimingConfig) {
        self.appear = false;

        self.active = true;
        self.time = now;
        self.duration = timing.boost_active_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawned_at(now: u64) -> (Boost, TimingConfig) {
        let timing = TimingConfig::default();
        let mut b = Boost::new();
        b.spawn(now, &Grid::default(), &timing, &mut StdRng::seed_from_u64(1));
        (b, timing)
    }

    #[test]
    fn starts_inert() {
        let b = Boost::new();
        assert!(b.is_inert());
        assert_eq!(b.phase(), BoostPhase::Inert);
    }

    #[test]
    fn spawn_enters_appear_phase() {
        let (b, timing) = spawned_at(1_000);
        assert_eq!(b.phase(), BoostPhase::Appearing);
        assert_eq!(b.appear_time, 1_000);
        assert!(b.appear_duration >= timing.boost_appear_min_ms);
        assert!(b.appear_duration <= timing.boost_appear_max_ms);
        assert!(Grid::default().contains(b.position));
    }

    #[test]
    fn appear_durations_cover_range() {
        let timing = TimingConfig::default();
        let grid = Grid::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut b = Boost::new();
        let (mut lo, mut hi) = (u64::MAX, 0);
        for _ in 0..2_000 {
            b.spawn(0, &grid, &timing, &mut rng);
            lo = lo.min(b.appear_duration);
            hi = hi.max(b.appear_duration);
        }
        assert!(lo >= 3_000 && lo < 3_500, "lo={lo}");
        assert!(hi <= 10_000 && hi > 9_500, "hi={hi}");
    }

    #[test]
    fn uncollected_boost_expires_after_appear_duration() {
        let (mut b, _) = spawned_at(1_000);
        let deadline = 1_000 + b.appear_duration;
        assert_eq!(b.update(deadline), None);
        assert!(b.appear);
        assert_eq!(b.update(deadline + 1), Some(BoostChange::Expired));
        assert!(b.is_inert());
    }

    #[test]
    fn enable_switches_to_active() {
        let (mut b, timing) = spawned_at(0);
        b.enable(2_000, &timing);
        assert!(!b.appear);
        assert!(b.active);
        assert_eq!(b.time, 2_000);
        assert_eq!(b.duration, 3_000);
        assert_eq!(b.phase(), BoostPhase::Active);
    }

    #[test]
    fn active_boost_ends_after_fixed_duration() {
        let (mut b, timing) = spawned_at(0);
        b.enable(2_000, &timing);
        assert_eq!(b.update(4_999), None);
        assert_eq!(b.update(5_000), None);
        assert!(b.active);
        assert_eq!(b.update(5_001), Some(BoostChange::Ended));
        assert!(b.is_inert());
    }

    #[test]
    fn clock_going_backwards_does_not_expire() {
        let (mut b, _) = spawned_at(10_000);
        assert_eq!(b.update(0), None);
        assert!(b.appear);
    }
}
