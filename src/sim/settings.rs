/// Round settings: the three values the settings panel edits.
///
/// Out-of-range values are clamped, never rejected.

use std::ops::RangeInclusive;

pub const FOOD_COUNT_RANGE: RangeInclusive<u32> = 1..=100;
pub const BOOST_COUNT_RANGE: RangeInclusive<u32> = 1..=10;
pub const SPAWN_PROBABILITY_RANGE: RangeInclusive<u32> = 1..=100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub food_count: u32,
    pub boost_count: u32,
    /// Percent chance, per tick, that an inert boost spawns.
    pub boost_spawn_probability: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            food_count: *FOOD_COUNT_RANGE.start(),
            boost_count: *BOOST_COUNT_RANGE.start(),
            boost_spawn_probability: *SPAWN_PROBABILITY_RANGE.start(),
        }
    }
}

#[inline]
fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

impl Settings {
    pub fn clamped(food_count: u32, boost_count: u32, boost_spawn_probability: u32) -> Self {
        Settings {
            food_count: clamp_to(food_count, &FOOD_COUNT_RANGE),
            boost_count: clamp_to(boost_count, &BOOST_COUNT_RANGE),
            boost_spawn_probability: clamp_to(boost_spawn_probability, &SPAWN_PROBABILITY_RANGE),
        }
    }

    /// Re-apply the ranges (after direct field edits).
    pub fn normalized(self) -> Self {
        Self::clamped(self.food_count, self.boost_count, self.boost_spawn_probability)
    }

    pub fn set_food_count(&mut self, value: u32) {
        self.food_count = clamp_to(value, &FOOD_COUNT_RANGE);
    }

    pub fn set_boost_count(&mut self, value: u32) {
        self.boost_count = clamp_to(value, &BOOST_COUNT_RANGE);
    }

    pub fn set_boost_spawn_probability(&mut self, value: u32) {
        self.boost_spawn_probability = clamp_to(value, &SPAWN_PROBABILITY_RANGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_range_minimums() {
        let s = Settings::default();
        assert_eq!(s, Settings { food_count: 1, boost_count: 1, boost_spawn_probability: 1 });
    }

    #[test]
    fn setters_clamp() {
        let mut s = Settings::default();
        s.set_food_count(0);
        assert_eq!(s.food_count, 1);
        s.set_food_count(250);
        assert_eq!(s.food_count, 100);
        s.set_boost_count(11);
        assert_eq!(s.boost_count, 10);
        s.set_boost_spawn_probability(0);
        assert_eq!(s.boost_spawn_probability, 1);
        s.set_boost_spawn_probability(55);
        assert_eq!(s.boost_spawn_probability, 55);
    }

    #[test]
    fn normalized_repairs_direct_edits() {
        let s = Settings { food_count: 0, boost_count: 99, boost_spawn_probability: 100 };
        assert_eq!(s.normalized(), Settings { food_count: 1, boost_count: 10, boost_spawn_probability: 100 });
    }
}
