/// Settings panel: keyboard/gamepad stand-in for the three value sliders.
///
/// Holds only the cursor; the values themselves live in the session's
/// pending `Settings`, so clamping stays in one place.

use std::ops::RangeInclusive;

use boostsnake::sim::settings::{BOOST_COUNT_RANGE, FOOD_COUNT_RANGE, SPAWN_PROBABILITY_RANGE};
use boostsnake::{GameSession, Settings};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Slider {
    FoodCount,
    BoostCount,
    SpawnProbability,
}

impl Slider {
    pub const ALL: [Slider; 3] = [Slider::FoodCount, Slider::BoostCount, Slider::SpawnProbability];

    pub fn label(self) -> &'static str {
        match self {
            Slider::FoodCount => "Number of Foods",
            Slider::BoostCount => "Number of Boosts",
            Slider::SpawnProbability => "Boost Appear Probability",
        }
    }

    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            Slider::FoodCount => FOOD_COUNT_RANGE,
            Slider::BoostCount => BOOST_COUNT_RANGE,
            Slider::SpawnProbability => SPAWN_PROBABILITY_RANGE,
        }
    }

    pub fn value(self, s: &Settings) -> u32 {
        match self {
            Slider::FoodCount => s.food_count,
            Slider::BoostCount => s.boost_count,
            Slider::SpawnProbability => s.boost_spawn_probability,
        }
    }

    fn set(self, s: &mut Settings, v: u32) {
        match self {
            Slider::FoodCount => s.set_food_count(v),
            Slider::BoostCount => s.set_boost_count(v),
            Slider::SpawnProbability => s.set_boost_spawn_probability(v),
        }
    }

    /// Handle position in `0.0..=1.0` for drawing.
    pub fn fraction(self, s: &Settings) -> f32 {
        let r = self.range();
        let span = (r.end() - r.start()).max(1) as f32;
        (self.value(s) - r.start()) as f32 / span
    }
}

pub struct SliderPanel {
    cursor: usize,
}

impl SliderPanel {
    pub fn new() -> Self {
        SliderPanel { cursor: 0 }
    }

    pub fn selected(&self) -> Slider {
        Slider::ALL[self.cursor]
    }

    pub fn next(&mut self) {
        self.cursor = (self.cursor + 1) % Slider::ALL.len();
    }

    pub fn prev(&mut self) {
        self.cursor = (self.cursor + Slider::ALL.len() - 1) % Slider::ALL.len();
    }

    /// Nudge the selected value. Returns false if the session refused
    /// (a round is in progress).
    pub fn adjust(&self, session: &mut GameSession, delta: i32) -> bool {
        let mut settings = session.settings();
        let slider = self.selected();
        let current = slider.value(&settings) as i64;
        let target = (current + delta as i64).max(0) as u32;
        slider.set(&mut settings, target);
        session.configure(settings)
    }
}
