/// Events emitted during a simulation step.
/// The front-end consumes these for logging and HUD messages.

use crate::domain::grid::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrashKind {
    Wall,
    SelfBite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted { food_count: u32, boost_count: u32, boost_spawn_probability: u32 },
    FoodEaten { at: Pos, gain: u32 },
    BoostSpawned { index: usize, at: Pos },
    BoostExpired { index: usize },
    BoostCollected { index: usize, at: Pos },
    BoostEnded { index: usize },
    SnakeCrashed { kind: CrashKind, at: Pos, score: u32 },
    QuitRequested,
}
