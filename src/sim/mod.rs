/// Simulation: the session state machine and its per-tick step.

pub mod clock;
pub mod event;
pub mod session;
pub mod settings;
