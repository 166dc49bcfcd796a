//! Seedable simulation module
//!
//! All arena logic lives here. This module must stay pure:
//! - One step per call, no sleeping or timers
//! - Seeded RNG only, and only at spawn time
//! - Stable iteration order (population scan order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rules;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{WallHit, bounce_off_walls, reflect_velocity, tokens_touch};
pub use rules::{Clash, Rules};
pub use spawn::{spawn_population, spawn_token};
pub use state::{Arena, Kind, KindCounts, Simulation, StepReport, Token, TokenId};
pub use tick::step;

impl Simulation {
    /// Advance by one tick, see [`tick::step`]
    pub fn step(&mut self) -> StepReport {
        step(self)
    }
}
