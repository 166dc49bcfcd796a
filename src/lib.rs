//! Rock Paper Scissors Arena - tokens that convert each other until one kind remains
//!
//! Core modules:
//! - `sim`: Seedable simulation engine (spawning, kinematics, collisions, conversion)
//! - `session`: Host lifecycle (layout readiness, warm-up, frame driving, dispose)
//! - `timers`: Cancellable deadline timers driven by host timestamps
//! - `platform`: Browser/native surface size probing
//! - `settings`: Host-facing configuration and input clamping
//! - `web`: wasm-bindgen surface for the browser host (wasm32 only)

pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timers;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::{Phase, Readiness, RunOutcome, Session};
pub use settings::{ArenaConfig, ConfigError};
pub use sim::{Kind, KindCounts, Simulation, StepReport, Token, TokenId};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Side length of every token (used for walls and token proximity)
    pub const TOKEN_SIZE: f32 = 30.0;

    /// Surface must report at least this many units on both axes before spawning
    pub const MIN_SURFACE_EXTENT: f32 = 100.0;
    /// Interval between layout polls while the surface is unsized (ms)
    pub const LAYOUT_POLL_INTERVAL_MS: f64 = 50.0;
    /// Pause between spawning and the first step (ms)
    pub const WARM_UP_MS: f64 = 1500.0;
    /// Period of the elapsed-seconds counter (ms)
    pub const ELAPSED_TICK_MS: f64 = 1000.0;

    /// Spawn speed is uniform in [MIN, MAX) times the speed scale
    pub const SPAWN_SPEED_MIN: f32 = 0.3;
    pub const SPAWN_SPEED_MAX: f32 = 0.8;

    /// Host defaults
    pub const DEFAULT_PER_TYPE_COUNT: u32 = 50;
    pub const DEFAULT_SPEED_SCALE: f32 = 1.0;
    /// Upper bound on tokens per kind; the contact scan is quadratic
    pub const MAX_PER_TYPE_COUNT: u32 = 1000;
    /// Speed scale range accepted from the host (matches the speed slider)
    pub const MIN_SPEED_SCALE: f32 = 0.1;
    pub const MAX_SPEED_SCALE: f32 = 5.0;
}

/// Unit vector for a heading in radians
#[inline]
pub fn heading_to_unit(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Clamp a point into the box `[0, max.x] x [0, max.y]`
#[inline]
pub fn clamp_to_box(pos: Vec2, max: Vec2) -> Vec2 {
    pos.clamp(Vec2::ZERO, max)
}
