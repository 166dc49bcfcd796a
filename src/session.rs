//! Run lifecycle as seen by the host
//!
//! The host calls [`Session::initialize`] once, then [`Session::frame`] from
//! every animation frame with the frame timestamp, and [`Session::dispose`]
//! when the arena goes away. Waiting is done with deadline timers owned by
//! the session:
//!
//! - layout poll every 50 ms until the surface is at least 100 units on both
//!   sides (no retry cap: a surface that never lays out keeps polling)
//! - 1.5 s warm-up between spawning and the first step
//! - a 1 Hz elapsed-seconds counter while the run is moving

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::SurfaceProbe;
use crate::settings::{ArenaConfig, ConfigError};
use crate::sim::{Arena, Kind, Simulation, StepReport};
use crate::timers::{TimerId, Timers};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Created, `initialize` not called yet
    Idle,
    /// Polling for a laid-out surface
    AwaitingLayout,
    /// Population visible but static
    WarmingUp,
    /// One step per frame
    Running,
    /// Single kind left (or nothing to simulate)
    Finished,
    /// Torn down, all timers cancelled
    Disposed,
}

/// Whether the population exists yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    Ready,
}

/// Final result of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub winner: Option<Kind>,
    pub ticks: u64,
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTimer {
    LayoutPoll,
    WarmUp,
    ElapsedSecond,
}

/// One arena run from layout wait to winner
#[derive(Debug)]
pub struct Session {
    config: ArenaConfig,
    phase: Phase,
    sim: Option<Simulation>,
    timers: Timers<SessionTimer>,
    elapsed_timer: Option<TimerId>,
    elapsed_secs: u64,
    layout_polls: u32,
    outcome: Option<RunOutcome>,
}

impl Session {
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.sanitized()?,
            phase: Phase::Idle,
            sim: None,
            timers: Timers::new(),
            elapsed_timer: None,
            elapsed_secs: 0,
            layout_polls: 0,
            outcome: None,
        })
    }

    /// Probe the surface now; start polling if it is not laid out yet
    pub fn initialize(&mut self, surface: &impl SurfaceProbe, now: f64) -> Readiness {
        if self.phase != Phase::Idle {
            log::debug!("initialize called again in {:?}", self.phase);
            return self.readiness();
        }
        self.phase = Phase::AwaitingLayout;
        self.try_populate(surface, now)
    }

    /// Drive timers and, while running, advance exactly one step
    pub fn frame(&mut self, surface: &impl SurfaceProbe, now: f64) -> Option<StepReport> {
        if matches!(self.phase, Phase::Idle | Phase::Disposed) {
            return None;
        }

        for (_, timer) in self.timers.fire_due(now) {
            match timer {
                SessionTimer::LayoutPoll => {
                    if self.phase == Phase::AwaitingLayout {
                        self.try_populate(surface, now);
                    }
                }
                SessionTimer::WarmUp => {
                    if self.phase == Phase::WarmingUp {
                        self.phase = Phase::Running;
                        self.elapsed_timer = Some(self.timers.schedule_repeating(
                            SessionTimer::ElapsedSecond,
                            now,
                            ELAPSED_TICK_MS,
                        ));
                        log::info!("Warm-up over, run started");
                    }
                }
                SessionTimer::ElapsedSecond => {
                    if self.phase == Phase::Running {
                        self.elapsed_secs += 1;
                    }
                }
            }
        }

        self.step()
    }

    /// Advance one step if the run is moving
    pub fn step(&mut self) -> Option<StepReport> {
        if self.phase != Phase::Running {
            return None;
        }
        let sim = self.sim.as_mut()?;
        let report = sim.step();
        if report.ended {
            self.finish(&report);
        }
        Some(report)
    }

    /// Cancel every pending timer and stop responding to frames
    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        let cancelled = self.timers.cancel_all();
        self.elapsed_timer = None;
        log::info!("Session disposed in {:?}, {} timer(s) cancelled", self.phase, cancelled);
        self.phase = Phase::Disposed;
    }

    /// Change speed mid-run; the value is clamped like any host input
    pub fn set_speed_scale(&mut self, speed_scale: f32) -> Result<(), ConfigError> {
        let config = ArenaConfig {
            speed_scale,
            ..self.config.clone()
        }
        .sanitized()?;
        self.config.speed_scale = config.speed_scale;
        if let Some(sim) = self.sim.as_mut() {
            sim.set_speed_scale(config.speed_scale);
        }
        Ok(())
    }

    fn try_populate(&mut self, surface: &impl SurfaceProbe, now: f64) -> Readiness {
        self.layout_polls += 1;

        let arena = match surface.size() {
            Some((w, h)) if surface.is_laid_out() => Arena::new(w, h),
            size => {
                log::debug!("Surface not laid out ({:?}), poll #{}", size, self.layout_polls);
                self.timers
                    .schedule(SessionTimer::LayoutPoll, now, LAYOUT_POLL_INTERVAL_MS);
                return Readiness::Pending;
            }
        };
        let arena = match arena {
            Ok(arena) => arena,
            Err(err) => {
                log::error!("Unusable surface: {}", err);
                self.timers
                    .schedule(SessionTimer::LayoutPoll, now, LAYOUT_POLL_INTERVAL_MS);
                return Readiness::Pending;
            }
        };

        let seed = self.config.resolve_seed();
        let mut sim = Simulation::populate(
            arena,
            self.config.spawn_counts(),
            self.config.speed_scale,
            seed,
        )
        .with_same_kind_bounce(self.config.bounce_same_kind);
        if self.config.shuffle_spawn_order {
            sim.shuffle_order();
        }

        self.sim = Some(sim);
        self.phase = Phase::WarmingUp;
        self.timers.schedule(SessionTimer::WarmUp, now, WARM_UP_MS);
        log::info!("Arena ready after {} probe(s), warming up", self.layout_polls);
        Readiness::Ready
    }

    fn finish(&mut self, report: &StepReport) {
        if let Some(id) = self.elapsed_timer.take() {
            self.timers.cancel(id);
        }
        self.phase = Phase::Finished;
        let outcome = RunOutcome {
            winner: report.winner,
            ticks: report.tick,
            elapsed_secs: self.elapsed_secs,
        };
        log::info!(
            "Finished: winner {:?} after {} ticks, {}s",
            outcome.winner,
            outcome.ticks,
            outcome.elapsed_secs
        );
        self.outcome = Some(outcome);
    }

    pub fn readiness(&self) -> Readiness {
        if self.sim.is_some() {
            Readiness::Ready
        } else {
            Readiness::Pending
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Population and counts, read-only between steps
    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn layout_polls(&self) -> u32 {
        self.layout_polls
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
