//! Simulation state and core types
//!
//! Everything a run needs to be replayed lives here: arena extent, seed,
//! token population and the tick counter.

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rules::Rules;
use super::spawn::spawn_population;
use crate::consts::TOKEN_SIZE;
use crate::settings::ConfigError;

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Rock,
    Paper,
    Scissors,
}

impl Kind {
    /// Spawn order
    pub const ALL: [Kind; 3] = [Kind::Rock, Kind::Paper, Kind::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Rock => "rock",
            Kind::Paper => "paper",
            Kind::Scissors => "scissors",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Kind::Rock => 0,
            Kind::Paper => 1,
            Kind::Scissors => 2,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable token identity: the kind it spawned as plus its index within that kind.
///
/// Never changes when the token is converted, so `rock-3` may well be paper
/// by the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId {
    pub spawn_kind: Kind,
    pub index: u32,
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.spawn_kind, self.index)
    }
}

/// A token entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub kind: Kind,
    /// Top-left corner, kept inside `[0, width - size] x [0, height - size]`
    pub pos: Vec2,
    /// Displacement per tick (speed scale already applied)
    pub vel: Vec2,
    pub size: f32,
    /// Set when the token changed kind during the most recent step
    #[serde(default)]
    pub converted: bool,
}

impl Token {
    pub fn new(id: TokenId, kind: Kind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            size: TOKEN_SIZE,
            converted: false,
        }
    }
}

/// Live count per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl KindCounts {
    /// Same count for every kind
    pub fn uniform(n: u32) -> Self {
        Self {
            rock: n,
            paper: n,
            scissors: n,
        }
    }

    pub fn get(&self, kind: Kind) -> u32 {
        match kind {
            Kind::Rock => self.rock,
            Kind::Paper => self.paper,
            Kind::Scissors => self.scissors,
        }
    }

    pub fn get_mut(&mut self, kind: Kind) -> &mut u32 {
        match kind {
            Kind::Rock => &mut self.rock,
            Kind::Paper => &mut self.paper,
            Kind::Scissors => &mut self.scissors,
        }
    }

    /// Saturates at `u32::MAX`
    pub fn total(&self) -> u32 {
        self.rock.saturating_add(self.paper).saturating_add(self.scissors)
    }

    /// Kinds with at least one live token, in `Kind::ALL` order
    pub fn alive(&self) -> impl Iterator<Item = Kind> + '_ {
        Kind::ALL.into_iter().filter(move |&k| self.get(k) > 0)
    }

    /// Tally the current kinds of a population
    pub fn tally(tokens: &[Token]) -> Self {
        let mut counts = Self::default();
        for token in tokens {
            *counts.get_mut(token.kind) += 1;
        }
        counts
    }
}

/// Rectangular arena extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    /// Both sides must be finite and wider than a token
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(ConfigError::NonFinite("arena size"));
        }
        if width <= TOKEN_SIZE || height <= TOKEN_SIZE {
            return Err(ConfigError::ArenaTooSmall {
                width,
                height,
                min: TOKEN_SIZE,
            });
        }
        Ok(Self { width, height })
    }

    /// Largest top-left corner a token of `size` may occupy
    #[inline]
    pub fn max_corner(&self, size: f32) -> Vec2 {
        Vec2::new(self.width - size, self.height - size)
    }

    pub fn contains(&self, token: &Token) -> bool {
        let max = self.max_corner(token.size);
        token.pos.x >= 0.0 && token.pos.y >= 0.0 && token.pos.x <= max.x && token.pos.y <= max.y
    }
}

/// Result of one step, handed back to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub tick: u64,
    pub counts: KindCounts,
    /// Tokens that changed kind this step
    pub conversions: u32,
    pub ended: bool,
    pub winner: Option<Kind>,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    /// Run seed for reproducibility
    pub seed: u64,
    pub arena: Arena,
    /// Speed scale baked into current velocities
    pub speed_scale: f32,
    /// Swap velocities when two tokens of the same kind touch
    pub bounce_same_kind: bool,
    /// Dominance table
    pub rules: Rules,
    /// Steps taken so far
    pub tick: u64,
    /// Population in scan order
    pub(crate) tokens: Vec<Token>,
    pub(crate) counts: KindCounts,
    /// Population size fixed at creation
    pub(crate) population: u32,
    pub(crate) winner: Option<Kind>,
    pub(crate) ended: bool,
}

impl Simulation {
    /// Spawn a fresh population with the given per-kind counts
    pub fn populate(arena: Arena, spawn: KindCounts, speed_scale: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let tokens = spawn_population(&arena, spawn, speed_scale, &mut rng);
        log::info!(
            "Spawned {} tokens ({} rock, {} paper, {} scissors) in {}x{} arena, seed {}",
            tokens.len(),
            spawn.rock,
            spawn.paper,
            spawn.scissors,
            arena.width,
            arena.height,
            seed
        );
        Self::assemble(arena, tokens, speed_scale, seed)
    }

    /// Build a simulation around an explicit population (scripted scenarios, replays)
    pub fn from_tokens(arena: Arena, tokens: Vec<Token>) -> Self {
        Self::assemble(arena, tokens, 1.0, 0)
    }

    fn assemble(arena: Arena, tokens: Vec<Token>, speed_scale: f32, seed: u64) -> Self {
        let mut seen = HashSet::with_capacity(tokens.len());
        for token in &tokens {
            assert!(seen.insert(token.id), "duplicate token id {}", token.id);
            assert_eq!(token.size, TOKEN_SIZE, "token {} has a non-standard size", token.id);
        }

        let counts = KindCounts::tally(&tokens);
        Self {
            seed,
            arena,
            speed_scale,
            bounce_same_kind: false,
            rules: Rules::classic(),
            tick: 0,
            population: counts.total(),
            tokens,
            counts,
            winner: None,
            ended: false,
        }
    }

    pub fn with_same_kind_bounce(mut self, bounce: bool) -> Self {
        self.bounce_same_kind = bounce;
        self
    }

    /// Fisher-Yates shuffle of the scan order, drawn from the run seed
    pub fn shuffle_order(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.seed.wrapping_add(1));
        self.tokens.shuffle(&mut rng);
    }

    /// Read-only view of the population in scan order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn counts(&self) -> KindCounts {
        self.counts
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn winner(&self) -> Option<Kind> {
        self.winner
    }

    /// Change the speed scale mid-run by rescaling every velocity
    pub fn set_speed_scale(&mut self, speed_scale: f32) {
        if self.speed_scale <= 0.0 || speed_scale == self.speed_scale {
            return;
        }
        let factor = speed_scale / self.speed_scale;
        for token in &mut self.tokens {
            token.vel *= factor;
        }
        log::debug!("Speed scale {} -> {}", self.speed_scale, speed_scale);
        self.speed_scale = speed_scale;
    }

    /// Current report without advancing
    pub fn report(&self) -> StepReport {
        StepReport {
            tick: self.tick,
            counts: self.counts,
            conversions: 0,
            ended: self.ended,
            winner: self.winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_display() {
        let id = TokenId {
            spawn_kind: Kind::Scissors,
            index: 7,
        };
        assert_eq!(id.to_string(), "scissors-7");
    }

    #[test]
    fn test_counts_alive() {
        let counts = KindCounts {
            rock: 2,
            paper: 0,
            scissors: 1,
        };
        let alive: Vec<_> = counts.alive().collect();
        assert_eq!(alive, vec![Kind::Rock, Kind::Scissors]);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_counts_total_saturates() {
        let counts = KindCounts::uniform(2_000_000_000);
        assert_eq!(counts.total(), u32::MAX);
    }

    #[test]
    fn test_arena_rejects_tiny_and_nan() {
        assert!(Arena::new(TOKEN_SIZE, 200.0).is_err());
        assert!(Arena::new(f32::NAN, 200.0).is_err());
        assert!(Arena::new(200.0, 200.0).is_ok());
    }

    #[test]
    fn test_populate_is_reproducible() {
        let arena = Arena::new(400.0, 300.0).unwrap();
        let a = Simulation::populate(arena, KindCounts::uniform(5), 1.0, 42);
        let b = Simulation::populate(arena, KindCounts::uniform(5), 1.0, 42);
        assert_eq!(a.tokens(), b.tokens());
        assert_eq!(a.counts(), KindCounts::uniform(5));
    }

    #[test]
    #[should_panic(expected = "duplicate token id")]
    fn test_duplicate_ids_fail_fast() {
        let arena = Arena::new(200.0, 200.0).unwrap();
        let id = TokenId {
            spawn_kind: Kind::Rock,
            index: 0,
        };
        let tokens = vec![
            Token::new(id, Kind::Rock, Vec2::ZERO, Vec2::ZERO),
            Token::new(id, Kind::Paper, Vec2::new(100.0, 100.0), Vec2::ZERO),
        ];
        let _ = Simulation::from_tokens(arena, tokens);
    }

    #[test]
    #[should_panic(expected = "non-standard size")]
    fn test_mixed_token_sizes_fail_fast() {
        let arena = Arena::new(200.0, 200.0).unwrap();
        let mut big = Token::new(
            TokenId {
                spawn_kind: Kind::Paper,
                index: 0,
            },
            Kind::Paper,
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
        );
        big.size = 60.0;
        let small = Token::new(
            TokenId {
                spawn_kind: Kind::Rock,
                index: 0,
            },
            Kind::Rock,
            Vec2::ZERO,
            Vec2::ZERO,
        );
        let _ = Simulation::from_tokens(arena, vec![small, big]);
    }

    #[test]
    fn test_shuffle_keeps_population() {
        let arena = Arena::new(400.0, 300.0).unwrap();
        let mut sim = Simulation::populate(arena, KindCounts::uniform(10), 1.0, 8);
        let mut before: Vec<String> = sim.tokens().iter().map(|t| t.id.to_string()).collect();
        sim.shuffle_order();
        let mut after: Vec<String> = sim.tokens().iter().map(|t| t.id.to_string()).collect();
        assert_eq!(sim.counts(), KindCounts::uniform(10));

        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_speed_rescale_keeps_direction() {
        let arena = Arena::new(400.0, 300.0).unwrap();
        let mut sim = Simulation::populate(arena, KindCounts::uniform(3), 1.0, 7);
        let before: Vec<Vec2> = sim.tokens().iter().map(|t| t.vel).collect();
        sim.set_speed_scale(2.5);
        for (old, token) in before.iter().zip(sim.tokens()) {
            assert!((token.vel - *old * 2.5).length() < 1e-5);
        }
        assert_eq!(sim.speed_scale, 2.5);
    }
}
