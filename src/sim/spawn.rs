//! Initial population
//!
//! Uniform random placement and heading per token; speed magnitude is drawn
//! once here and never re-scaled per tick.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Arena, Kind, KindCounts, Token, TokenId};
use crate::consts::{SPAWN_SPEED_MAX, SPAWN_SPEED_MIN, TOKEN_SIZE};
use crate::heading_to_unit;

/// Spawn `counts.get(kind)` tokens of every kind, grouped by kind in `Kind::ALL` order
pub fn spawn_population<R: Rng>(
    arena: &Arena,
    counts: KindCounts,
    speed_scale: f32,
    rng: &mut R,
) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(counts.total() as usize);
    for kind in Kind::ALL {
        for index in 0..counts.get(kind) {
            tokens.push(spawn_token(kind, index, arena, speed_scale, rng));
        }
    }
    tokens
}

/// Spawn one token of `kind` at a random spot with a random heading
pub fn spawn_token<R: Rng>(
    kind: Kind,
    index: u32,
    arena: &Arena,
    speed_scale: f32,
    rng: &mut R,
) -> Token {
    let max = arena.max_corner(TOKEN_SIZE);
    let pos = Vec2::new(rng.random_range(0.0..max.x), rng.random_range(0.0..max.y));

    let angle = rng.random_range(0.0..TAU);
    let speed = rng.random_range(SPAWN_SPEED_MIN..SPAWN_SPEED_MAX) * speed_scale;

    Token::new(
        TokenId {
            spawn_kind: kind,
            index,
        },
        kind,
        pos,
        heading_to_unit(angle) * speed,
    )
}
