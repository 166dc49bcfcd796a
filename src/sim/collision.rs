//! Collision detection and response
//!
//! Two kinds of contact: a token against the arena walls (reflect and clamp),
//! and a token against another token (circular proximity on equal sizes).

use glam::Vec2;

use super::state::Arena;
use crate::clamp_to_box;

/// Which walls a token touched during one move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    /// Crossed the left or right wall
    pub x: bool,
    /// Crossed the top or bottom wall
    pub y: bool,
}

impl WallHit {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Keep a token of `size` inside the arena.
///
/// Each axis is handled on its own. When the leading edge has crossed `0` or
/// the trailing edge has crossed the arena extent, the velocity component is
/// reflected off that wall and the position is clamped back inside, so the
/// token is contained at the end of every tick.
pub fn bounce_off_walls(pos: &mut Vec2, vel: &mut Vec2, size: f32, arena: &Arena) -> WallHit {
    let max = arena.max_corner(size);
    let mut hit = WallHit::default();

    if pos.x < 0.0 {
        *vel = reflect_into(*vel, Vec2::X);
        hit.x = true;
    } else if pos.x > max.x {
        *vel = reflect_into(*vel, Vec2::NEG_X);
        hit.x = true;
    }

    if pos.y < 0.0 {
        *vel = reflect_into(*vel, Vec2::Y);
        hit.y = true;
    } else if pos.y > max.y {
        *vel = reflect_into(*vel, Vec2::NEG_Y);
        hit.y = true;
    }

    if hit.any() {
        *pos = clamp_to_box(*pos, max);
    }
    hit
}

/// Reflect only when moving into the wall whose inward normal is `normal`
#[inline]
fn reflect_into(vel: Vec2, normal: Vec2) -> Vec2 {
    if vel.dot(normal) < 0.0 {
        reflect_velocity(vel, normal)
    } else {
        vel
    }
}

/// Two tokens of equal `size` touch when their distance is strictly below `size`
#[inline]
pub fn tokens_touch(a: Vec2, b: Vec2, size: f32) -> bool {
    a.distance_squared(b) < size * size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(200.0, 100.0).unwrap()
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits a wall whose normal points left
        let reflected = reflect_velocity(Vec2::new(3.0, 1.0), Vec2::NEG_X);
        assert!((reflected - Vec2::new(-3.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_right_wall_reflects_and_clamps() {
        let mut pos = Vec2::new(172.5, 50.0);
        let mut vel = Vec2::new(2.0, 0.5);
        let hit = bounce_off_walls(&mut pos, &mut vel, 30.0, &arena());

        assert_eq!(hit, WallHit { x: true, y: false });
        assert_eq!(vel, Vec2::new(-2.0, 0.5));
        assert_eq!(pos, Vec2::new(170.0, 50.0));
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let mut pos = Vec2::new(-1.0, -0.5);
        let mut vel = Vec2::new(-1.0, -1.0);
        let hit = bounce_off_walls(&mut pos, &mut vel, 30.0, &arena());

        assert_eq!(hit, WallHit { x: true, y: true });
        assert_eq!(vel, Vec2::new(1.0, 1.0));
        assert_eq!(pos, Vec2::ZERO);
    }

    #[test]
    fn test_touching_edge_is_not_a_crossing() {
        let mut pos = Vec2::new(170.0, 70.0);
        let mut vel = Vec2::new(1.0, 1.0);
        let hit = bounce_off_walls(&mut pos, &mut vel, 30.0, &arena());

        assert!(!hit.any());
        assert_eq!(vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_no_double_flip_when_already_leaving() {
        let mut pos = Vec2::new(-0.5, 10.0);
        let mut vel = Vec2::new(0.7, 0.0);
        bounce_off_walls(&mut pos, &mut vel, 30.0, &arena());
        assert_eq!(vel, Vec2::new(0.7, 0.0));
        assert_eq!(pos.x, 0.0);
    }

    #[test]
    fn test_tokens_touch_is_strict() {
        assert!(tokens_touch(Vec2::ZERO, Vec2::new(29.9, 0.0), 30.0));
        assert!(!tokens_touch(Vec2::ZERO, Vec2::new(30.0, 0.0), 30.0));
        assert!(!tokens_touch(Vec2::ZERO, Vec2::new(25.0, 25.0), 30.0));
        assert!(tokens_touch(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 30.0));
    }
}
