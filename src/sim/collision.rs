//! Overlap tests and push-out for the scene's simple bodies
//!
//! Everything is a circle (player, collectibles, projectiles, monster)
//! except store obstacles, which are axis-aligned boxes.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at contact (pointing toward the moving body)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// True if two circles overlap (touching counts)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

/// Circle `pos`/`radius` against a static circle
pub fn circle_circle_collision(pos: Vec2, radius: f32, other: Vec2, other_radius: f32) -> CollisionResult {
    let delta = pos - other;
    let dist = delta.length();
    let overlap = radius + other_radius - dist;
    if overlap <= 0.0 {
        return CollisionResult::miss();
    }
    // Concentric: push straight down, any axis works
    let normal = if dist > 0.001 { delta / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        normal,
        penetration: overlap,
    }
}

/// Circle against an axis-aligned box given by centre and half-extents
pub fn circle_box_collision(pos: Vec2, radius: f32, center: Vec2, half: Vec2) -> CollisionResult {
    let local = pos - center;
    let closest = local.clamp(-half, half);
    let delta = local - closest;
    let dist = delta.length();

    if dist > 0.001 {
        let overlap = radius - dist;
        if overlap <= 0.0 {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            normal: delta / dist,
            penetration: overlap,
        };
    }

    // Centre inside the box: leave through the nearest face
    let to_x = half.x - local.x.abs();
    let to_y = half.y - local.y.abs();
    if to_x < to_y {
        CollisionResult {
            hit: true,
            normal: Vec2::new(local.x.signum(), 0.0),
            penetration: to_x + radius,
        }
    } else {
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, if local.y < 0.0 { -1.0 } else { 1.0 }),
            penetration: to_y + radius,
        }
    }
}

/// Move a body out of a collision along the contact normal
#[inline]
pub fn push_out(pos: Vec2, result: &CollisionResult) -> Vec2 {
    if result.hit {
        pos + result.normal * result.penetration
    } else {
        pos
    }
}
