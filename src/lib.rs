//! Mall Crawl - a mall hub arcade scene
//!
//! Core modules:
//! - `sim`: Deterministic scene logic (rooms, collectibles, encounter)
//! - `config`: Store/room layout, loadable from JSON
//! - `assets`: Asset manifest and placeholder descriptions
//! - `platform`: Engine capability trait and a headless adapter
//! - `scene`: Host lifecycle (`preload` / `create` / `update`)

pub mod assets;
pub mod config;
pub mod error;
pub mod platform;
pub mod scene;
pub mod sim;

pub use config::SceneConfig;
pub use error::SceneError;
pub use scene::MallScene;

use glam::Vec2;

/// Scene tuning constants
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Largest frame delta fed to movement (ms), guards against tab-switch jumps
    pub const MAX_FRAME_DELTA_MS: u64 = 100;

    /// Player movement speed (pixels/s)
    pub const PLAYER_SPEED: f32 = 200.0;
    /// Player body radius
    pub const PLAYER_RADIUS: f32 = 16.0;

    /// Collectible body radius
    pub const COLLECTIBLE_RADIUS: f32 = 12.0;
    /// Delay between a collectible appearing and pickup detection arming (ms)
    pub const PICKUP_ARM_DELAY_MS: u64 = 500;

    /// Projectile speed (pixels/s)
    pub const PROJECTILE_SPEED: f32 = 400.0;
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    /// Minimum time between two shots (ms)
    pub const SHOT_COOLDOWN_MS: u64 = 500;
    /// Projectile lifetime when it hits nothing (ms)
    pub const PROJECTILE_TTL_MS: u64 = 2000;

    /// Transient HUD message lifetime (ms)
    pub const MESSAGE_DURATION_MS: u64 = 2000;
    /// Store border flash lifetime (ms)
    pub const STORE_BORDER_DURATION_MS: u64 = 2000;
}

/// Unit direction from held directional keys, `None` when nothing is held.
///
/// Left wins over right and up wins over down, matching how movement reads
/// the same keys. Screen coordinates: +y points down.
#[inline]
pub fn held_direction(left: bool, right: bool, up: bool, down: bool) -> Option<Vec2> {
    let x = if left {
        -1.0
    } else if right {
        1.0
    } else {
        0.0
    };
    let y = if up {
        -1.0
    } else if down {
        1.0
    } else {
        0.0
    };
    let dir = Vec2::new(x, y);
    if dir == Vec2::ZERO {
        None
    } else {
        Some(dir.normalize())
    }
}

/// Clamp a body of `radius` centred at `pos` inside the canvas
#[inline]
pub fn clamp_to_canvas(pos: Vec2, radius: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, consts::CANVAS_WIDTH - radius),
        pos.y.clamp(radius, consts::CANVAS_HEIGHT - radius),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_direction_priorities() {
        assert_eq!(held_direction(false, false, false, false), None);
        assert_eq!(held_direction(true, true, false, false), Some(Vec2::NEG_X));
        assert_eq!(held_direction(false, false, true, true), Some(Vec2::NEG_Y));

        let diag = held_direction(false, true, false, true).unwrap();
        assert!((diag.length() - 1.0).abs() < 1e-5);
        assert!(diag.x > 0.0 && diag.y > 0.0);
    }

    #[test]
    fn test_clamp_to_canvas() {
        let p = clamp_to_canvas(Vec2::new(-50.0, 700.0), 10.0);
        assert_eq!(p, Vec2::new(10.0, 590.0));
    }
}
