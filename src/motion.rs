//! Per-mode motion rules
//!
//! One call advances a particle by exactly one frame; motion speed is tied
//! to the refresh rate of whatever drives the frame loop.

use crate::models::{Ember, RainDrop};

/// Rain falls faster than its streak suggests.
pub const RAIN_FALL_SCALE: f64 = 1.2;

/// Embers above this line (pixels above the top edge) are spent.
pub const EMBER_CEILING: f64 = -20.0;

/// Life at which an ember is drawn fully opaque.
pub const EMBER_FULL_LIFE: f64 = 120.0;

/// Swirl distances are floored here so dots near the eye neither stall
/// nor spin out.
pub const SWIRL_MIN_DIST: f64 = 40.0;

/// Angular step numerator: the step is `SWIRL_TURN / (dist * 0.02)` radians.
pub const SWIRL_TURN: f64 = 0.2;

pub fn advance_rain(p: &mut RainDrop) {
    p.x += p.vx;
    p.y += p.vy * RAIN_FALL_SCALE;
}

/// A drop below the bottom edge needs respawning.
pub fn rain_expired(p: &RainDrop, height: f64) -> bool {
    p.y > height
}

/// Drift sideways along a sine of the height, rise, and burn one frame of life.
pub fn advance_ember(p: &mut Ember) {
    p.x += p.vx + (p.y * 0.02).sin() * 0.2;
    p.y += p.vy;
    p.life -= 1.0;
}

/// Burnt out, or risen past the ceiling.
pub fn ember_expired(p: &Ember) -> bool {
    p.life <= 0.0 || p.y < EMBER_CEILING
}

/// Fill opacity of an ember; never fades below 0.1.
pub fn ember_alpha(life: f64) -> f64 {
    (life / EMBER_FULL_LIFE).max(0.1)
}

/// Result of one orbital step around the viewport center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwirlStep {
    /// Orbit radius used for this step (floored at [`SWIRL_MIN_DIST`])
    pub dist: f64,
    /// New phase in radians
    pub angle: f64,
    /// New position before jitter
    pub x: f64,
    pub y: f64,
}

/// Rotate `(x, y)` around `(cx, cy)`.
///
/// The phase is derived from the current position, so nothing besides the
/// position needs to be stored between frames. Inner orbits turn faster.
pub fn swirl_step(x: f64, y: f64, cx: f64, cy: f64) -> SwirlStep {
    let dx = x - cx;
    let dy = y - cy;
    let dist = dx.hypot(dy).max(SWIRL_MIN_DIST);
    let angle = dy.atan2(dx) + SWIRL_TURN / (dist * 0.02);
    SwirlStep { dist, angle, x: cx + angle.cos() * dist, y: cy + angle.sin() * dist }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_rain() {
        let mut p = RainDrop { x: 10.0, y: -5.0, vx: 0.05, vy: 3.0, size: 1.0 };
        advance_rain(&mut p);
        assert!((p.x - 10.05).abs() < 1e-12);
        assert!((p.y - (-5.0 + 3.6)).abs() < 1e-12);
        assert!(!rain_expired(&p, 100.0));
        p.y = 100.5;
        assert!(rain_expired(&p, 100.0));
    }

    #[test]
    fn test_advance_ember_uses_prior_height() {
        let mut p = Ember { x: 0.0, y: 50.0, vx: 0.1, vy: -2.0, size: 1.0, life: 80.0 };
        advance_ember(&mut p);
        let expected_x = 0.1 + (50.0f64 * 0.02).sin() * 0.2;
        assert!((p.x - expected_x).abs() < 1e-12);
        assert_eq!(p.y, 48.0);
        assert_eq!(p.life, 79.0);
    }

    #[test]
    fn test_ember_expiry() {
        let mut p = Ember { x: 0.0, y: 10.0, vx: 0.0, vy: -2.0, size: 1.0, life: 0.5 };
        assert!(!ember_expired(&p));
        advance_ember(&mut p);
        assert!(ember_expired(&p), "life below zero must expire");

        let high = Ember { x: 0.0, y: -20.5, vx: 0.0, vy: -2.0, size: 1.0, life: 50.0 };
        assert!(ember_expired(&high));
    }

    #[test]
    fn test_ember_alpha_floor() {
        assert_eq!(ember_alpha(120.0), 1.0);
        assert_eq!(ember_alpha(60.0), 0.5);
        assert_eq!(ember_alpha(3.0), 0.1);
    }

    #[test]
    fn test_swirl_step_at_center_uses_floor() {
        let step = swirl_step(500.0, 500.0, 500.0, 500.0);
        assert_eq!(step.dist, SWIRL_MIN_DIST);
        assert!(step.x.is_finite() && step.y.is_finite());
        let r = (step.x - 500.0).hypot(step.y - 500.0);
        assert!((r - SWIRL_MIN_DIST).abs() < 1e-9);
        // atan2(0, 0) = 0, so the phase is the bare angular step
        assert!((step.angle - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_swirl_step_preserves_radius() {
        let step = swirl_step(300.0, 100.0, 100.0, 100.0);
        assert_eq!(step.dist, 200.0);
        let r = (step.x - 100.0).hypot(step.y - 100.0);
        assert!((r - 200.0).abs() < 1e-9);
        // 0.2 / (200 * 0.02) = 0.05 rad counterclockwise in screen space
        assert!((step.angle - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_swirl_inner_orbits_turn_faster() {
        let inner = swirl_step(60.0, 0.0, 0.0, 0.0).angle;
        let outer = swirl_step(400.0, 0.0, 0.0, 0.0).angle;
        assert!(inner > outer);
    }
}
