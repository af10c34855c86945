//! Particle types and their spawn rules.
//!
//! Each disaster mode has its own particle shape carrying exactly the fields
//! its motion rule reads. The ranges below are half-open `[min, max)`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mode::DisasterMode;

/// Draw a value from `[lo, hi)`, or `lo` when the range is empty.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// A falling rain streak (flood mode).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainDrop {
    pub x: f64,
    pub y: f64,
    /// Horizontal drift (pixels per frame)
    pub vx: f64,
    /// Fall speed (pixels per frame, positive is down)
    pub vy: f64,
    /// Stroke width
    pub size: f64,
}

impl RainDrop {
    pub const VX: (f64, f64) = (-0.1, 0.1);
    pub const VY: (f64, f64) = (2.0, 4.5);
    pub const SIZE: (f64, f64) = (1.0, 2.5);

    /// Spawn above the visible area so drops fall into view.
    pub fn spawn<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Self {
        Self {
            x: uniform(rng, 0.0, width),
            y: uniform(rng, -height, 0.0),
            vx: uniform(rng, Self::VX.0, Self::VX.1),
            vy: uniform(rng, Self::VY.0, Self::VY.1),
            size: uniform(rng, Self::SIZE.0, Self::SIZE.1),
        }
    }
}

/// A rising ember with a finite life (fire mode).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ember {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    /// Rise speed (negative is up)
    pub vy: f64,
    /// Disc radius before flicker
    pub size: f64,
    /// Remaining frames
    pub life: f64,
}

impl Ember {
    pub const VX: (f64, f64) = (-0.15, 0.15);
    pub const VY: (f64, f64) = (-3.0, -1.5);
    pub const SIZE: (f64, f64) = (1.0, 3.0);
    pub const LIFE: (f64, f64) = (60.0, 140.0);
    /// How far below the bottom edge embers may start
    pub const SPAWN_DEPTH: f64 = 100.0;

    /// Spawn just below the visible area.
    pub fn spawn<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Self {
        Self {
            x: uniform(rng, 0.0, width),
            y: height + uniform(rng, 0.0, Self::SPAWN_DEPTH),
            vx: uniform(rng, Self::VX.0, Self::VX.1),
            vy: uniform(rng, Self::VY.0, Self::VY.1),
            size: uniform(rng, Self::SIZE.0, Self::SIZE.1),
            life: uniform(rng, Self::LIFE.0, Self::LIFE.1),
        }
    }
}

/// A dot orbiting the viewport center (cyclone mode).
///
/// Carries no velocity or phase: both are re-derived from the position
/// every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwirlDot {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl SwirlDot {
    pub const SIZE: (f64, f64) = (1.0, 2.5);

    /// Spawn anywhere inside the viewport.
    pub fn spawn<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Self {
        Self {
            x: uniform(rng, 0.0, width),
            y: uniform(rng, 0.0, height),
            size: uniform(rng, Self::SIZE.0, Self::SIZE.1),
        }
    }
}

/// One particle of the field, tagged by the mode that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Particle {
    Rain(RainDrop),
    Ember(Ember),
    Swirl(SwirlDot),
}

impl Particle {
    /// Produce a fresh particle using the spawn rule of `mode`.
    pub fn spawn<R: Rng + ?Sized>(
        mode: DisasterMode,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> Self {
        match mode {
            DisasterMode::Flood => Particle::Rain(RainDrop::spawn(width, height, rng)),
            DisasterMode::Fire => Particle::Ember(Ember::spawn(width, height, rng)),
            DisasterMode::Cyclone => Particle::Swirl(SwirlDot::spawn(width, height, rng)),
        }
    }

    /// The mode whose rules govern this particle.
    pub fn mode(&self) -> DisasterMode {
        match self {
            Particle::Rain(_) => DisasterMode::Flood,
            Particle::Ember(_) => DisasterMode::Fire,
            Particle::Swirl(_) => DisasterMode::Cyclone,
        }
    }

    /// Current position `(x, y)` in pixels.
    pub fn position(&self) -> (f64, f64) {
        match self {
            Particle::Rain(p) => (p.x, p.y),
            Particle::Ember(p) => (p.x, p.y),
            Particle::Swirl(p) => (p.x, p.y),
        }
    }

    pub fn size(&self) -> f64 {
        match self {
            Particle::Rain(p) => p.size,
            Particle::Ember(p) => p.size,
            Particle::Swirl(p) => p.size,
        }
    }
}
