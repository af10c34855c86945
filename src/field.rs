//! Particle field: the animated backdrop state and its frame pass.
//!
//! # Architecture
//!
//! A [`ParticleField`] owns a fixed-size collection of particles for the
//! current [`DisasterMode`]:
//!
//! 1. [`ParticleField::new`] sizes the collection from the viewport area and
//!    spawns every particle
//! 2. [`ParticleField::frame`] paints each particle and advances it by one
//!    frame, respawning expired particles in their own slot
//! 3. [`ParticleField::set_mode`] and [`ParticleField::resize`] discard the
//!    collection and spawn a new one
//!
//! # Example
//!
//! ```
//! use aura_haven::field::ParticleField;
//! use aura_haven::models::DisasterMode;
//! use aura_haven::raster::RasterSurface;
//!
//! let mut field = ParticleField::seeded(DisasterMode::Fire, 800, 600, 42);
//! assert_eq!(field.len(), 10);
//!
//! let mut surface = RasterSurface::new(800, 600);
//! field.frame(&mut surface);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::NeonPalette;
use crate::models::{uniform, DisasterMode, Ember, Particle, RainDrop};
use crate::motion::{
    advance_ember, advance_rain, ember_alpha, ember_expired, rain_expired, swirl_step,
};
use crate::surface::{BlendMode, Glow, Point, Surface};

/// Rain streak opacity is redrawn per frame from this range.
const RAIN_ALPHA: (f64, f64) = (0.55, 0.85);
/// Ember discs flicker by up to this many pixels of extra radius.
const EMBER_FLICKER: f64 = 1.2;
const EMBER_GLOW_BLUR: f64 = 8.0;
const SWIRL_ALPHA: f32 = 0.35;
const SWIRL_GLOW_BLUR: f64 = 6.0;
/// Per-axis positional jitter applied to swirl dots each frame.
const SWIRL_JITTER: f64 = 0.3;

/// Number of particles for a mode on a `width` x `height` viewport.
///
/// ```
/// use aura_haven::field::particle_count;
/// use aura_haven::models::DisasterMode;
///
/// assert_eq!(particle_count(DisasterMode::Fire, 800, 600), 10);
/// assert_eq!(particle_count(DisasterMode::Cyclone, 1000, 1000), 28);
/// ```
pub fn particle_count(mode: DisasterMode, width: u32, height: u32) -> usize {
    (width as f64 * height as f64 / mode.density()).floor() as usize
}

/// The animated particle backdrop.
#[derive(Debug, Clone)]
pub struct ParticleField {
    mode: DisasterMode,
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    palette: NeonPalette,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field seeded from OS entropy.
    pub fn new(mode: DisasterMode, width: u32, height: u32) -> Self {
        Self::with_rng(mode, width, height, StdRng::from_os_rng())
    }

    /// Create a reproducible field.
    pub fn seeded(mode: DisasterMode, width: u32, height: u32, seed: u64) -> Self {
        Self::with_rng(mode, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: DisasterMode, width: u32, height: u32, rng: StdRng) -> Self {
        let mut field = Self {
            mode,
            width,
            height,
            particles: Vec::new(),
            palette: NeonPalette::default(),
            rng,
        };
        field.reset();
        field
    }

    /// Replace the paint colors. Particle state is untouched.
    pub fn with_palette(mut self, palette: NeonPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn mode(&self) -> DisasterMode {
        self.mode
    }

    /// Viewport `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn palette(&self) -> &NeonPalette {
        &self.palette
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Discard every particle and spawn a full new collection.
    pub fn reset(&mut self) {
        let count = particle_count(self.mode, self.width, self.height);
        let (w, h) = (self.width as f64, self.height as f64);
        let rng = &mut self.rng;
        let mode = self.mode;
        self.particles = (0..count).map(|_| Particle::spawn(mode, w, h, rng)).collect();
        log::debug!("reset {} field to {} particles at {}x{}", mode, count, self.width, self.height);
    }

    /// Switch modes. Re-supplying the current mode keeps the particles.
    pub fn set_mode(&mut self, mode: DisasterMode) {
        if mode == self.mode {
            return;
        }
        log::info!("backdrop mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.reset();
    }

    /// Adopt new viewport dimensions; always respawns the whole field.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::info!("backdrop resize {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.reset();
    }

    /// Paint one frame onto `surface` and advance every particle.
    ///
    /// The surface is cleared first and painted with additive blending;
    /// source-over blending is restored afterwards.
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        surface.set_blend(BlendMode::Lighter);
        self.pass(Some(&mut *surface));
        surface.set_blend(BlendMode::SourceOver);
    }

    /// Advance every particle by one frame without painting.
    pub fn advance(&mut self) {
        self.pass(None);
    }

    fn pass(&mut self, mut surface: Option<&mut dyn Surface>) {
        let (w, h) = (self.width as f64, self.height as f64);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let palette = self.palette;
        let rng = &mut self.rng;

        for slot in self.particles.iter_mut() {
            match slot {
                Particle::Rain(p) => {
                    let alpha = uniform(rng, RAIN_ALPHA.0, RAIN_ALPHA.1);
                    if let Some(s) = surface.as_deref_mut() {
                        s.stroke_line(
                            Point::new(p.x, p.y),
                            Point::new(p.x + p.vx * 2.0, p.y + p.vy * 6.0),
                            p.size,
                            palette.cyan.with_alpha(alpha as f32),
                        );
                    }
                    advance_rain(p);
                    if rain_expired(p, h) {
                        *p = RainDrop::spawn(w, h, rng);
                    }
                }
                Particle::Ember(p) => {
                    let radius = p.size + uniform(rng, 0.0, EMBER_FLICKER);
                    if let Some(s) = surface.as_deref_mut() {
                        s.fill_circle(
                            Point::new(p.x, p.y),
                            radius,
                            palette.orange.with_alpha(ember_alpha(p.life) as f32),
                            Some(Glow { blur: EMBER_GLOW_BLUR, color: palette.orange }),
                        );
                    }
                    advance_ember(p);
                    if ember_expired(p) {
                        *p = Ember::spawn(w, h, rng);
                    }
                }
                Particle::Swirl(p) => {
                    let step = swirl_step(p.x, p.y, cx, cy);
                    p.x = step.x + uniform(rng, -SWIRL_JITTER, SWIRL_JITTER);
                    p.y = step.y + uniform(rng, -SWIRL_JITTER, SWIRL_JITTER);
                    if let Some(s) = surface.as_deref_mut() {
                        s.fill_circle(
                            Point::new(p.x, p.y),
                            p.size,
                            palette.pink.with_alpha(SWIRL_ALPHA),
                            Some(Glow { blur: SWIRL_GLOW_BLUR, color: palette.pink }),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwirlDot;
    use crate::surface::{PaintOp, RecordingSurface};

    fn embers(field: &ParticleField) -> Vec<Ember> {
        field
            .particles()
            .iter()
            .map(|p| match p {
                Particle::Ember(e) => *e,
                other => panic!("expected ember, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_fire_800x600_scenario() {
        let field = ParticleField::seeded(DisasterMode::Fire, 800, 600, 1);
        assert_eq!(field.len(), 10);
        for e in embers(&field) {
            assert!(e.y >= 600.0 && e.y < 700.0, "y = {}", e.y);
            assert!(e.life >= 60.0 && e.life < 140.0, "life = {}", e.life);
        }
    }

    #[test]
    fn test_counts_per_mode() {
        for mode in DisasterMode::all() {
            let field = ParticleField::seeded(mode, 1920, 1080, 5);
            assert_eq!(field.len(), particle_count(mode, 1920, 1080));
            assert!(field.particles().iter().all(|p| p.mode() == mode));
        }
        assert_eq!(particle_count(DisasterMode::Flood, 1920, 1080), 59);
        assert_eq!(particle_count(DisasterMode::Fire, 1920, 1080), 46);
    }

    #[test]
    fn test_tiny_viewport_has_no_particles() {
        let mut field = ParticleField::seeded(DisasterMode::Flood, 100, 100, 1);
        assert!(field.is_empty());
        let mut surface = RecordingSurface::new(100, 100);
        field.frame(&mut surface);
        assert_eq!(
            surface.ops(),
            &[
                PaintOp::Clear,
                PaintOp::Blend(BlendMode::Lighter),
                PaintOp::Blend(BlendMode::SourceOver)
            ]
        );
    }

    #[test]
    fn test_frame_paints_one_shape_per_particle() {
        for (mode, is_line) in
            [(DisasterMode::Flood, true), (DisasterMode::Fire, false), (DisasterMode::Cyclone, false)]
        {
            let mut field = ParticleField::seeded(mode, 700, 500, 9);
            let mut surface = RecordingSurface::new(700, 500);
            field.frame(&mut surface);

            let shapes: Vec<&PaintOp> = surface
                .ops()
                .iter()
                .filter(|op| matches!(op, PaintOp::Line { .. } | PaintOp::Circle { .. }))
                .collect();
            assert_eq!(shapes.len(), field.len());
            assert!(shapes.iter().all(|op| matches!(op, PaintOp::Line { .. }) == is_line));
            assert_eq!(surface.blend(), BlendMode::SourceOver);
        }
    }

    #[test]
    fn test_rain_streak_geometry_and_alpha() {
        let mut field = ParticleField::seeded(DisasterMode::Flood, 700, 500, 4);
        let before = match field.particles()[0] {
            Particle::Rain(p) => p,
            _ => unreachable!(),
        };
        let mut surface = RecordingSurface::new(700, 500);
        field.frame(&mut surface);

        let PaintOp::Line { from, to, width, color } = &surface.ops()[2] else {
            panic!("expected a line, got {:?}", surface.ops()[2]);
        };
        assert_eq!(*from, Point::new(before.x, before.y));
        assert_eq!(*to, Point::new(before.x + before.vx * 2.0, before.y + before.vy * 6.0));
        assert_eq!(*width, before.size);
        assert!(color.a >= 0.55 && color.a < 0.85);
        let cyan = field.palette().cyan;
        assert_eq!((color.r, color.g, color.b), (cyan.r, cyan.g, cyan.b));
    }

    #[test]
    fn test_ember_paint_style() {
        let mut field = ParticleField::seeded(DisasterMode::Fire, 800, 600, 12);
        let before = embers(&field);
        let orange = field.palette().orange;
        let mut surface = RecordingSurface::new(800, 600);
        field.frame(&mut surface);

        let circles: Vec<&PaintOp> =
            surface.ops().iter().filter(|op| matches!(op, PaintOp::Circle { .. })).collect();
        assert_eq!(circles.len(), before.len());

        for (op, ember) in circles.into_iter().zip(&before) {
            let PaintOp::Circle { center, radius, color, glow } = op else { unreachable!() };
            // painted where the ember was before it moved
            assert_eq!(*center, Point::new(ember.x, ember.y));
            assert!(*radius >= ember.size && *radius < ember.size + 1.2, "radius {}", radius);
            // alpha uses the life before this frame's decrement
            let expected = (ember_alpha(ember.life) as f32).clamp(0.0, 1.0);
            assert_eq!(color.a, expected);
            assert_eq!((color.r, color.g, color.b), (orange.r, orange.g, orange.b));
            let glow = glow.expect("embers glow");
            assert_eq!(glow.blur, 8.0);
            assert_eq!(glow.color, orange);
        }
    }

    #[test]
    fn test_ember_life_strictly_decreases_until_respawn() {
        let mut field = ParticleField::seeded(DisasterMode::Fire, 800, 600, 11);
        let mut respawns = 0;
        for _ in 0..400 {
            let before = embers(&field);
            field.advance();
            let after = embers(&field);
            for (b, a) in before.iter().zip(&after) {
                assert!(a.life > 0.0, "life observed at {}", a.life);
                if (a.life - (b.life - 1.0)).abs() > 1e-9 {
                    // respawned in place: fresh spawn state
                    respawns += 1;
                    assert!(a.life >= 60.0 && a.life < 140.0);
                    assert!(a.y >= 600.0 && a.y < 700.0);
                }
            }
        }
        assert!(respawns > 0, "embers should burn out within 400 frames");
        assert_eq!(field.len(), 10);
    }

    #[test]
    fn test_rain_respawns_within_spawn_ranges() {
        let mut field = ParticleField::seeded(DisasterMode::Flood, 600, 400, 2);
        let count = field.len();
        for _ in 0..300 {
            field.advance();
            for p in field.particles() {
                let Particle::Rain(r) = p else { panic!("mode changed") };
                assert!(r.y <= 400.0, "expired drop left in place");
                assert!(r.vy >= 2.0 && r.vy < 4.5);
                assert!(r.vx >= -0.1 && r.vx < 0.1);
                // at most 0.1px of drift per frame since the last respawn
                assert!(r.x > -31.0 && r.x < 631.0);
            }
        }
        assert_eq!(field.len(), count);
    }

    #[test]
    fn test_cyclone_particle_at_center_stays_finite() {
        let mut field = ParticleField::seeded(DisasterMode::Cyclone, 1000, 1000, 3);
        assert_eq!(field.len(), 28);
        field.particles[0] = Particle::Swirl(SwirlDot { x: 500.0, y: 500.0, size: 2.0 });

        field.advance();
        let (x, y) = field.particles()[0].position();
        let r = (x - 500.0).hypot(y - 500.0);
        // floored orbit of 40 plus at most 0.3 jitter per axis
        assert!((r - 40.0).abs() <= 0.3 * 2f64.sqrt() + 1e-9, "r = {}", r);

        for _ in 0..1000 {
            field.advance();
        }
        for p in field.particles() {
            let (x, y) = p.position();
            assert!(x.is_finite() && y.is_finite());
        }
    }

    #[test]
    fn test_cyclone_paint_style() {
        let mut field = ParticleField::seeded(DisasterMode::Cyclone, 800, 800, 8);
        let mut surface = RecordingSurface::new(800, 800);
        field.frame(&mut surface);
        let PaintOp::Circle { center, radius, color, glow } = &surface.ops()[2] else {
            panic!("expected a circle");
        };
        // painted at the post-step position
        assert_eq!(*center, {
            let (x, y) = field.particles()[0].position();
            Point::new(x, y)
        });
        assert_eq!(*radius, field.particles()[0].size());
        assert_eq!(color.a, 0.35);
        assert_eq!(glow.map(|g| g.blur), Some(6.0));
    }

    #[test]
    fn test_set_mode_discards_particles() {
        let mut field = ParticleField::seeded(DisasterMode::Flood, 900, 700, 6);
        field.advance();
        field.set_mode(DisasterMode::Fire);
        assert_eq!(field.mode(), DisasterMode::Fire);
        assert_eq!(field.len(), particle_count(DisasterMode::Fire, 900, 700));
        for e in embers(&field) {
            assert!(e.life >= 60.0 && e.life < 140.0);
            assert!(e.vy >= -3.0 && e.vy < -1.5);
        }
    }

    #[test]
    fn test_set_same_mode_keeps_particles() {
        let mut field = ParticleField::seeded(DisasterMode::Cyclone, 900, 700, 6);
        let before = field.particles().to_vec();
        field.set_mode(DisasterMode::Cyclone);
        assert_eq!(field.particles(), before.as_slice());
    }

    #[test]
    fn test_resize_respawns_within_new_bounds() {
        let mut field = ParticleField::seeded(DisasterMode::Cyclone, 1600, 1200, 12);
        for _ in 0..10 {
            field.advance();
        }
        field.resize(400, 300);
        assert_eq!(field.dimensions(), (400, 300));
        assert_eq!(field.len(), particle_count(DisasterMode::Cyclone, 400, 300));
        for p in field.particles() {
            let (x, y) = p.position();
            assert!(x >= 0.0 && x < 400.0 && y >= 0.0 && y < 300.0);
        }
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = ParticleField::seeded(DisasterMode::Fire, 640, 480, 77);
        let mut b = ParticleField::seeded(DisasterMode::Fire, 640, 480, 77);
        let mut sa = RecordingSurface::new(640, 480);
        let mut sb = RecordingSurface::new(640, 480);
        for _ in 0..20 {
            a.frame(&mut sa);
            b.frame(&mut sb);
        }
        assert_eq!(sa.ops(), sb.ops());
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_painting_does_not_change_motion() {
        let mut painted = ParticleField::seeded(DisasterMode::Flood, 640, 480, 21);
        let mut blind = ParticleField::seeded(DisasterMode::Flood, 640, 480, 21);
        let mut surface = RecordingSurface::new(640, 480);
        for _ in 0..50 {
            painted.frame(&mut surface);
            blind.advance();
        }
        assert_eq!(painted.particles(), blind.particles());
    }
}
