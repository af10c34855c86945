//! Drawing surface abstraction
//!
//! The field renderer paints through [`Surface`] so it can target the
//! software rasterizer in [`crate::raster`], a browser canvas, or nothing
//! at all.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// How painted pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Standard alpha compositing (source over destination)
    #[default]
    SourceOver,
    /// Additive blending: overlapping paint brightens
    Lighter,
}

impl BlendMode {
    /// Combine premultiplied source and destination channels (0.0-1.0).
    ///
    /// `src_alpha` is the source coverage used by source-over.
    pub fn composite(self, src: f32, dst: f32, src_alpha: f32) -> f32 {
        match self {
            BlendMode::SourceOver => src + dst * (1.0 - src_alpha),
            BlendMode::Lighter => (src + dst).min(1.0),
        }
    }
}

/// A soft halo painted around a filled shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Halo reach in pixels beyond the shape edge
    pub blur: f64,
    pub color: Color,
}

/// A 2D point in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The painting operations the particle field needs.
pub trait Surface {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Erase every pixel to transparent.
    fn clear(&mut self);

    /// Blend mode used by subsequent paint calls.
    fn blend(&self) -> BlendMode;

    fn set_blend(&mut self, mode: BlendMode);

    /// Stroke a straight segment with round caps.
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color);

    /// Fill a disc, optionally surrounded by a glow.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, glow: Option<Glow>);
}

/// Records paint calls without rasterizing them.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Clear,
    Blend(BlendMode),
    Line { from: Point, to: Point, width: f64, color: Color },
    Circle { center: Point, radius: f64, color: Color, glow: Option<Glow> },
}

/// A [`Surface`] that logs what was painted; used to inspect frames.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    blend: BlendMode,
    ops: Vec<PaintOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Forget recorded calls, keeping size and blend mode.
    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(PaintOp::Clear);
    }

    fn blend(&self) -> BlendMode {
        self.blend
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.ops.push(PaintOp::Blend(mode));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.ops.push(PaintOp::Line { from, to, width, color });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, glow: Option<Glow>) {
        self.ops.push(PaintOp::Circle { center, radius, color, glow });
    }
}
