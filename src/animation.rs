//! Frame loop driving a [`ParticleField`] onto a [`Surface`]
//!
//! The loop is single-threaded and cooperative: each [`FrameLoop::tick`]
//! runs one complete update-and-paint pass and then schedules the next one
//! by returning [`ControlFlow::Continue`]. Mode changes and resizes are
//! applied synchronously between ticks, so a frame never sees a half-reset
//! field. Stopping simply means no further tick does any work.

use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

use crate::field::ParticleField;
use crate::models::DisasterMode;
use crate::raster::RasterSurface;
use crate::surface::Surface;

/// Surfaces that can follow a viewport resize.
pub trait Resizable {
    fn resize_to(&mut self, width: u32, height: u32);
}

impl Resizable for RasterSurface {
    fn resize_to(&mut self, width: u32, height: u32) {
        self.resize(width, height);
    }
}

/// A running backdrop animation.
#[derive(Debug)]
pub struct FrameLoop<S: Surface> {
    field: ParticleField,
    surface: S,
    running: bool,
    frames: u64,
}

impl<S: Surface + Resizable> FrameLoop<S> {
    /// Start a loop. The field is resized to the surface if they disagree.
    pub fn new(mut field: ParticleField, surface: S) -> Self {
        let size = (surface.width(), surface.height());
        if field.dimensions() != size {
            field.resize(size.0, size.1);
        }
        Self { field, surface, running: true, frames: 0 }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames painted since the loop started.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Host selected a mode. Takes effect before the next frame.
    pub fn set_mode(&mut self, mode: DisasterMode) {
        self.field.set_mode(mode);
    }

    /// Viewport changed: resize the surface and respawn the field.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize_to(width, height);
        self.field.resize(width, height);
    }

    /// Tear the loop down. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("frame loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    /// Run one frame if the loop is live.
    pub fn tick(&mut self) -> ControlFlow<()> {
        if !self.running {
            return ControlFlow::Break(());
        }
        self.field.frame(&mut self.surface);
        self.frames += 1;
        ControlFlow::Continue(())
    }

    /// Free-running loop: tick until `max_frames` frames have been painted,
    /// the loop is stopped, or `on_frame` breaks.
    ///
    /// `on_frame` receives the loop after each frame so it can inspect the
    /// surface and apply host events (mode switch, resize, stop).
    pub fn run<F>(&mut self, max_frames: u64, mut on_frame: F)
    where
        F: FnMut(&mut Self) -> ControlFlow<()>,
    {
        for _ in 0..max_frames {
            if self.tick().is_break() {
                break;
            }
            if on_frame(self).is_break() {
                self.stop();
                break;
            }
        }
    }

    /// Like [`FrameLoop::run`], but sleeps so frames start at most once per
    /// `interval`. Late frames are not caught up.
    pub fn run_paced<F>(&mut self, max_frames: u64, interval: Duration, mut on_frame: F)
    where
        F: FnMut(&mut Self) -> ControlFlow<()>,
    {
        let mut next = Instant::now();
        self.run(max_frames, |lp| {
            let flow = on_frame(lp);
            next += interval;
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            } else {
                next = now;
            }
            flow
        });
    }

    /// Stop and hand back the field and surface.
    pub fn into_parts(mut self) -> (ParticleField, S) {
        self.stop();
        (self.field, self.surface)
    }
}
