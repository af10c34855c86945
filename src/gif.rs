//! Animated GIF export of rendered backdrop frames

use crate::output::{ensure_parent, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Convert a frame interval to GIF centiseconds, clamped to at least one.
pub fn delay_centiseconds(frame_ms: u32) -> u32 {
    (frame_ms / 10).max(1)
}

/// Streaming animated GIF encoder.
///
/// Frames are handed to the encoder as they arrive, so an animation never
/// sits in memory as a whole. The file is created on the first frame; a
/// writer that never receives one leaves nothing on disk.
pub struct GifWriter {
    path: PathBuf,
    delay: Delay,
    repeat: Repeat,
    encoder: Option<GifEncoder<BufWriter<File>>>,
    frames: usize,
}

impl GifWriter {
    /// With `loop_anim` the animation repeats forever, otherwise it plays once.
    pub fn new(path: &Path, frame_ms: u32, loop_anim: bool) -> Self {
        let delay_ms = delay_centiseconds(frame_ms) * 10;
        Self {
            path: path.to_path_buf(),
            delay: Delay::from_numer_denom_ms(delay_ms, 1),
            repeat: if loop_anim { Repeat::Infinite } else { Repeat::Finite(0) },
            encoder: None,
            frames: 0,
        }
    }

    fn open(&self) -> Result<GifEncoder<BufWriter<File>>, OutputError> {
        ensure_parent(&self.path)?;
        let mut encoder = GifEncoder::new(BufWriter::new(File::create(&self.path)?));
        encoder.set_repeat(self.repeat)?;
        Ok(encoder)
    }

    /// Encode one frame.
    pub fn push(&mut self, frame: RgbaImage) -> Result<(), OutputError> {
        if self.encoder.is_none() {
            self.encoder = Some(self.open()?);
        }
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.encode_frame(Frame::from_parts(frame, 0, 0, self.delay))?;
            self.frames += 1;
        }
        Ok(())
    }

    /// Frames encoded so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Write the trailer and close the file. Returns the frame count.
    pub fn finish(self) -> usize {
        if self.frames == 0 {
            log::warn!("no frames to encode, skipping {}", self.path.display());
        } else {
            log::debug!("encoded {} frames to {}", self.frames, self.path.display());
        }
        // the trailer is written when the encoder drops
        self.frames
    }
}
