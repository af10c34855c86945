//! PNG output, frame post-processing and output path generation

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color::Color;
use crate::models::DisasterMode;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Requested image exceeds [`MAX_OUTPUT_PIXELS`]
    #[error("output of {width}x{height} pixels is too large (limit {MAX_OUTPUT_PIXELS} pixels)")]
    TooLarge { width: u64, height: u64 },
}

/// Largest image, in pixels, any export may produce.
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Check that a `width` x `height` image stays within [`MAX_OUTPUT_PIXELS`]
/// and that each side fits in a `u32`.
pub fn check_output_size(width: u64, height: u64) -> Result<(u32, u32), OutputError> {
    let fits = width.checked_mul(height).is_some_and(|p| p <= MAX_OUTPUT_PIXELS);
    match (fits, u32::try_from(width), u32::try_from(height)) {
        (true, Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(OutputError::TooLarge { width, height }),
    }
}

/// Create the parent directory of `path` if it is missing.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// A factor of 0 or 1 returns the image unchanged. Results larger than
/// [`MAX_OUTPUT_PIXELS`] are refused.
pub fn scale_image(image: RgbaImage, factor: u8) -> Result<RgbaImage, OutputError> {
    if factor <= 1 {
        return Ok(image);
    }
    let (w, h) = image.dimensions();
    let factor = u64::from(factor);
    let (sw, sh) = check_output_size(u64::from(w) * factor, u64::from(h) * factor)?;
    Ok(image::imageops::resize(&image, sw, sh, FilterType::Nearest))
}

/// Composite a frame over a solid background color.
///
/// Backdrop frames are transparent where no particle was painted; exports
/// that cannot carry alpha well (GIF) look better flattened.
pub fn flatten_onto(frame: &RgbaImage, background: Color) -> RgbaImage {
    let bg = background.to_rgba8();
    let ba = bg[3] as f32 / 255.0;
    let mut out = RgbaImage::new(frame.width(), frame.height());

    for (dst, src) in out.pixels_mut().zip(frame.pixels()) {
        let sa = src[3] as f32 / 255.0;
        let out_a = sa + ba * (1.0 - sa);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            continue;
        }
        let mix = |s: u8, b: u8| {
            let v = (s as f32 * sa + b as f32 * ba * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        *dst = Rgba([
            mix(src[0], bg[0]),
            mix(src[1], bg[1]),
            mix(src[2], bg[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    out
}

/// Horizontal strip of frames laid side by side, filled as frames arrive.
///
/// The canvas is allocated once at its final size, so frames never pile up
/// in memory before being composed.
#[derive(Debug)]
pub struct StripCanvas {
    image: RgbaImage,
    x: i64,
}

impl StripCanvas {
    /// Allocate a `width` x `height` strip, refusing sizes beyond
    /// [`MAX_OUTPUT_PIXELS`].
    pub fn new(width: u64, height: u64) -> Result<Self, OutputError> {
        let (width, height) = check_output_size(width, height)?;
        Ok(Self { image: RgbaImage::new(width, height), x: 0 })
    }

    /// Append `frame` right of the previous one, top-aligned.
    pub fn push(&mut self, frame: &RgbaImage) {
        image::imageops::replace(&mut self.image, frame, self.x, 0);
        self.x += i64::from(frame.width());
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Default output path for a render: `aura_{mode}.{ext}`, or inside
/// `output` when it names a directory.
///
/// | `output` | Result |
/// |----------|--------|
/// | `None` | `aura_fire.gif` |
/// | `Some("out/")` | `out/aura_fire.gif` |
/// | `Some("storm.gif")` | `storm.gif` |
pub fn generate_output_path(mode: DisasterMode, extension: &str, output: Option<&Path>) -> PathBuf {
    let file_name = format!("aura_{}.{}", mode, extension);
    match output {
        None => PathBuf::from(file_name),
        Some(path) => {
            let is_dir = path.as_os_str().to_string_lossy().ends_with('/') || path.is_dir();
            if is_dir {
                path.join(file_name)
            } else {
                path.to_path_buf()
            }
        }
    }
}
