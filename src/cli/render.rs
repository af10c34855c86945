//! Render command implementation and helpers

use clap::Args;
use image::RgbaImage;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::animation::FrameLoop;
use crate::config::{
    check, load_config, merge_cli_overrides, AuraConfig, CliOverrides, MAX_SCALE, MAX_VIEWPORT,
};
use crate::field::ParticleField;
use crate::gif::GifWriter;
use crate::models::DisasterMode;
use crate::output::{
    check_output_size, flatten_onto, generate_output_path, save_png, scale_image, OutputError,
    StripCanvas,
};
use crate::raster::RasterSurface;

use super::{parse_mode, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Disaster mode: flood, fire or cyclone (default: config or flood)
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<DisasterMode>,

    /// Viewport width in pixels, up to 8192 (default: config or 1280)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_VIEWPORT as i64))]
    pub width: Option<u32>,

    /// Viewport height in pixels, up to 8192 (default: config or 720)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_VIEWPORT as i64))]
    pub height: Option<u32>,

    /// Number of frames to simulate (default: config or 120)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub frames: Option<u32>,

    /// RNG seed for a reproducible render
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frame interval in milliseconds, used as the GIF delay (default: config or 16)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_ms: Option<u32>,

    /// Scale output by integer factor (1-16)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_SCALE as i64))]
    pub scale: Option<u8>,

    /// Background color painted under the particles (any CSS color)
    #[arg(long)]
    pub background: Option<String>,

    /// Path to aura.toml (default: discovered from the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file or directory.
    /// If omitted: aura_{mode}.{png,gif}
    /// If directory (ends with /): dir/aura_{mode}.{png,gif}
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output as animated GIF of every frame
    #[arg(long, conflicts_with = "strip")]
    pub gif: bool,

    /// Output as a horizontal strip of every frame
    #[arg(long)]
    pub strip: bool,

    /// Play in real time at --frame-ms, rewriting the PNG after every frame
    #[arg(long, conflicts_with_all = ["gif", "strip"])]
    pub live: bool,

    /// Resize the viewport before frame N, e.g. "30:640x480" (repeatable)
    #[arg(long = "resize-at", value_parser = parse_resize_event)]
    pub resize_at: Vec<HostEvent>,

    /// Switch mode before frame N, e.g. "60:fire" (repeatable)
    #[arg(long = "switch-at", value_parser = parse_switch_event)]
    pub switch_at: Vec<HostEvent>,
}

impl RenderArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            mode: self.mode,
            width: self.width,
            height: self.height,
            seed: self.seed,
            frames: self.frames,
            frame_ms: self.frame_ms,
            scale: self.scale,
            background: self.background.clone(),
        }
    }
}

/// A host-side event applied between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Viewport resize before the given frame
    Resize { frame: u32, width: u32, height: u32 },
    /// Mode selection before the given frame
    Switch { frame: u32, mode: DisasterMode },
}

impl HostEvent {
    pub fn frame(&self) -> u32 {
        match self {
            HostEvent::Resize { frame, .. } | HostEvent::Switch { frame, .. } => *frame,
        }
    }

    fn apply(&self, lp: &mut FrameLoop<RasterSurface>) {
        match *self {
            HostEvent::Resize { width, height, .. } => lp.resize(width, height),
            HostEvent::Switch { mode, .. } => lp.set_mode(mode),
        }
    }
}

fn split_frame(s: &str) -> Result<(u32, &str), String> {
    let (frame, rest) =
        s.split_once(':').ok_or_else(|| format!("expected FRAME:VALUE, got '{}'", s))?;
    let frame = frame
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid frame number '{}'", frame))?;
    Ok((frame, rest.trim()))
}

/// Parse `FRAME:WxH`.
pub fn parse_resize_event(s: &str) -> Result<HostEvent, String> {
    let (frame, size) = split_frame(s)?;
    let (w, h) = size
        .split_once('x')
        .ok_or_else(|| format!("invalid size '{}', use WxH (e.g. '640x480')", size))?;
    let side = |v: &str| v.parse::<u32>().ok().filter(|n| (1..=MAX_VIEWPORT).contains(n));
    match (side(w), side(h)) {
        (Some(width), Some(height)) => Ok(HostEvent::Resize { frame, width, height }),
        _ => Err(format!(
            "invalid size '{}', width and height must be between 1 and {}",
            size, MAX_VIEWPORT
        )),
    }
}

/// Parse `FRAME:MODE`.
pub fn parse_switch_event(s: &str) -> Result<HostEvent, String> {
    let (frame, mode) = split_frame(s)?;
    Ok(HostEvent::Switch { frame, mode: parse_mode(mode)? })
}

/// Simulate `config.output.frames` frames, applying host events between
/// them, and hand frames to `sink` as they are painted: every frame when
/// `keep_all`, otherwise only the last. With `pace` the loop runs in real
/// time. The first sink error stops the loop and is returned.
pub(crate) fn simulate<F>(
    config: &AuraConfig,
    events: &[HostEvent],
    keep_all: bool,
    pace: Option<Duration>,
    mut sink: F,
) -> Result<(), OutputError>
where
    F: FnMut(RgbaImage) -> Result<(), OutputError>,
{
    let backdrop = &config.backdrop;
    let field = match backdrop.seed {
        Some(seed) => ParticleField::seeded(backdrop.mode, backdrop.width, backdrop.height, seed),
        None => ParticleField::new(backdrop.mode, backdrop.width, backdrop.height),
    }
    .with_palette(config.neon_palette());

    let total = config.output.frames;
    let mut lp = FrameLoop::new(field, RasterSurface::new(backdrop.width, backdrop.height));
    let mut failure = None;

    let apply_due = |lp: &mut FrameLoop<RasterSurface>, frame: u32| {
        for event in events.iter().filter(|e| e.frame() == frame) {
            log::info!("frame {}: {:?}", frame, event);
            event.apply(lp);
        }
    };

    apply_due(&mut lp, 0);
    let on_frame = |lp: &mut FrameLoop<RasterSurface>| {
        let rendered = lp.frames_rendered() as u32;
        if keep_all || rendered == total {
            if let Err(e) = sink(lp.surface().image()) {
                failure = Some(e);
                return ControlFlow::Break(());
            }
        }
        apply_due(lp, rendered);
        ControlFlow::Continue(())
    };
    match pace {
        Some(interval) => lp.run_paced(u64::from(total), interval, on_frame),
        None => lp.run(u64::from(total), on_frame),
    }

    failure.map_or(Ok(()), Err)
}

/// Size of the strip PNG for `config` once `events` are applied: the sum
/// of every scaled frame width by the tallest scaled frame.
fn strip_dimensions(config: &AuraConfig, events: &[HostEvent]) -> (u64, u64) {
    let scale = u64::from(config.output.scale);
    let mut size = (config.backdrop.width, config.backdrop.height);
    let mut start = 0;
    let (mut width, mut height) = (0u64, 0u64);

    // events are sorted by frame; a sentinel closes the last span
    let resizes = events.iter().filter_map(|e| match *e {
        HostEvent::Resize { frame, width, height } => Some((frame, width, height)),
        HostEvent::Switch { .. } => None,
    });
    for (frame, w, h) in resizes.chain(std::iter::once((config.output.frames, 0, 0))) {
        let span = u64::from(frame.saturating_sub(start));
        if span > 0 {
            width += span * u64::from(size.0) * scale;
            height = height.max(u64::from(size.1) * scale);
        }
        start = frame;
        size = (w, h);
    }
    (width, height)
}

/// Refuse renders whose output would not fit in [`crate::output::MAX_OUTPUT_PIXELS`].
fn check_render_size(
    config: &AuraConfig,
    events: &[HostEvent],
    strip: bool,
) -> Result<(), OutputError> {
    let scale = u64::from(config.output.scale);
    for event in events {
        if let HostEvent::Resize { width, height, .. } = *event {
            check_output_size(u64::from(width) * scale, u64::from(height) * scale)?;
        }
    }
    if strip {
        let (width, height) = strip_dimensions(config, events);
        check_output_size(width, height)?;
    }
    Ok(())
}

/// Execute the render command
pub fn run_render(args: &RenderArgs) -> ExitCode {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    merge_cli_overrides(&mut config, &args.overrides());
    let config = match check(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut events: Vec<HostEvent> = args.resize_at.iter().chain(&args.switch_at).copied().collect();
    if args.gif && events.iter().any(|e| matches!(e, HostEvent::Resize { .. })) {
        eprintln!("Error: --gif needs a fixed viewport; drop --resize-at or use --strip");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    for event in events.iter().filter(|e| e.frame() >= config.output.frames) {
        eprintln!(
            "Warning: event at frame {} is past the last frame ({}), ignoring",
            event.frame(),
            config.output.frames
        );
    }
    events.retain(|e| e.frame() < config.output.frames);
    // Resizes first within a frame, so a switch lands on the new viewport
    events.sort_by_key(|e| (e.frame(), matches!(e, HostEvent::Switch { .. })));

    if let Err(e) = check_render_size(&config, &events, args.strip) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let background = config.output.background.as_ref().map(|_| config.background());
    let scale = config.output.scale;
    let finish = |f: RgbaImage| {
        let f = match background {
            Some(bg) => flatten_onto(&f, bg),
            None => f,
        };
        scale_image(f, scale)
    };

    let mode = config.backdrop.mode;
    let extension = if args.gif { "gif" } else { "png" };
    let path = generate_output_path(mode, extension, args.output.as_deref());
    let frame_ms = config.output.frame_ms;

    let result = if args.gif {
        let mut writer = GifWriter::new(&path, frame_ms, config.output.loop_anim);
        let streamed = simulate(&config, &events, true, None, |f| writer.push(finish(f)?));
        writer.finish();
        streamed
    } else if args.strip {
        let (width, height) = strip_dimensions(&config, &events);
        StripCanvas::new(width, height).and_then(|mut strip| {
            simulate(&config, &events, true, None, |f| {
                strip.push(&finish(f)?);
                Ok(())
            })?;
            save_png(&strip.into_image(), &path)
        })
    } else if args.live {
        let pace = Duration::from_millis(u64::from(frame_ms));
        simulate(&config, &events, true, Some(pace), |f| save_png(&finish(f)?, &path))
    } else {
        let mut last = None;
        simulate(&config, &events, false, None, |f| {
            last = Some(finish(f)?);
            Ok(())
        })
        .and_then(|()| match &last {
            Some(image) => save_png(image, &path),
            None => Err(OutputError::Io(std::io::Error::other("no frames rendered"))),
        })
    };

    if let Err(e) = result {
        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", path.display());
    ExitCode::from(EXIT_SUCCESS)
}
