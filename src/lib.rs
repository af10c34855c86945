//! Aura Haven - animated disaster-preparedness backdrops
//!
//! This library provides functionality to:
//! - Simulate flood, fire and cyclone particle fields frame by frame
//! - Paint them onto a drawing surface (in-memory RGBA or a recorder)
//! - Export frames as PNG, frame strips or animated GIFs
//! - Produce the static preparedness feed documents as JSON

pub mod animation;
pub mod cli;
pub mod color;
pub mod config;
pub mod feed;
pub mod field;
pub mod gif;
pub mod models;
pub mod motion;
pub mod output;
pub mod raster;
pub mod surface;

#[cfg(feature = "wasm")]
pub mod wasm;
