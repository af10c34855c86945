//! Data models for backdrop particles and preparedness feed documents

mod feed;
mod mode;
mod particle;

// Re-export all public types
pub use feed::{Alert, AwarenessEntry, Ping, Quiz, Session, Severity, Stats};
pub use mode::{DisasterMode, ModeParseError};
pub use particle::{uniform, Ember, Particle, RainDrop, SwirlDot};
