//! Combat navigation and engagement engine for a naval tile-map game,
//! driven over an Android device channel with template matching.

pub mod combat;
pub mod config;
pub mod device;
pub mod error;
pub mod geometry;
pub mod pacing;
pub mod roster;
pub mod session;
pub mod sortie;
pub mod stats;
pub mod vision;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{EngineError, Result};
pub use session::Session;
