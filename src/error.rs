//! Error types for the combat engine.
//!
//! A missed detection is never an error; it is a valid negative result.
//! Everything here is either an I/O failure or a bounded loop that ran out
//! of budget, which has to reach the operator instead of spinning forever.

use thiserror::Error;

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The device channel failed (capture, tap or swipe).
    #[error("Device I/O failed: {0}")]
    Device(String),

    /// A template or mask could not be loaded from the asset pack.
    #[error("Failed to load asset '{asset}': {message}")]
    Asset {
        /// Asset identifier (`category/name`).
        asset: String,
        /// Loader error message.
        message: String,
    },

    /// The device answered a capture with no image data.
    #[error("Screen capture returned no data")]
    NoFrame,

    /// A polling loop hit its tick ceiling without reaching its goal.
    #[error("No progress while {stage} after {ticks} ticks")]
    Stalled {
        /// What the loop was trying to do.
        stage: &'static str,
        /// Ticks spent before giving up.
        ticks: u32,
    },

    /// Repeated scans found nothing to attack on the map.
    #[error("No reachable targets left after {scans} scans")]
    TargetsExhausted {
        /// Consecutive empty scans.
        scans: u32,
    },

    /// The fleet marker was not found on screen.
    #[error("Fleet marker not found after {attempts} attempts")]
    FleetNotFound {
        /// Capture attempts spent.
        attempts: u32,
    },

    /// The roster is full and neither enhancement nor retirement freed space.
    #[error("Roster is full and no collaborator could free a slot")]
    RosterFull,

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Whether the failure needs manual correction rather than another attempt.
    pub fn needs_operator(&self) -> bool {
        !matches!(self, EngineError::Device(_) | EngineError::NoFrame)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Device(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_device_failures_are_retried() {
        assert!(!EngineError::Device("offline".into()).needs_operator());
        assert!(!EngineError::NoFrame.needs_operator());
        assert!(EngineError::RosterFull.needs_operator());
        assert!(EngineError::TargetsExhausted { scans: 3 }.needs_operator());
    }
}
