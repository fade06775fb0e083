//! # Combat Engine
//!
//! Navigation and engagement for one map clear.
//!
//! - [`registry`]: enemy and mystery-node detection with progressive relaxation
//! - [`fleet`]: flagship position on screen
//! - [`movement`]: fleet movement with interrupt handling and stuck recovery
//! - [`battle`]: engagement start to outcome
//! - [`orchestrator`]: the clear-cycle state machine

pub mod battle;
pub mod blacklist;
pub mod fleet;
pub mod movement;
pub mod navigator;
pub mod orchestrator;
pub mod registry;
pub mod spatial;
pub mod target;


pub use battle::{BattleOutcome, BattleResolver};
pub use blacklist::Blacklist;
pub use fleet::FleetLocator;
pub use movement::{MoveOutcome, MovementController};
pub use navigator::Navigator;
pub use orchestrator::{ExitCode, MapClear, Phase, Transition};
pub use registry::TargetRegistry;
pub use target::{Target, TargetKind};
