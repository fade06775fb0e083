//! # Movement Controller
//!
//! Drives the fleet toward a target tile. Every tick captures one frame and
//! evaluates the interrupt predicates on it in parallel; the joined
//! [`Interrupts`] snapshot is then resolved in a fixed priority order:
//!
//! ambush evade > ambush failed > item pickup > info alert > arrival
//!
//! The target is touched every `touch_every` ticks. After `stuck_ticks`
//! ticks without any signal the target is blacklisted and the nearest
//! remaining one takes its place; when none remains the move ends with
//! [`MoveOutcome::NoTargetLeft`] and the caller decides whether to rescan.

use super::navigator::Navigator;
use super::target::{Target, TargetKind};
use crate::config::SearchConfig;
use crate::error::{EngineError, Result};
use crate::session::Session;
use crate::vision::assets::{self, region};
use crate::vision::{DEFAULT_SIMILARITY, Vision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Arrived on a node with a fight pending.
    FightNeeded,
    /// Reached a mystery node and collected it.
    NoFightNeeded,
    /// Evasion failed; a fight is pending but the target was not reached.
    Ambushed,
    /// Stuck, and no other target was left to retarget to. The stuck
    /// target stays blacklisted.
    NoTargetLeft,
}

const INTERRUPT_CHECKS: [(&str, f32); 6] = [
    (assets::AMBUSH_EVADE, DEFAULT_SIMILARITY),
    (assets::AMBUSH_FAILED, DEFAULT_SIMILARITY),
    (assets::MENU_ITEM_FOUND, DEFAULT_SIMILARITY),
    (assets::MENU_ALERT_INFO, 0.9),
    (assets::FORMATION, DEFAULT_SIMILARITY),
    (assets::LOADING, DEFAULT_SIMILARITY),
];

/// Interrupt predicates of one captured frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interrupts {
    pub evade: bool,
    pub evade_failed: bool,
    pub item: bool,
    pub alert: bool,
    pub formation: bool,
    pub loading: bool,
}

impl Interrupts {
    pub fn evaluate(vision: &Vision) -> Self {
        let r = vision.evaluate_all(&INTERRUPT_CHECKS);
        Self {
            evade: r[0],
            evade_failed: r[1],
            item: r[2],
            alert: r[3],
            formation: r[4],
            loading: r[5],
        }
    }

    pub fn arrived(&self) -> bool {
        self.formation || self.loading
    }
}

pub struct MovementController {
    stuck_ticks: u32,
    touch_every: u32,
    max_ticks: u32,
}

impl MovementController {
    pub fn new(search: &SearchConfig) -> Self {
        Self {
            stuck_ticks: search.stuck_ticks,
            touch_every: search.touch_every,
            max_ticks: search.max_ui_ticks,
        }
    }

    /// Move toward `target`. Returns the target actually reached, which
    /// differs from the argument after a stuck retarget.
    pub fn move_to(
        &self,
        session: &mut Session,
        nav: &mut Navigator,
        target: Target,
    ) -> Result<(Target, MoveOutcome)> {
        let mut target = target;
        let mut ticks = 0;
        let mut total = 0;
        log::info!("Moving to {}", target);

        loop {
            total += 1;
            if total > self.max_ticks {
                return Err(EngineError::Stalled {
                    stage: "moving",
                    ticks: self.max_ticks,
                });
            }

            session.refresh()?;
            let seen = Interrupts::evaluate(&session.vision);
            log::debug!("Movement tick {}: {:?}", ticks, seen);

            if seen.evade {
                log::info!("Ambush, evading");
                session.touch_region(region::AMBUSH_EVADE)?;
                continue;
            }
            if seen.evade_failed {
                log::warn!("Failed to evade ambush");
                return Ok((target, MoveOutcome::Ambushed));
            }
            if seen.item {
                log::info!("Item found on node");
                session.touch_region(region::TAP_TO_CONTINUE)?;
                if target.kind == TargetKind::MysteryNode {
                    return Ok((target, MoveOutcome::NoFightNeeded));
                }
                continue;
            }
            if seen.alert {
                if !session.find_and_touch(assets::MENU_ALERT_CLOSE, 0.8)? {
                    session.touch_region(region::CLOSE_INFO_DIALOG)?;
                }
                continue;
            }
            if seen.arrived() {
                return Ok((target, MoveOutcome::FightNeeded));
            }

            if ticks >= self.stuck_ticks {
                log::warn!("Fleet stuck moving to {}, picking another target", target);
                nav.blacklist.add(target.point());
                target = match nav.closest(session, None)? {
                    Some(next) => next,
                    None => return Ok((target, MoveOutcome::NoTargetLeft)),
                };
                log::info!("Moving to {}", target);
                ticks = 0;
                continue;
            }
            if ticks % self.touch_every == 0 {
                session.touch(target.point())?;
            }
            ticks += 1;
        }
    }
}
